// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Script-Hygiene Probe
 * Insecure script sources, dangerous JS sinks and mixed content
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use scraper::{Html, Selector};
use tracing::{debug, warn};

use super::PROBE_TIMEOUT;
use crate::http_client::HttpClient;
use crate::patterns::SCRIPT_PATTERNS;
use crate::types::ProbeOutcome;

/// Sentinel returned when no script issue was found.
pub const NO_ISSUES: &str = "No script issues detected";

pub async fn probe(url: &str, client: &HttpClient) -> ProbeOutcome {
    debug!("Running script-hygiene probe against {}", url);

    let response = match client.get_with_timeout(url, PROBE_TIMEOUT).await {
        Ok(response) => response,
        Err(e) => {
            warn!("Script issues check failed for {}: {}", url, e);
            return ProbeOutcome::Degraded(format!("Script issues check error: {}", e));
        }
    };

    let indicators = collect_script_findings(url, &response.body);
    if indicators.is_empty() {
        ProbeOutcome::Finding(NO_ISSUES.to_string())
    } else {
        ProbeOutcome::Finding(indicators.join(" "))
    }
}

/// Pattern layer over the lower-cased body, plus mixed-content enumeration
/// of literal `<script src>` values when the page itself is served over
/// https.
fn collect_script_findings(url: &str, body: &str) -> Vec<String> {
    let mut indicators = Vec::new();
    let content_lower = body.to_lowercase();

    for (source, pattern) in SCRIPT_PATTERNS.iter() {
        if pattern.is_match(&content_lower) {
            indicators.push(format!("Script issue pattern detected: {}", source));
        }
    }

    if url.starts_with("https:") {
        let script_selector = Selector::parse("script[src]").expect("static selector");
        let document = Html::parse_document(body);
        for script in document.select(&script_selector) {
            if let Some(src) = script.value().attr("src") {
                if src.starts_with("http:") {
                    indicators.push(format!("Mixed content: HTTP script {}", src));
                }
            }
        }
    }

    indicators
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dangerous_sinks_are_flagged() {
        let body = r#"<script>eval(payload); document.write(x);</script>"#;
        let findings = collect_script_findings("http://example.test/", body);

        assert!(findings
            .iter()
            .any(|f| f == r"Script issue pattern detected: eval\("));
        assert!(findings
            .iter()
            .any(|f| f == r"Script issue pattern detected: document\.write\("));
    }

    #[test]
    fn mixed_content_names_the_literal_source() {
        let body = r#"<script src="http://cdn.example/a.js"></script>"#;
        let findings = collect_script_findings("https://secure.example/", body);

        assert!(findings
            .iter()
            .any(|f| f == "Mixed content: HTTP script http://cdn.example/a.js"));
    }

    #[test]
    fn http_pages_skip_mixed_content_enumeration() {
        let body = r#"<script src="http://cdn.example/a.js"></script>"#;
        let findings = collect_script_findings("http://plain.example/", body);

        // The pattern layer still fires on the insecure src, but no
        // mixed-content finding is attributed.
        assert!(findings.iter().all(|f| !f.starts_with("Mixed content")));
        assert!(!findings.is_empty());
    }

    #[test]
    fn clean_https_page_has_no_findings() {
        let body = r#"<script src="https://cdn.example/a.js"></script><p>hi</p>"#;
        assert!(collect_script_findings("https://secure.example/", body).is_empty());
    }
}
