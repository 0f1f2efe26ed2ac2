// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Cross-Site-Scripting Probe
 * Static, DOM and active reflection layers over one page fetch
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use anyhow::Result;
use futures::stream::{self, StreamExt};
use scraper::{Html, Selector};
use tracing::{debug, info, warn};
use url::Url;

use super::{PROBE_TIMEOUT, REFLECTION_TIMEOUT, XSS_TEST_PAYLOAD};
use crate::http_client::HttpClient;
use crate::patterns::XSS_PATTERNS;
use crate::types::ProbeOutcome;

/// Sentinel returned when no layer produced a finding.
pub const NO_ISSUES: &str = "No XSS issues detected";

/// Form submissions tested concurrently. `buffered` keeps result order
/// aligned with document order so indicator text stays deterministic.
const CONCURRENT_SUBMISSIONS: usize = 4;

/// A form as seen by the active layer: resolved submission target, declared
/// method and the named input fields to fill.
#[derive(Debug)]
struct ActiveForm {
    action: String,
    method: String,
    input_names: Vec<String>,
}

pub async fn probe(url: &str, client: &HttpClient) -> ProbeOutcome {
    match probe_inner(url, client).await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!("XSS check failed for {}: {}", url, e);
            ProbeOutcome::Degraded(format!("XSS check error: {}", e))
        }
    }
}

async fn probe_inner(url: &str, client: &HttpClient) -> Result<ProbeOutcome> {
    debug!("Running XSS probe against {}", url);

    let response = client.get_with_timeout(url, PROBE_TIMEOUT).await?;

    // Static and DOM layers are pure parsing; the Html document must not be
    // held across an await, so they run in one synchronous pass that also
    // lifts the forms out for the active layer.
    let (mut indicators, forms) = inspect_page(url, &response.body);

    // Active layer: fill every named input with the marker payload and
    // submit with the form's declared method; a verbatim echo means the
    // input is reflected unescaped.
    let submissions = stream::iter(forms)
        .map(|form| submit_with_payload(client, form))
        .buffered(CONCURRENT_SUBMISSIONS)
        .collect::<Vec<_>>()
        .await;
    for submission in submissions {
        if let Some(finding) = submission? {
            push_unique(&mut indicators, finding);
        }
    }

    // Independent reflection test on a common query parameter.
    let encoded = urlencoding::encode(XSS_TEST_PAYLOAD);
    let test_url = if url.contains('?') {
        format!("{}&q={}", url, encoded)
    } else {
        format!("{}?q={}", url, encoded)
    };
    let echo = client
        .get_with_timeout(&test_url, REFLECTION_TIMEOUT)
        .await?;
    if echo.body.contains(XSS_TEST_PAYLOAD) {
        push_unique(
            &mut indicators,
            "Potential reflected XSS via ?q= param".to_string(),
        );
    }

    if indicators.is_empty() {
        Ok(ProbeOutcome::Finding(NO_ISSUES.to_string()))
    } else {
        info!("XSS indicators found on {}: {}", url, indicators.len());
        Ok(ProbeOutcome::Finding(format!(
            "Possible XSS risk(s) detected: {}",
            indicators.join("; ")
        )))
    }
}

/// Static regex layer plus DOM layer. Returns deduplicated indicators in
/// discovery order and the forms for the active layer.
fn inspect_page(base_url: &str, body: &str) -> (Vec<String>, Vec<ActiveForm>) {
    let mut indicators: Vec<String> = Vec::new();
    let content_lower = body.to_lowercase();

    for (source, pattern) in XSS_PATTERNS.iter() {
        if pattern.is_match(&content_lower) {
            push_unique(&mut indicators, format!("Pattern detected: {}", source));
        }
    }

    let document = Html::parse_document(body);

    // Inline event handlers on interactive elements.
    let interactive = Selector::parse("a, img, button, input").expect("static selector");
    for element in document.select(&interactive) {
        for (attr_name, _) in element.value().attrs() {
            if attr_name.to_lowercase().starts_with("on") {
                push_unique(
                    &mut indicators,
                    format!("Inline JavaScript event handler found: {}", attr_name),
                );
            }
        }
    }

    // Free-text fields with no framework-level protection.
    let form_selector = Selector::parse("form").expect("static selector");
    let field_selector = Selector::parse("input, textarea").expect("static selector");
    for form in document.select(&form_selector) {
        for field in form.select(&field_selector) {
            let field_type = field.value().attr("type").unwrap_or("");
            if matches!(field_type, "text" | "search" | "password") {
                push_unique(
                    &mut indicators,
                    "Unprotected user input detected (text/search/password)".to_string(),
                );
            }
        }
    }

    // javascript: URIs in anchors.
    let anchor_selector = Selector::parse("a[href]").expect("static selector");
    for anchor in document.select(&anchor_selector) {
        if let Some(href) = anchor.value().attr("href") {
            if href.trim().to_lowercase().starts_with("javascript:") {
                push_unique(
                    &mut indicators,
                    "javascript: URI detected in anchor tag".to_string(),
                );
            }
        }
    }

    // Collect forms for the active layer; relative actions are resolved
    // against the page URL, an absent or empty action submits to the page
    // itself.
    let mut forms = Vec::new();
    for form in document.select(&form_selector) {
        let method = form
            .value()
            .attr("method")
            .unwrap_or("get")
            .to_lowercase();
        let action = match form.value().attr("action") {
            Some(action) if !action.is_empty() => resolve_action(base_url, action),
            _ => base_url.to_string(),
        };
        let input_names: Vec<String> = form
            .select(&field_selector)
            .filter_map(|field| field.value().attr("name"))
            .map(|name| name.to_string())
            .collect();

        if !input_names.is_empty() {
            forms.push(ActiveForm {
                action,
                method,
                input_names,
            });
        }
    }

    (indicators, forms)
}

fn resolve_action(base_url: &str, action: &str) -> String {
    match Url::parse(base_url).and_then(|base| base.join(action)) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => action.to_string(),
    }
}

/// Submit one form with the marker payload in every named input. Returns a
/// finding when the payload is echoed verbatim.
async fn submit_with_payload(client: &HttpClient, form: ActiveForm) -> Result<Option<String>> {
    let params: Vec<(String, String)> = form
        .input_names
        .iter()
        .map(|name| (name.clone(), XSS_TEST_PAYLOAD.to_string()))
        .collect();

    debug!(
        "Submitting marker payload to {} ({} fields, {})",
        form.action,
        params.len(),
        form.method
    );

    let response = if form.method == "post" {
        client
            .post_form(&form.action, &params, REFLECTION_TIMEOUT)
            .await?
    } else {
        let mut target = Url::parse(&form.action)?;
        target
            .query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        client
            .get_with_timeout(target.as_str(), REFLECTION_TIMEOUT)
            .await?
    };

    if response.body.contains(XSS_TEST_PAYLOAD) {
        Ok(Some(format!(
            "Potential reflected XSS detected in form ({})",
            form.action
        )))
    } else {
        Ok(None)
    }
}

fn push_unique(indicators: &mut Vec<String>, indicator: String) {
    if !indicators.contains(&indicator) {
        indicators.push(indicator);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_layer_flags_script_tags_and_event_handlers() {
        let body = r#"<script>alert(1)</script><img src=x onerror=alert(1)>"#;
        let (indicators, _) = inspect_page("http://example.test/", body);

        assert!(indicators
            .iter()
            .any(|i| i.starts_with("Pattern detected: <script")));
        assert!(indicators
            .iter()
            .any(|i| i.contains("Inline JavaScript event handler found: onerror")));
    }

    #[test]
    fn dom_layer_flags_javascript_uris_and_text_inputs() {
        let body = concat!(
            r#"<a href=" JavaScript:alert(1)">x</a>"#,
            r#"<form><input type="password" name="pw"></form>"#,
        );
        let (indicators, forms) = inspect_page("http://example.test/", body);

        assert!(indicators
            .iter()
            .any(|i| i == "javascript: URI detected in anchor tag"));
        assert!(indicators
            .iter()
            .any(|i| i == "Unprotected user input detected (text/search/password)"));
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].input_names, vec!["pw"]);
    }

    #[test]
    fn indicators_are_deduplicated_in_discovery_order() {
        let body = r#"<form><input type="text" name="a"><input type="text" name="b"></form>"#;
        let (indicators, _) = inspect_page("http://example.test/", body);

        let unprotected = indicators
            .iter()
            .filter(|i| i.contains("Unprotected user input"))
            .count();
        assert_eq!(unprotected, 1);
    }

    #[test]
    fn relative_form_actions_resolve_against_page_url() {
        let body = r#"<form action="/search" method="GET"><input name="q"></form>"#;
        let (_, forms) = inspect_page("http://example.test/page", body);

        assert_eq!(forms[0].action, "http://example.test/search");
        assert_eq!(forms[0].method, "get");
    }

    #[test]
    fn named_textareas_are_fillable_fields() {
        let body = r#"<form action="/post" method="POST"><textarea name="body"></textarea></form>"#;
        let (_, forms) = inspect_page("http://example.test/", body);

        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].method, "post");
        assert_eq!(forms[0].input_names, vec!["body"]);
    }

    #[test]
    fn unnamed_inputs_do_not_produce_active_forms() {
        let body = r#"<form action="/x"><input type="submit"></form>"#;
        let (_, forms) = inspect_page("http://example.test/", body);
        assert!(forms.is_empty());
    }
}
