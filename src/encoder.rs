// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Feature Text Encoder
 * Deterministic FeatureRecord-to-text serialization for the classifier
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::types::FeatureRecord;

/// Keyword clusters appended as hint phrases, evaluated in this order. Each
/// phrase is appended at most once no matter how many trigger words match.
const HINT_CLUSTERS: &[(&[&str], &str)] = &[
    (
        &["sql", "database", "mysql", "error"],
        "database injection vulnerability",
    ),
    (
        &["script", "javascript", "xss"],
        "cross site scripting vulnerability",
    ),
    (
        &["upload", "file", "path"],
        "file inclusion vulnerability",
    ),
    (
        &["admin", "login", "authentication"],
        "authentication bypass vulnerability",
    ),
];

/// Serialize a FeatureRecord to the exact text shape the classifier was
/// trained on.
///
/// This is a byte-stable compatibility contract: slots render in their fixed
/// declaration order as `<name> <value>`, empty slots are skipped, pairs are
/// joined with single spaces, and the hint phrases are appended in fixed
/// cluster order. Any change here shifts the classifier's input
/// distribution.
pub fn features_to_text(features: &FeatureRecord) -> String {
    let mut text_parts: Vec<String> = Vec::new();
    for (name, value) in features.slots() {
        if !value.is_empty() {
            text_parts.push(format!("{} {}", name, value));
        }
    }

    let mut combined = text_parts.join(" ");

    let combined_lower = combined.to_lowercase();
    let mut hints: Vec<&str> = Vec::new();
    for (triggers, phrase) in HINT_CLUSTERS {
        if triggers.iter().any(|word| combined_lower.contains(word)) {
            hints.push(phrase);
        }
    }

    if !hints.is_empty() {
        combined.push(' ');
        combined.push_str(&hints.join(" "));
    }

    combined
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> FeatureRecord {
        FeatureRecord {
            url_analysis: "domain example.test path / query ".to_string(),
            headers: "server nginx".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn empty_slots_are_skipped() {
        let features = record();
        let text = features_to_text(&features);
        assert!(text.starts_with("url_analysis domain example.test"));
        assert!(text.contains("headers server nginx"));
        assert!(!text.contains("forms"));
        assert!(!text.contains("xss_check"));
    }

    #[test]
    fn encoding_is_deterministic() {
        let features = FeatureRecord {
            content: "login page with admin upload".to_string(),
            errors: "sql_injection pattern detected".to_string(),
            xss_check: "No XSS issues detected".to_string(),
            ..Default::default()
        };
        assert_eq!(features_to_text(&features), features_to_text(&features));
    }

    #[test]
    fn hint_phrases_append_once_in_cluster_order() {
        let features = FeatureRecord {
            // Triggers: sql + mysql (cluster 1), script (cluster 2),
            // login + admin (cluster 4). Cluster 3 does not fire.
            content: "sql mysql script login admin".to_string(),
            ..Default::default()
        };
        let text = features_to_text(&features);

        assert!(text.ends_with(
            "database injection vulnerability \
             cross site scripting vulnerability \
             authentication bypass vulnerability"
        ));
        assert_eq!(text.matches("database injection vulnerability").count(), 1);
        assert!(!text.contains("file inclusion vulnerability"));
    }

    #[test]
    fn slots_render_in_fixed_order() {
        let features = FeatureRecord {
            url_analysis: "u".to_string(),
            headers: "h".to_string(),
            content: "c".to_string(),
            security_headers: "s ".to_string(),
            ssl_check: "No SSL issues detected".to_string(),
            ..Default::default()
        };
        let text = features_to_text(&features);

        let u = text.find("url_analysis").unwrap();
        let h = text.find("headers h").unwrap();
        let c = text.find("content c").unwrap();
        let s = text.find("security_headers").unwrap();
        let ssl = text.find("ssl_check").unwrap();
        assert!(u < h && h < c && c < s && s < ssl);
    }

    #[test]
    fn sentinel_outcomes_still_trigger_matching_clusters() {
        // "No XSS issues detected" contains both "xss" (after lowering) and
        // the word "detected"; the xss cluster must fire exactly once.
        let features = FeatureRecord {
            xss_check: "No XSS issues detected".to_string(),
            ..Default::default()
        };
        let text = features_to_text(&features);
        assert!(text.contains("cross site scripting vulnerability"));
    }
}
