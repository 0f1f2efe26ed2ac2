// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Risk Scoring
 * Confidence-to-risk bucketing for classified targets
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::types::RiskLevel;

/// Bucket classifier confidence into an ordinal risk level.
///
/// The label is accepted but deliberately unused: risk is a function of how
/// certain the classifier is, not of which vulnerability class it picked.
/// Thresholds are half-open, so a confidence sitting exactly on a boundary
/// lands in the higher bucket.
pub fn assess_risk_level(confidence: f32, _predicted_label: &str) -> RiskLevel {
    if confidence < 0.3 {
        RiskLevel::Low
    } else if confidence < 0.6 {
        RiskLevel::Medium
    } else if confidence < 0.8 {
        RiskLevel::High
    } else {
        RiskLevel::Critical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_buckets() {
        assert_eq!(assess_risk_level(0.0, "XSS"), RiskLevel::Low);
        assert_eq!(assess_risk_level(0.29, "XSS"), RiskLevel::Low);
        assert_eq!(assess_risk_level(0.45, "XSS"), RiskLevel::Medium);
        assert_eq!(assess_risk_level(0.70, "XSS"), RiskLevel::High);
        assert_eq!(assess_risk_level(0.95, "XSS"), RiskLevel::Critical);
    }

    #[test]
    fn boundary_values_land_in_the_higher_bucket() {
        assert_eq!(assess_risk_level(0.3, "XSS"), RiskLevel::Medium);
        assert_eq!(assess_risk_level(0.59, "XSS"), RiskLevel::Medium);
        assert_eq!(assess_risk_level(0.6, "XSS"), RiskLevel::High);
        assert_eq!(assess_risk_level(0.79, "XSS"), RiskLevel::High);
        assert_eq!(assess_risk_level(0.8, "XSS"), RiskLevel::Critical);
        assert_eq!(assess_risk_level(1.0, "XSS"), RiskLevel::Critical);
    }

    #[test]
    fn label_does_not_influence_risk() {
        assert_eq!(
            assess_risk_level(0.5, "SQL Injection"),
            assess_risk_level(0.5, "Benign"),
        );
    }
}
