// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Triage Data Model
 * FeatureRecord, probe outcomes, classification and analysis results
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use serde::Serialize;

/// Number of label predictions carried in a `ClassificationResult`.
pub const TOP_K: usize = 3;

/// Maximum recommendations emitted per analysis.
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Feature slots extracted from one analysis run.
///
/// The slot set is fixed and exhaustive: every slot is always present and
/// possibly empty, never absent. The text encoder walks these fields in
/// declaration order, which is the order the classifier was trained on, so
/// reordering fields here is a breaking change.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FeatureRecord {
    pub url_analysis: String,
    pub headers: String,
    pub content: String,
    pub technologies: String,
    pub forms: String,
    pub links: String,
    pub errors: String,
    pub security_headers: String,
    pub xss_check: String,
    pub ssl_check: String,
    pub script_check: String,
}

impl FeatureRecord {
    /// All slots as (name, value) pairs in canonical encoding order.
    pub fn slots(&self) -> [(&'static str, &str); 11] {
        [
            ("url_analysis", &self.url_analysis),
            ("headers", &self.headers),
            ("content", &self.content),
            ("technologies", &self.technologies),
            ("forms", &self.forms),
            ("links", &self.links),
            ("errors", &self.errors),
            ("security_headers", &self.security_headers),
            ("xss_check", &self.xss_check),
            ("ssl_check", &self.ssl_check),
            ("script_check", &self.script_check),
        ]
    }
}

/// Result of a single probe.
///
/// `Finding` carries a descriptive result string, including the per-probe
/// "no issues detected" sentinel when nothing was found. `Degraded` carries
/// the diagnostic produced when the probe hit a fault it swallowed. Both
/// render into the same feature slot; the split exists so the aggregator can
/// tell a genuine clean result from a suppressed failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Finding(String),
    Degraded(String),
}

impl ProbeOutcome {
    pub fn as_text(&self) -> &str {
        match self {
            ProbeOutcome::Finding(s) | ProbeOutcome::Degraded(s) => s,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            ProbeOutcome::Finding(s) | ProbeOutcome::Degraded(s) => s,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, ProbeOutcome::Degraded(_))
    }
}

/// Classifier output for one encoded feature text.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationResult {
    pub predicted_label: String,
    /// Probability mass of the top label, in [0.0, 1.0].
    pub confidence: f32,
    /// Top-3 (label, probability) pairs, descending probability,
    /// ties broken by ascending label index.
    pub top_predictions: Vec<(String, f32)>,
}

/// Ordinal risk bucket derived from classifier confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable aggregate of one analysis run. Built once by the orchestrator,
/// consumed read-only by the console summary and report renderers.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub url: String,
    pub analysis_timestamp: String,
    pub features: FeatureRecord,
    pub classification: ClassificationResult,
    pub risk_level: RiskLevel,
    pub recommendations: Vec<String>,
}

impl AnalysisResult {
    /// Security headers were observed on the target.
    pub fn security_headers_present(&self) -> bool {
        !self.features.security_headers.is_empty()
    }

    /// At least one form was found on the target page.
    pub fn forms_found(&self) -> bool {
        !self.features.forms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_order_is_canonical() {
        let record = FeatureRecord::default();
        let names: Vec<&str> = record.slots().iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec![
                "url_analysis",
                "headers",
                "content",
                "technologies",
                "forms",
                "links",
                "errors",
                "security_headers",
                "xss_check",
                "ssl_check",
                "script_check",
            ]
        );
    }

    #[test]
    fn risk_levels_are_ordered() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
        assert!(RiskLevel::High < RiskLevel::Critical);
        assert_eq!(RiskLevel::Critical.to_string(), "CRITICAL");
    }

    #[test]
    fn probe_outcome_renders_both_variants() {
        assert_eq!(ProbeOutcome::Finding("ok".into()).as_text(), "ok");
        let degraded = ProbeOutcome::Degraded("SSL check error: refused".into());
        assert!(degraded.is_degraded());
        assert_eq!(degraded.into_text(), "SSL check error: refused");
    }
}
