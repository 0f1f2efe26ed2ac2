// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Analysis Orchestrator
 * Single-URL pipeline: extraction, active probes, classification, scoring
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::sync::Arc;

use chrono::Local;
use tracing::{debug, info, warn};

use crate::classifier::VulnClassifier;
use crate::encoder::features_to_text;
use crate::extractor::extract_features;
use crate::http_client::HttpClient;
use crate::probes::{script, tls, xss};
use crate::recommendations::generate_recommendations;
use crate::risk::assess_risk_level;
use crate::types::AnalysisResult;

/// Orchestrates a single analysis run end to end.
///
/// The classifier is loaded up front by the caller; by the time an analyzer
/// exists every fatal precondition has already been checked, so `analyze`
/// always produces a result.
pub struct UrlAnalyzer {
    client: Arc<HttpClient>,
    classifier: VulnClassifier,
}

impl UrlAnalyzer {
    pub fn new(client: Arc<HttpClient>, classifier: VulnClassifier) -> Self {
        UrlAnalyzer { client, classifier }
    }

    /// Run the full pipeline against one URL.
    ///
    /// Passive extraction and the three active probes run concurrently;
    /// probe faults degrade into diagnostic feature text rather than
    /// aborting the run.
    pub async fn analyze(&self, url: &str) -> AnalysisResult {
        info!(url = %url, "starting analysis");

        let (mut features, xss_outcome, tls_outcome, script_outcome) = tokio::join!(
            extract_features(url, &self.client),
            xss::probe(url, &self.client),
            tls::probe(url),
            script::probe(url, &self.client),
        );

        if xss_outcome.is_degraded() {
            warn!(url = %url, detail = xss_outcome.as_text(), "XSS probe degraded");
        }
        if tls_outcome.is_degraded() {
            warn!(url = %url, detail = tls_outcome.as_text(), "SSL probe degraded");
        }
        if script_outcome.is_degraded() {
            warn!(url = %url, detail = script_outcome.as_text(), "script probe degraded");
        }

        features.xss_check = xss_outcome.into_text();
        features.ssl_check = tls_outcome.into_text();
        features.script_check = script_outcome.into_text();

        let text = features_to_text(&features);
        debug!(encoded_len = text.len(), "features encoded");

        let classification = self.classifier.classify(&text);
        let risk_level =
            assess_risk_level(classification.confidence, &classification.predicted_label);
        let recommendations =
            generate_recommendations(&features, &classification.predicted_label);

        info!(
            url = %url,
            label = %classification.predicted_label,
            confidence = classification.confidence,
            risk = %risk_level,
            "analysis complete"
        );

        AnalysisResult {
            url: url.to_string(),
            analysis_timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            features,
            classification,
            risk_level,
            recommendations,
        }
    }
}
