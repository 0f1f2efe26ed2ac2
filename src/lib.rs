// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Louhi URL Triage Library
 * Exposes the analysis pipeline for the CLI and for testing
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

pub mod analyzer;
pub mod classifier;
pub mod encoder;
pub mod errors;
pub mod extractor;
pub mod http_client;
pub mod patterns;
pub mod probes;
pub mod recommendations;
pub mod reporting;
pub mod risk;
pub mod types;

pub use analyzer::UrlAnalyzer;
pub use classifier::VulnClassifier;
pub use errors::TriageError;
pub use http_client::{HttpClient, HttpResponse};
pub use types::{AnalysisResult, ClassificationResult, FeatureRecord, ProbeOutcome, RiskLevel};
