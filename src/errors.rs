// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Triage Error Types
 * Error taxonomy for the URL triage pipeline
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use thiserror::Error;

/// Top-level triage error.
///
/// Network and parse faults inside probes never surface here; they are
/// converted to diagnostic strings at the probe boundary so a single slow or
/// broken endpoint cannot abort the analysis. What remains is the genuinely
/// fatal class (classifier artifacts) plus the non-fatal reporting class.
#[derive(Error, Debug)]
pub enum TriageError {
    /// A classifier artifact (model, tokenizer, label map) is missing.
    /// Fatal: the run must abort before any network probing starts.
    #[error("Classifier component not found: {path}")]
    ClassifierMissing { path: String },

    /// A classifier artifact exists but could not be parsed.
    #[error("Failed to load classifier component {path}: {reason}")]
    ClassifierLoad { path: String, reason: String },

    /// A line in the label mapping file is not `label:index`.
    #[error("Malformed label mapping line: {line:?}")]
    LabelMapping { line: String },

    /// Model output dimension disagrees with the label set.
    #[error("Model predicts {model_labels} labels but label map defines {map_labels}")]
    ModelShape {
        model_labels: usize,
        map_labels: usize,
    },

    /// The target URL could not be interpreted at all.
    #[error("Invalid target URL: {0}")]
    InvalidTarget(String),

    /// Report generation failure. Logged and skipped, never fatal.
    #[error("Report error: {0}")]
    Report(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
