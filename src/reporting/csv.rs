// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - CSV Reports
 * Main, recommendations, and features CSV writers
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::path::{Path, PathBuf};

use csv::Writer;
use tracing::info;

use crate::errors::TriageError;
use crate::types::AnalysisResult;

/// Feature values longer than this are cut in the features CSV.
const FEATURE_VALUE_LIMIT: usize = 500;

pub struct CsvReporter;

impl CsvReporter {
    pub fn new() -> Self {
        Self
    }

    /// Write the three per-run CSV files and return their paths.
    pub fn generate(
        &self,
        result: &AnalysisResult,
        output_dir: &Path,
        basename: &str,
    ) -> Result<Vec<PathBuf>, TriageError> {
        let csv_dir = output_dir.join("csv");

        let main_path = csv_dir.join(format!("{}.csv", basename));
        self.write_main(result, &main_path)?;

        let rec_path = csv_dir.join(format!("{}_recommendations.csv", basename));
        self.write_recommendations(result, &rec_path)?;

        let features_path = csv_dir.join(format!("{}_features.csv", basename));
        self.write_features(result, &features_path)?;

        info!(
            main = %main_path.display(),
            recommendations = %rec_path.display(),
            features = %features_path.display(),
            "CSV reports saved"
        );
        Ok(vec![main_path, rec_path, features_path])
    }

    fn write_main(&self, result: &AnalysisResult, path: &Path) -> Result<(), TriageError> {
        let mut wtr = Writer::from_path(path).map_err(csv_error)?;
        wtr.write_record([
            "URL",
            "Analysis_Timestamp",
            "Risk_Level",
            "Predicted_Vulnerability",
            "Confidence",
            "Top_Prediction_1",
            "Top_Prediction_2",
            "Top_Prediction_3",
            "Security_Headers_Present",
            "Technologies_Detected",
            "Forms_Found",
            "Recommendations_Count",
        ])
        .map_err(csv_error)?;

        let technologies = if result.features.technologies.is_empty() {
            "None"
        } else {
            result.features.technologies.as_str()
        };
        let confidence = format!("{:.4}", result.classification.confidence);
        let top_1 = ranked_prediction(result, 0);
        let top_2 = ranked_prediction(result, 1);
        let top_3 = ranked_prediction(result, 2);
        let headers_present = result.security_headers_present().to_string();
        let forms_found = result.forms_found().to_string();
        let rec_count = result.recommendations.len().to_string();

        wtr.write_record([
            result.url.as_str(),
            result.analysis_timestamp.as_str(),
            result.risk_level.as_str(),
            result.classification.predicted_label.as_str(),
            confidence.as_str(),
            top_1.as_str(),
            top_2.as_str(),
            top_3.as_str(),
            headers_present.as_str(),
            technologies,
            forms_found.as_str(),
            rec_count.as_str(),
        ])
        .map_err(csv_error)?;

        wtr.flush()?;
        Ok(())
    }

    fn write_recommendations(
        &self,
        result: &AnalysisResult,
        path: &Path,
    ) -> Result<(), TriageError> {
        let mut wtr = Writer::from_path(path).map_err(csv_error)?;
        wtr.write_record(["Recommendation"]).map_err(csv_error)?;
        for rec in &result.recommendations {
            wtr.write_record([rec.as_str()]).map_err(csv_error)?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn write_features(&self, result: &AnalysisResult, path: &Path) -> Result<(), TriageError> {
        let mut wtr = Writer::from_path(path).map_err(csv_error)?;
        wtr.write_record(["Feature_Type", "Content"])
            .map_err(csv_error)?;
        for (name, value) in result.features.slots() {
            let content = if value.is_empty() {
                "None".to_string()
            } else {
                truncate_chars(value, FEATURE_VALUE_LIMIT)
            };
            wtr.write_record([name, content.as_str()]).map_err(csv_error)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl Default for CsvReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn csv_error(e: csv::Error) -> TriageError {
    TriageError::Report(e.to_string())
}

fn ranked_prediction(result: &AnalysisResult, rank: usize) -> String {
    match result.classification.top_predictions.get(rank) {
        Some((label, p)) => format!("{} ({:.3})", label, p),
        None => String::new(),
    }
}

fn truncate_chars(value: &str, limit: usize) -> String {
    value.chars().take(limit).collect()
}
