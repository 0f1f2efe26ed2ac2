// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - PDF Report
 * Single-page A4 analysis summary
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use tracing::info;

use crate::errors::TriageError;
use crate::types::AnalysisResult;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 7.0;

/// Values longer than this are cut before rendering so one long feature
/// cannot push the summary off the page.
const VALUE_LIMIT: usize = 200;

pub struct PdfReporter;

impl PdfReporter {
    pub fn new() -> Self {
        Self
    }

    /// Render the single-page summary and return its path.
    pub fn generate(
        &self,
        result: &AnalysisResult,
        output_dir: &Path,
        basename: &str,
    ) -> Result<PathBuf, TriageError> {
        let path = output_dir.join("pdf").join(format!("{}.pdf", basename));

        let (doc, page, layer) = PdfDocument::new(
            "Website Vulnerability Analysis Report",
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1",
        );
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;

        let mut cursor = Cursor::new(doc.get_page(page).get_layer(layer));

        cursor.heading(&bold, 18.0, "Website Vulnerability Analysis Report");
        cursor.blank();

        cursor.heading(&bold, 13.0, "Analysis Details");
        cursor.pair(&bold, &regular, "URL:", &truncate(&result.url));
        cursor.pair(&bold, &regular, "Analysis Date:", &result.analysis_timestamp);
        cursor.pair(&bold, &regular, "Risk Level:", result.risk_level.as_str());
        cursor.pair(
            &bold,
            &regular,
            "Predicted Vulnerability:",
            &truncate(&result.classification.predicted_label),
        );
        cursor.pair(
            &bold,
            &regular,
            "Confidence Score:",
            &format!("{:.2}%", result.classification.confidence * 100.0),
        );
        cursor.blank();

        cursor.heading(&bold, 13.0, "Top 3 Vulnerability Predictions");
        for (rank, (label, confidence)) in
            result.classification.top_predictions.iter().enumerate()
        {
            cursor.line(
                &regular,
                11.0,
                &format!("{}. {} ({:.2}%)", rank + 1, truncate(label), confidence * 100.0),
            );
        }
        cursor.blank();

        cursor.heading(&bold, 13.0, "Security Recommendations");
        for (index, recommendation) in result.recommendations.iter().enumerate() {
            cursor.line(
                &regular,
                11.0,
                &format!("{}. {}", index + 1, truncate(recommendation)),
            );
        }
        cursor.blank();

        cursor.heading(&bold, 13.0, "Technical Analysis Details");
        let technologies = if result.features.technologies.is_empty() {
            "None".to_string()
        } else {
            truncate(&result.features.technologies)
        };
        cursor.pair(&bold, &regular, "Technologies Detected:", &technologies);
        cursor.pair(
            &bold,
            &regular,
            "Security Headers:",
            if result.security_headers_present() {
                "Present"
            } else {
                "Missing"
            },
        );
        cursor.pair(
            &bold,
            &regular,
            "Forms Detected:",
            if result.forms_found() { "Yes" } else { "No" },
        );
        cursor.pair(
            &bold,
            &regular,
            "Suspicious Links:",
            if result.features.links.is_empty() {
                "None"
            } else {
                "Found"
            },
        );
        cursor.blank();

        cursor.heading(
            &bold,
            14.0,
            &format!("RISK LEVEL: {}", result.risk_level),
        );
        cursor.blank();
        cursor.line(&regular, 8.0, "Generated by ML Vulnerability Analysis System");

        let file = File::create(&path)?;
        doc.save(&mut BufWriter::new(file)).map_err(pdf_error)?;

        info!(path = %path.display(), "PDF report saved");
        Ok(path)
    }
}

impl Default for PdfReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn pdf_error(e: printpdf::Error) -> TriageError {
    TriageError::Report(e.to_string())
}

fn truncate(value: &str) -> String {
    if value.chars().count() <= VALUE_LIMIT {
        value.to_string()
    } else {
        let cut: String = value.chars().take(VALUE_LIMIT).collect();
        format!("{}...", cut)
    }
}

/// Top-down text cursor over a single page layer.
struct Cursor {
    layer: PdfLayerReference,
    y: f32,
}

impl Cursor {
    fn new(layer: PdfLayerReference) -> Self {
        Cursor {
            layer,
            y: PAGE_HEIGHT_MM - MARGIN_MM,
        }
    }

    fn heading(&mut self, font: &IndirectFontRef, size: f32, text: &str) {
        self.layer
            .use_text(text, size, Mm(MARGIN_MM), Mm(self.y), font);
        self.advance();
    }

    fn line(&mut self, font: &IndirectFontRef, size: f32, text: &str) {
        self.layer
            .use_text(text, size, Mm(MARGIN_MM), Mm(self.y), font);
        self.advance();
    }

    fn pair(&mut self, bold: &IndirectFontRef, regular: &IndirectFontRef, key: &str, value: &str) {
        self.layer
            .use_text(key, 10.0, Mm(MARGIN_MM), Mm(self.y), bold);
        self.layer
            .use_text(value, 10.0, Mm(MARGIN_MM + 50.0), Mm(self.y), regular);
        self.advance();
    }

    fn blank(&mut self) {
        self.advance();
    }

    fn advance(&mut self) {
        self.y -= LINE_HEIGHT_MM;
    }
}
