// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Louhi CLI
 * ML-assisted single-URL vulnerability triage
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use louhi::analyzer::UrlAnalyzer;
use louhi::classifier::VulnClassifier;
use louhi::http_client::HttpClient;
use louhi::reporting::csv::CsvReporter;
use louhi::reporting::pdf::PdfReporter;
use louhi::reporting::{create_output_dirs, report_basename};
use louhi::types::AnalysisResult;

const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Parser, Debug)]
#[command(
    name = "louhi",
    version,
    about = "ML-assisted website vulnerability triage with report generation"
)]
struct Args {
    /// URL to analyze for vulnerabilities
    url: String,

    /// Path to trained model weights
    #[arg(long, default_value = "model_weights.json")]
    model: PathBuf,

    /// Path to tokenizer file
    #[arg(long, default_value = "tokenizer.json")]
    tokenizer: PathBuf,

    /// Path to label mapping file
    #[arg(long, default_value = "label_to_int.txt")]
    labels: PathBuf,

    /// Output directory for reports
    #[arg(long, default_value = "triage_out")]
    output_dir: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Skip CSV generation
    #[arg(long)]
    no_csv: bool,

    /// Skip PDF generation
    #[arg(long)]
    no_pdf: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let url = normalize_target(&args.url);

    println!("Starting vulnerability analysis for: {}", url);
    println!("Reports will be saved to: {}", args.output_dir.display());

    tokio::select! {
        outcome = run(&args, &url) => outcome,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("\nAnalysis interrupted by user");
            process::exit(1);
        }
    }
}

async fn run(args: &Args, url: &str) -> Result<()> {
    // Classifier artifacts are validated before the first network request so
    // a missing model never costs a probe round-trip.
    let classifier = VulnClassifier::load(&args.model, &args.tokenizer, &args.labels)
        .context("failed to load classifier")?;

    create_output_dirs(&args.output_dir).context("failed to create output directory")?;

    let client = Arc::new(HttpClient::new(REQUEST_TIMEOUT_SECS)?);
    let analyzer = UrlAnalyzer::new(client, classifier);
    let result = analyzer.analyze(url).await;

    print_summary(&result, args.verbose);

    let basename = report_basename(&result.url);
    let mut saved: Vec<PathBuf> = Vec::new();

    if !args.no_csv {
        match CsvReporter::new().generate(&result, &args.output_dir, &basename) {
            Ok(files) => {
                saved.extend(files);
                println!("CSV reports generated successfully");
            }
            Err(e) => error!("Failed to save CSV report: {}", e),
        }
    }

    if !args.no_pdf {
        match PdfReporter::new().generate(&result, &args.output_dir, &basename) {
            Ok(file) => {
                saved.push(file);
                println!("PDF report generated successfully");
            }
            Err(e) => error!("Failed to save PDF report: {}", e),
        }
    }

    if saved.is_empty() {
        println!("\nNo reports were generated");
    } else {
        println!("\nAnalysis complete! Reports saved:");
        for file in &saved {
            if let Some(name) = file.file_name() {
                println!("   {}", name.to_string_lossy());
            }
        }
        println!("\nAll reports saved in: {}", args.output_dir.display());
    }

    info!(url = %result.url, "run finished");
    Ok(())
}

/// Targets given without a scheme are assumed to be HTTPS.
fn normalize_target(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

fn print_summary(result: &AnalysisResult, verbose: bool) {
    let rule = "=".repeat(60);
    println!("\n{}", rule);
    println!("WEBSITE VULNERABILITY ANALYSIS REPORT");
    println!("{}", rule);
    println!("URL: {}", result.url);
    println!("Analysis Time: {}", result.analysis_timestamp);
    println!("Risk Level: {}", result.risk_level);
    println!(
        "Predicted Vulnerability: {}",
        result.classification.predicted_label
    );
    println!(
        "Confidence: {:.2}%",
        result.classification.confidence * 100.0
    );

    println!("\nTop 3 Predictions:");
    for (rank, (label, confidence)) in result.classification.top_predictions.iter().enumerate() {
        println!("  {}. {} ({:.2}%)", rank + 1, label, confidence * 100.0);
    }

    println!("\nSecurity Recommendations:");
    for (index, recommendation) in result.recommendations.iter().enumerate() {
        println!("  {}. {}", index + 1, recommendation);
    }

    if verbose {
        println!("\nExtracted Features:");
        for (name, value) in result.features.slots() {
            if !value.is_empty() {
                let preview: String = value.chars().take(100).collect();
                println!("  {}: {}...", name, preview);
            }
        }
    }

    println!("\n{}", rule);
}
