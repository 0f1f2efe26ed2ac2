// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Passive Feature Extractor
 * Derives the FeatureRecord from a single page fetch
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

use crate::http_client::{HttpClient, HttpResponse};
use crate::patterns::{SECURITY_HEADERS, SENSITIVE_LINK_MARKERS, VULN_PATTERNS};
use crate::types::FeatureRecord;

/// Visible page text is capped at this many characters.
const CONTENT_LIMIT: usize = 2000;

/// Only the first this-many anchors are inspected for sensitive links.
const LINK_LIMIT: usize = 50;

/// Extract passive features from the target.
///
/// Never fails: a network fault lands in the `errors` slot as a
/// `connection error ...` string and every other slot keeps whatever was
/// derivable without the response.
pub async fn extract_features(url: &str, client: &HttpClient) -> FeatureRecord {
    let mut features = FeatureRecord::default();

    debug!("Extracting passive features from {}", url);

    match Url::parse(url) {
        Ok(parsed) => {
            let host = parsed.host_str().unwrap_or("");
            let netloc = match parsed.port() {
                Some(port) => format!("{}:{}", host, port),
                None => host.to_string(),
            };
            features.url_analysis = format!(
                "domain {} path {} query {}",
                netloc,
                parsed.path(),
                parsed.query().unwrap_or("")
            );
        }
        Err(e) => {
            warn!("URL parse failed for {}: {}", url, e);
            features.errors = format!("analysis error {}", e);
            return features;
        }
    }

    let response = match client.get(url).await {
        Ok(response) => response,
        Err(e) => {
            warn!("Request failed for {}: {}", url, e);
            features.errors = format!("connection error {}", e);
            return features;
        }
    };

    derive_from_response(&response, &mut features);
    features
}

/// Header, content, technology, form, link and error-pattern analysis over
/// an already-fetched response. Pure parsing, no I/O.
fn derive_from_response(response: &HttpResponse, features: &mut FeatureRecord) {
    // Header analysis. Names arrive lower-cased; values are lower-cased for
    // the headers slot but kept as sent in the security_headers slot.
    let mut headers_text = Vec::with_capacity(response.headers.len());
    for (name, value) in &response.headers {
        headers_text.push(format!("{} {}", name, value.to_lowercase()));

        if SECURITY_HEADERS.contains(&name.as_str()) {
            features.security_headers.push_str(name);
            features.security_headers.push(' ');
            features.security_headers.push_str(value);
            features.security_headers.push(' ');
        }
    }
    features.headers = headers_text.join(" ");

    let content = &response.body;
    let content_lower = content.to_lowercase();
    let document = Html::parse_document(content);

    // Visible text, tags stripped.
    let visible_text = document
        .root_element()
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    features.content = visible_text.chars().take(CONTENT_LIMIT).collect();

    // Technology fingerprinting.
    let mut tech_indicators: Vec<String> = Vec::new();
    if content.contains("wp-content") || content_lower.contains("wordpress") {
        tech_indicators.push("wordpress".to_string());
    }
    for marker in ["drupal", "joomla", "react", "angular", "vue"] {
        if content_lower.contains(marker) {
            tech_indicators.push(marker.to_string());
        }
    }
    if let Some(server) = response.header("server") {
        if !server.is_empty() {
            tech_indicators.push(format!("server {}", server.to_lowercase()));
        }
    }
    if let Some(powered_by) = response.header("x-powered-by") {
        if !powered_by.is_empty() {
            tech_indicators.push(format!("powered-by {}", powered_by.to_lowercase()));
        }
    }
    features.technologies = tech_indicators.join(" ");

    // Form inventory: method/action per form, then type/name per field.
    let form_selector = Selector::parse("form").expect("static selector");
    let field_selector = Selector::parse("input, textarea").expect("static selector");
    let mut form_analysis: Vec<String> = Vec::new();
    for form in document.select(&form_selector) {
        let method = form
            .value()
            .attr("method")
            .unwrap_or("get")
            .to_lowercase();
        let action = form.value().attr("action").unwrap_or("");
        form_analysis.push(format!("form {} {}", method, action));

        for field in form.select(&field_selector) {
            let field_type = field.value().attr("type").unwrap_or("text").to_lowercase();
            let field_name = field.value().attr("name").unwrap_or("").to_lowercase();
            form_analysis.push(format!("input {} {}", field_type, field_name));
        }
    }
    features.forms = form_analysis.join(" ");

    // Sensitive-link inventory over the first LINK_LIMIT anchors.
    let anchor_selector = Selector::parse("a[href]").expect("static selector");
    let mut link_analysis: Vec<String> = Vec::new();
    for anchor in document.select(&anchor_selector).take(LINK_LIMIT) {
        if let Some(href) = anchor.value().attr("href") {
            let href = href.to_lowercase();
            if SENSITIVE_LINK_MARKERS.iter().any(|m| href.contains(m)) {
                link_analysis.push(format!("link {}", href));
            }
        }
    }
    features.links = link_analysis.join(" ");

    // Error-pattern detection. One token per matching pattern per category;
    // repeats across patterns of the same category are preserved, the
    // classifier's training text carries the same multiplicity.
    let mut error_indicators: Vec<String> = Vec::new();
    for category in VULN_PATTERNS.iter() {
        for (_, pattern) in &category.patterns {
            if pattern.is_match(&content_lower) {
                error_indicators.push(format!("{} pattern detected", category.tag));
            }
        }
    }
    features.errors = error_indicators.join(" ");
}
