// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Detection Pattern Tables
 * Immutable vulnerability-indicator tables shared by extractor and probes
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// A category of vulnerability indicators: a tag plus the compiled patterns
/// that signal it. Pattern source strings are retained because probe finding
/// text attributes matches to the pattern that fired.
pub struct PatternCategory {
    pub tag: &'static str,
    pub patterns: Vec<(&'static str, Regex)>,
}

fn compile(sources: &[&'static str]) -> Vec<(&'static str, Regex)> {
    sources
        .iter()
        .map(|src| {
            // Tables are fixed at build time; a non-compiling pattern is a
            // programming error, not a runtime condition.
            (*src, Regex::new(src).expect("invalid built-in pattern"))
        })
        .collect()
}

/// Error-pattern tables applied to the lower-cased response body by the
/// passive extractor. Category order is fixed: the `errors` slot preserves
/// it and the classifier's training text depends on it.
pub static VULN_PATTERNS: Lazy<Vec<PatternCategory>> = Lazy::new(|| {
    vec![
        PatternCategory {
            tag: "sql_injection",
            patterns: compile(&[
                r"mysql_error",
                r"ora-\d{5}",
                r"microsoft ole db provider",
                r"unclosed quotation mark",
                r"syntax error.*query",
            ]),
        },
        PatternCategory {
            tag: "xss",
            patterns: compile(&[
                r"<script.*?>",
                r"javascript:",
                r"onerror=",
                r"onload=",
                r"alert\(",
                r"document\.cookie",
            ]),
        },
        PatternCategory {
            tag: "path_traversal",
            patterns: compile(&[r"\.\.//", r"\.\.\\", r"%2e%2e%2f", r"%2e%2e\\"]),
        },
        PatternCategory {
            tag: "server_disclosure",
            patterns: compile(&[
                r"server:\s*apache/[\d.]+",
                r"server:\s*nginx/[\d.]+",
                r"server:\s*microsoft-iis/[\d.]+",
                r"x-powered-by:",
            ]),
        },
        PatternCategory {
            tag: "debug_info",
            patterns: compile(&[
                r"stack trace",
                r"debug mode",
                r"exception.*?at\s",
                r"warning:",
                r"notice:",
                r"fatal error",
            ]),
        },
    ]
});

/// Static XSS indicators checked against the lower-cased body by the XSS
/// probe: script tags, javascript: URIs, inline event handler assignments,
/// alert calls, cookie access, embed tags.
pub static XSS_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    compile(&[
        r"<script.*?>",
        r"javascript:",
        r"onerror\s*=",
        r"onload\s*=",
        r"alert\s*\(",
        r"document\.cookie",
        r"<img[^>]+src\s*=",
        r"<iframe.*?>",
        r"onclick\s*=",
        r"onmouseover\s*=",
        r"onfocus\s*=",
        r"oninput\s*=",
        r"onchange\s*=",
    ])
});

/// Script-hygiene indicators: insecure http: script sources and dangerous
/// JavaScript sinks.
pub static SCRIPT_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    compile(&[
        r#"<script[^>]*src=["']http:"#,
        r"eval\(",
        r"document\.write\(",
        r"innerHTML\s*=",
    ])
});

/// Response headers counted as security headers by the passive extractor.
pub const SECURITY_HEADERS: &[&str] = &[
    "x-frame-options",
    "x-xss-protection",
    "x-content-type-options",
    "strict-transport-security",
    "content-security-policy",
];

/// Substrings that mark an anchor href as security-sensitive.
pub const SENSITIVE_LINK_MARKERS: &[&str] = &["id=", "user=", "admin", "login", "upload"];
