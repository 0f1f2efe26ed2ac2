// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Report Output
 * Output directory bootstrap and report file naming
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

pub mod csv;
pub mod pdf;

use std::fs;
use std::path::Path;

use chrono::Local;
use tracing::info;
use url::Url;

use crate::errors::TriageError;

/// Create `<output_dir>/csv` and `<output_dir>/pdf` up front so individual
/// report writers never race on directory creation.
pub fn create_output_dirs(output_dir: &Path) -> Result<(), TriageError> {
    fs::create_dir_all(output_dir.join("csv"))?;
    fs::create_dir_all(output_dir.join("pdf"))?;
    info!(dir = %output_dir.display(), "output directory created");
    Ok(())
}

/// Base filename for one run's reports: the target's host (with port, when
/// present) with `.` and `:` flattened to `_`, plus a second-resolution
/// timestamp.
pub fn report_basename(target_url: &str) -> String {
    let netloc = Url::parse(target_url)
        .ok()
        .and_then(|u| {
            u.host_str().map(|host| match u.port() {
                Some(port) => format!("{}:{}", host, port),
                None => host.to_string(),
            })
        })
        .unwrap_or_else(|| "unknown_host".to_string());
    let sanitized = netloc.replace(['.', ':'], "_");
    format!("{}_{}", sanitized, Local::now().format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basename_flattens_host_and_port() {
        let name = report_basename("https://app.example.com:8443/login");
        assert!(name.starts_with("app_example_com_8443_"));
        assert!(!name.contains('.'));
        assert!(!name.contains(':'));
    }

    #[test]
    fn basename_survives_unparseable_urls() {
        let name = report_basename("not a url");
        assert!(name.starts_with("unknown_host_"));
    }
}
