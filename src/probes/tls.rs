// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - TLS/Certificate Probe
 * One handshake under the default trust policy; expiry, cipher and
 * protocol-version findings
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::sync::Arc;

use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::{rustls, TlsConnector};
use tracing::{debug, warn};
use url::Url;
use x509_parser::prelude::*;

use super::PROBE_TIMEOUT;
use crate::types::ProbeOutcome;

/// Sentinel returned when the session raised no findings.
pub const NO_ISSUES: &str = "No SSL issues detected";

/// Certificates expiring within this many days are flagged.
const EXPIRY_WARNING_DAYS: i64 = 30;

/// Protocol versions that raise no finding.
const ACCEPTED_VERSIONS: &[&str] = &["TLSv1.2", "TLSv1.3"];

pub async fn probe(url: &str) -> ProbeOutcome {
    match probe_inner(url).await {
        Ok(outcome) => outcome,
        Err(ProbeFault::TimedOut) => {
            warn!("SSL check timed out for {}", url);
            ProbeOutcome::Degraded("SSL check timed out (connection took too long)".to_string())
        }
        Err(ProbeFault::Other(reason)) => {
            warn!("SSL check failed for {}: {}", url, reason);
            ProbeOutcome::Degraded(format!("SSL check error: {}", reason))
        }
    }
}

/// Connection-level timeouts get their own diagnostic; everything else
/// degrades to the generic error form.
enum ProbeFault {
    TimedOut,
    Other(String),
}

fn fault<E: std::fmt::Display>(e: E) -> ProbeFault {
    ProbeFault::Other(e.to_string())
}

async fn probe_inner(url: &str) -> Result<ProbeOutcome, ProbeFault> {
    let parsed = Url::parse(url).map_err(fault)?;
    let host = parsed
        .host_str()
        .ok_or_else(|| ProbeFault::Other("URL has no host".to_string()))?
        .to_string();
    let port = parsed.port().unwrap_or(443);

    debug!("Running TLS probe against {}:{}", host, port);

    // Default trust policy on purpose: an untrusted or invalid chain is a
    // result here, not an obstacle.
    let mut root_store = rustls::RootCertStore::empty();
    root_store.add_trust_anchors(webpki_roots::TLS_SERVER_ROOTS.iter().map(|ta| {
        rustls::OwnedTrustAnchor::from_subject_spki_name_constraints(
            ta.subject,
            ta.spki,
            ta.name_constraints,
        )
    }));
    let config = rustls::ClientConfig::builder()
        .with_safe_defaults()
        .with_root_certificates(root_store)
        .with_no_client_auth();
    let connector = TlsConnector::from(Arc::new(config));
    let server_name = rustls::ServerName::try_from(host.as_str()).map_err(fault)?;

    let tcp = timeout(PROBE_TIMEOUT, TcpStream::connect((host.as_str(), port)))
        .await
        .map_err(|_| ProbeFault::TimedOut)?
        .map_err(fault)?;
    let tls_stream = timeout(PROBE_TIMEOUT, connector.connect(server_name, tcp))
        .await
        .map_err(|_| ProbeFault::TimedOut)?
        .map_err(fault)?;

    let (_, session) = tls_stream.get_ref();

    let certs = session.peer_certificates();
    let leaf = match certs.and_then(|chain| chain.first()) {
        Some(cert) => cert,
        None => {
            return Ok(ProbeOutcome::Degraded(
                "SSL certificate data unavailable".to_string(),
            ))
        }
    };

    let days_to_expiry = match certificate_days_to_expiry(&leaf.0) {
        Ok(days) => days,
        Err(diagnostic) => return Ok(ProbeOutcome::Degraded(diagnostic)),
    };

    let cipher = session
        .negotiated_cipher_suite()
        .map(|suite| format!("{:?}", suite.suite()))
        .unwrap_or_default();
    let version = session
        .protocol_version()
        .map(version_name)
        .unwrap_or_default();

    let findings = evaluate_session(days_to_expiry, &cipher, &version);
    if findings.is_empty() {
        Ok(ProbeOutcome::Finding(NO_ISSUES.to_string()))
    } else {
        Ok(ProbeOutcome::Finding(findings.join(" ")))
    }
}

/// Days until the leaf certificate's notAfter, negative when already
/// expired. Distinct diagnostics for an unreadable certificate and for an
/// undecodable expiration value.
fn certificate_days_to_expiry(der: &[u8]) -> Result<i64, String> {
    let (_, certificate) = X509Certificate::from_der(der)
        .map_err(|_| "SSL certificate data unavailable".to_string())?;

    let not_after = certificate.validity().not_after;
    let expiry_ts = not_after.timestamp();
    if expiry_ts == 0 {
        return Err(format!("Invalid expiration date format: {}", not_after));
    }

    let now_ts = chrono::Utc::now().timestamp();
    Ok((expiry_ts - now_ts).div_euclid(86_400))
}

/// Pure evaluation of a negotiated session. Split out so expiry, cipher and
/// version findings are testable without a live handshake.
pub fn evaluate_session(days_to_expiry: i64, cipher: &str, version: &str) -> Vec<String> {
    let mut findings = Vec::new();

    if days_to_expiry < EXPIRY_WARNING_DAYS {
        findings.push(format!(
            "SSL certificate expires in {} days",
            days_to_expiry
        ));
    }

    if cipher.contains("RC4") || cipher.contains("3DES") {
        findings.push(format!("Weak cipher detected: {}", cipher));
    }

    if !version.is_empty() && !ACCEPTED_VERSIONS.contains(&version) {
        findings.push(format!("Insecure TLS version: {}", version));
    }

    findings
}

fn version_name(version: rustls::ProtocolVersion) -> String {
    match version {
        rustls::ProtocolVersion::TLSv1_2 => "TLSv1.2".to_string(),
        rustls::ProtocolVersion::TLSv1_3 => "TLSv1.3".to_string(),
        other => format!("{:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn near_expiry_certificate_is_flagged() {
        let findings = evaluate_session(10, "TLS13_AES_256_GCM_SHA384", "TLSv1.3");
        assert_eq!(findings, vec!["SSL certificate expires in 10 days"]);
    }

    #[test]
    fn expired_certificate_reports_negative_days() {
        let findings = evaluate_session(-3, "TLS13_AES_256_GCM_SHA384", "TLSv1.3");
        assert_eq!(findings, vec!["SSL certificate expires in -3 days"]);
    }

    #[test]
    fn weak_cipher_is_flagged_by_name() {
        let findings = evaluate_session(365, "TLS_ECDHE_RSA_WITH_RC4_128_SHA", "TLSv1.2");
        assert_eq!(
            findings,
            vec!["Weak cipher detected: TLS_ECDHE_RSA_WITH_RC4_128_SHA"]
        );
    }

    #[test]
    fn legacy_protocol_version_is_flagged() {
        let findings = evaluate_session(365, "TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256", "TLSv1.1");
        assert_eq!(findings, vec!["Insecure TLS version: TLSv1.1"]);
    }

    #[test]
    fn modern_session_yields_no_findings() {
        assert!(evaluate_session(365, "TLS13_AES_128_GCM_SHA256", "TLSv1.3").is_empty());
        assert!(evaluate_session(365, "TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384", "TLSv1.2")
            .is_empty());
    }

    #[test]
    fn findings_combine_in_fixed_order() {
        let findings = evaluate_session(5, "TLS_RSA_WITH_3DES_EDE_CBC_SHA", "TLSv1.0");
        assert_eq!(findings.len(), 3);
        assert!(findings[0].starts_with("SSL certificate expires"));
        assert!(findings[1].starts_with("Weak cipher"));
        assert!(findings[2].starts_with("Insecure TLS version"));
    }
}
