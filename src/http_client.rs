// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Probe HTTP Client
 * Shared connection-pooled client for the passive fetch and active probes
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

/// Realistic browser User-Agent so probe traffic is not trivially filtered.
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Maximum response body size (10MB) to prevent memory exhaustion.
const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

const POOL_IDLE_PER_HOST: usize = 8;

/// HTTP client shared across the passive fetch and all probes of one run.
///
/// Certificate validation is deliberately disabled: the probes exist to
/// examine hosts that are misconfigured, self-signed or expired, and a
/// validation failure would blind every HTTP-level check against exactly the
/// targets this tool is pointed at. The TLS probe performs its own handshake
/// with the default trust policy and reports certificate problems as
/// findings instead.
///
/// There is no retry layer: every probe operation is attempted exactly once
/// and failure degrades to a diagnostic string upstream.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

/// Response snapshot consumed by the extractor and probes. Header names come
/// back lower-cased from reqwest; order and duplicates are preserved because
/// the `headers` feature slot is order-sensitive.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// First value of the named (lower-case) header.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

impl HttpClient {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let timeout = Duration::from_secs(timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(BROWSER_USER_AGENT)
            .pool_max_idle_per_host(POOL_IDLE_PER_HOST)
            .tcp_keepalive(Duration::from_secs(60))
            .tcp_nodelay(true)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, timeout })
    }

    /// GET with the client's default timeout.
    pub async fn get(&self, url: &str) -> Result<HttpResponse> {
        self.get_with_timeout(url, self.timeout).await
    }

    /// GET with an explicit per-request timeout (active reflection tests use
    /// a tighter budget than the page fetch).
    pub async fn get_with_timeout(&self, url: &str, timeout: Duration) -> Result<HttpResponse> {
        let response = self.client.get(url).timeout(timeout).send().await?;
        Self::snapshot(response).await
    }

    /// POST form data with an explicit per-request timeout.
    pub async fn post_form(
        &self,
        url: &str,
        params: &[(String, String)],
        timeout: Duration,
    ) -> Result<HttpResponse> {
        let response = self
            .client
            .post(url)
            .timeout(timeout)
            .form(params)
            .send()
            .await?;
        Self::snapshot(response).await
    }

    async fn snapshot(response: reqwest::Response) -> Result<HttpResponse> {
        let status_code = response.status().as_u16();

        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .filter_map(|(k, v)| {
                v.to_str()
                    .ok()
                    .map(|value| (k.as_str().to_string(), value.to_string()))
            })
            .collect();

        // A fault while streaming the body is a failed request, not an
        // empty-bodied success.
        let body_bytes = response.bytes().await?;
        let body = if body_bytes.len() > MAX_BODY_SIZE {
            String::from_utf8_lossy(&body_bytes[..MAX_BODY_SIZE]).to_string()
        } else {
            String::from_utf8_lossy(&body_bytes).to_string()
        };

        Ok(HttpResponse {
            status_code,
            headers,
            body,
        })
    }
}
