//! Outbound HTTP transport behind a trait seam.
//!
//! The client talks to [`Transport`] rather than reqwest directly so that
//! tests can script upstream responses and count calls.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use std::time::Duration;
use url::Url;

/// A raw upstream response: status line, headers and unparsed body.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub status_text: String,
    /// Headers in arrival order, names lowercased by the HTTP layer.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup, first match wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Issues a single GET and returns the full response.
///
/// Implementations must not embed the request URL in returned errors — the
/// URL carries the API key at this layer.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> anyhow::Result<RawResponse>;
}

/// Production transport over a shared `reqwest::Client`.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a client with the given request deadline. The upstream API has
    /// no SLA, so a deadline keeps a wedged request from holding a caller
    /// indefinitely.
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &Url) -> anyhow::Result<RawResponse> {
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| anyhow::anyhow!(e.without_url()))
            .context("upstream request failed")?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| anyhow::anyhow!(e.without_url()))
            .context("failed to read upstream response body")?;

        Ok(RawResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let response = RawResponse {
            status: 200,
            status_text: "OK".to_string(),
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("X-API-Quota-Left".to_string(), "149.5".to_string()),
            ],
            body: String::new(),
        };
        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.header("x-api-quota-left"), Some("149.5"));
        assert_eq!(response.header("x-missing"), None);
    }

    #[test]
    fn success_covers_the_2xx_range() {
        let mut response = RawResponse {
            status: 200,
            status_text: String::new(),
            headers: Vec::new(),
            body: String::new(),
        };
        assert!(response.is_success());
        response.status = 204;
        assert!(response.is_success());
        response.status = 301;
        assert!(!response.is_success());
        response.status = 404;
        assert!(!response.is_success());
    }
}
