//! Low-level Spoonacular API client.
//!
//! One entry point: [`SpoonacularApi::request`]. It normalizes and signs
//! the outbound request, consults the fingerprint-keyed HTTP cache
//! (must-revalidate), and reports quota usage from the response headers.
//! Interpretation of the response status is left to the query layer.

use crate::cache::fingerprint::{fingerprint, is_secret_param};
use crate::cache::http::{HttpCache, HttpCacheEntry};
use crate::spoonacular::errors::SpoonacularError;
use crate::spoonacular::transport::{RawResponse, Transport};
use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Query parameter carrying the service credential.
const API_KEY_PARAM: &str = "apiKey";

/// Quota usage reported by the API on every response.
///
/// Values default to 0 when the headers are absent or unparseable.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuotaUsage {
    /// Points this request cost (`x-api-quota-request`).
    pub request: f64,
    /// Points remaining today (`x-api-quota-left`).
    pub left: f64,
}

impl QuotaUsage {
    pub fn from_response(response: &RawResponse) -> Self {
        let parse = |name: &str| {
            response
                .header(name)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .unwrap_or(0.0)
        };
        Self {
            request: parse("x-api-quota-request"),
            left: parse("x-api-quota-left"),
        }
    }
}

pub struct SpoonacularApi {
    base_url: Url,
    api_key: String,
    transport: Arc<dyn Transport>,
    http_cache: HttpCache,
    /// Freshness window stamped onto stored responses, in milliseconds.
    max_age_ms: i64,
}

impl SpoonacularApi {
    pub fn new(
        base_url: Url,
        api_key: String,
        transport: Arc<dyn Transport>,
        http_cache: HttpCache,
        max_age: Duration,
    ) -> Self {
        Self {
            base_url,
            api_key,
            transport,
            http_cache,
            max_age_ms: max_age.as_millis() as i64,
        }
    }

    /// Issue a GET against `endpoint`, serving from the HTTP cache while
    /// the stored response is fresh.
    ///
    /// Returns the raw response for *any* HTTP status — callers branch on
    /// `status` themselves (a detail fetch treats 404 differently from a
    /// search). Only 2xx responses are written back to the cache, so a
    /// negative answer is never remembered.
    pub async fn request(
        &self,
        endpoint: &str,
        params: Vec<(String, String)>,
    ) -> Result<RawResponse, SpoonacularError> {
        let request_hash = fingerprint("GET", &self.base_url, endpoint, &params);

        if let Some(entry) = self.http_cache.lookup(&request_hash).await {
            if entry.is_fresh(Utc::now()) {
                debug!(endpoint, request_hash = %request_hash, "http cache hit, skipping upstream");
                return Ok(RawResponse {
                    status: entry.status,
                    status_text: entry.status_text,
                    headers: entry.headers,
                    body: entry.body,
                });
            }
            debug!(endpoint, request_hash = %request_hash, "http cache entry stale, revalidating");
        }

        let url = self.build_url(endpoint, &params)?;
        let requested_at = Utc::now();
        let response = self.transport.get(&url).await?;
        let received_at = Utc::now();

        let quota = QuotaUsage::from_response(&response);
        debug!(
            endpoint,
            status = response.status,
            quota_request = quota.request,
            quota_left = quota.left,
            "upstream request completed"
        );

        if response.is_success() {
            self.http_cache.store(HttpCacheEntry {
                request_hash,
                requested_at,
                received_at,
                status: response.status,
                status_text: response.status_text.clone(),
                headers: response.headers.clone(),
                body: response.body.clone(),
                stored_at: received_at,
                max_age_ms: self.max_age_ms,
            });
        }

        Ok(response)
    }

    /// Typed error for a response status the caller does not handle.
    pub fn error_for(
        &self,
        endpoint: &str,
        params: &[(String, String)],
        response: &RawResponse,
    ) -> SpoonacularError {
        SpoonacularError::Api {
            status: response.status,
            url: self.sanitized_url(endpoint, params),
            headers: response.headers.clone(),
        }
    }

    /// Typed error for a 2xx body that failed to deserialize.
    pub fn parse_error_for(
        &self,
        endpoint: &str,
        params: &[(String, String)],
        response: &RawResponse,
        source: anyhow::Error,
    ) -> SpoonacularError {
        SpoonacularError::ParseFailed {
            status: response.status,
            url: self.sanitized_url(endpoint, params),
            source,
        }
    }

    /// The full request URL with the credential attached and all query
    /// parameters sorted. Never logged.
    fn build_url(&self, endpoint: &str, params: &[(String, String)]) -> Result<Url, SpoonacularError> {
        let mut url = self
            .base_url
            .join(endpoint)
            .with_context(|| format!("invalid endpoint path: {endpoint}"))?;

        let mut pairs: Vec<(&str, &str)> = params
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();
        pairs.push((API_KEY_PARAM, self.api_key.as_str()));
        pairs.sort();

        url.query_pairs_mut().clear().extend_pairs(pairs);
        Ok(url)
    }

    /// Credential-redacted URL (path plus non-secret query) for error
    /// messages and logs.
    fn sanitized_url(&self, endpoint: &str, params: &[(String, String)]) -> String {
        let Ok(mut url) = self.base_url.join(endpoint) else {
            return endpoint.to_string();
        };

        let mut pairs: Vec<(&str, &str)> = params
            .iter()
            .filter(|(name, _)| !is_secret_param(name))
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();
        pairs.sort();

        if pairs.is_empty() {
            return url.path().to_string();
        }
        url.query_pairs_mut().clear().extend_pairs(pairs);
        match url.query() {
            Some(query) => format!("{}?{query}", url.path()),
            None => url.path().to_string(),
        }
    }
}
