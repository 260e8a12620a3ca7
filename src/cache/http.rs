//! Generic cache of upstream HTTP responses, keyed by request fingerprint.
//!
//! Follows the `Cache-Control: must-revalidate` discipline: a fresh entry
//! may be served without contacting upstream, a stale entry is never served
//! as-is — the caller refetches and the entry is rewritten with a new
//! `stored_at`. Freshness is a pure function of the entry so the boundary
//! behavior is testable without a clock fixture.

use crate::cache::writeback::Writeback;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// A cached upstream response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpCacheEntry {
    /// Fingerprint of the request this response answers; the storage key.
    pub request_hash: String,
    /// When the request was sent.
    pub requested_at: DateTime<Utc>,
    /// When the response arrived.
    pub received_at: DateTime<Utc>,
    pub status: u16,
    pub status_text: String,
    /// Response headers in arrival order.
    pub headers: Vec<(String, String)>,
    /// Raw response body; the cache never parses it.
    pub body: String,
    /// Last time this entry was written (revalidated).
    pub stored_at: DateTime<Utc>,
    /// Milliseconds the entry may be served without revalidation.
    pub max_age_ms: i64,
}

impl HttpCacheEntry {
    /// The request fingerprint this entry answers.
    pub fn request_hash(&self) -> &str {
        &self.request_hash
    }

    /// An entry is fresh while `now - stored_at <= max_age`, inclusive at
    /// the boundary.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        let age_ms = now.signed_duration_since(self.stored_at).num_milliseconds();
        age_ms <= self.max_age_ms
    }
}

/// Durable storage for cached responses. Upsert must be atomic per hash.
#[async_trait]
pub trait HttpCacheStore: Send + Sync {
    async fn find(&self, request_hash: &str) -> anyhow::Result<Option<HttpCacheEntry>>;
    async fn upsert(&self, entry: &HttpCacheEntry) -> anyhow::Result<()>;
}

/// Cache facade over an [`HttpCacheStore`].
#[derive(Clone)]
pub struct HttpCache {
    store: Arc<dyn HttpCacheStore>,
    writeback: Writeback,
}

impl HttpCache {
    pub fn new(store: Arc<dyn HttpCacheStore>, writeback: Writeback) -> Self {
        Self { store, writeback }
    }

    /// Look up an entry by fingerprint. Freshness is the caller's call, via
    /// [`HttpCacheEntry::is_fresh`]. Storage failures degrade to a miss.
    pub async fn lookup(&self, request_hash: &str) -> Option<HttpCacheEntry> {
        match self.store.find(request_hash).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!(request_hash, error = %e, "http cache read failed, treating as miss");
                None
            }
        }
    }

    /// Queue an upsert of the entry, stamping `stored_at` now.
    /// Fire-and-forget.
    pub fn store(&self, mut entry: HttpCacheEntry) {
        entry.stored_at = Utc::now();
        let store = self.store.clone();
        self.writeback.submit("http cache store", async move {
            store.upsert(&entry).await?;
            debug!(request_hash = %entry.request_hash, "http cache saved");
            Ok(())
        });
    }
}
