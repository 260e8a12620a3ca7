//! Postgres-backed storage for cached upstream HTTP responses.

use crate::cache::http::{HttpCacheEntry, HttpCacheStore};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PgHttpCacheStore {
    pool: PgPool,
}

impl PgHttpCacheStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Flat row shape; headers are stored as a JSONB array of pairs.
#[derive(sqlx::FromRow)]
struct HttpCacheRow {
    request_hash: String,
    requested_at: DateTime<Utc>,
    received_at: DateTime<Utc>,
    status: i32,
    status_text: String,
    headers: serde_json::Value,
    body: String,
    stored_at: DateTime<Utc>,
    max_age_ms: i64,
}

impl HttpCacheRow {
    fn into_entry(self) -> Result<HttpCacheEntry> {
        let headers =
            serde_json::from_value(self.headers).context("corrupt cached response headers")?;
        Ok(HttpCacheEntry {
            request_hash: self.request_hash,
            requested_at: self.requested_at,
            received_at: self.received_at,
            status: self.status as u16,
            status_text: self.status_text,
            headers,
            body: self.body,
            stored_at: self.stored_at,
            max_age_ms: self.max_age_ms,
        })
    }
}

#[async_trait]
impl HttpCacheStore for PgHttpCacheStore {
    async fn find(&self, request_hash: &str) -> Result<Option<HttpCacheEntry>> {
        let row: Option<HttpCacheRow> = sqlx::query_as(
            "SELECT request_hash, requested_at, received_at, status, status_text, \
                    headers, body, stored_at, max_age_ms \
             FROM http_cache WHERE request_hash = $1",
        )
        .bind(request_hash)
        .fetch_optional(&self.pool)
        .await?;

        row.map(HttpCacheRow::into_entry).transpose()
    }

    async fn upsert(&self, entry: &HttpCacheEntry) -> Result<()> {
        let headers =
            serde_json::to_value(&entry.headers).context("failed to serialize headers")?;
        sqlx::query(
            "INSERT INTO http_cache \
                 (request_hash, requested_at, received_at, status, status_text, \
                  headers, body, stored_at, max_age_ms) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             ON CONFLICT (request_hash) \
             DO UPDATE SET requested_at = EXCLUDED.requested_at, \
                           received_at = EXCLUDED.received_at, \
                           status = EXCLUDED.status, \
                           status_text = EXCLUDED.status_text, \
                           headers = EXCLUDED.headers, \
                           body = EXCLUDED.body, \
                           stored_at = EXCLUDED.stored_at, \
                           max_age_ms = EXCLUDED.max_age_ms",
        )
        .bind(&entry.request_hash)
        .bind(entry.requested_at)
        .bind(entry.received_at)
        .bind(entry.status as i32)
        .bind(&entry.status_text)
        .bind(headers)
        .bind(&entry.body)
        .bind(entry.stored_at)
        .bind(entry.max_age_ms)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
