//! Physical removal of expired cache rows.
//!
//! Expiry is advisory and eventual: reads already filter or refuse stale
//! rows, so this sweep only reclaims space. It runs on an interval from a
//! background task spawned at startup.

use anyhow::Result;
use sqlx::PgPool;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct SweepStats {
    pub recipes: u64,
    pub responses: u64,
}

/// Delete recipe documents older than `max_age` and HTTP cache entries past
/// their own per-entry freshness window.
pub async fn purge_expired(pool: &PgPool, max_age: Duration) -> Result<SweepStats> {
    let recipes = sqlx::query(
        "DELETE FROM recipe_cache WHERE updated_at <= now() - make_interval(secs => $1)",
    )
    .bind(max_age.as_secs_f64())
    .execute(pool)
    .await?
    .rows_affected();

    let responses = sqlx::query(
        "DELETE FROM http_cache \
         WHERE stored_at + max_age_ms * interval '1 millisecond' < now()",
    )
    .execute(pool)
    .await?
    .rows_affected();

    Ok(SweepStats { recipes, responses })
}
