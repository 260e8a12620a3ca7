//! Database health check query.

use anyhow::Result;
use sqlx::PgPool;

/// Verify the database connection is alive and answering queries.
pub async fn ping(pool: &PgPool) -> Result<()> {
    sqlx::query_scalar::<_, i64>("SELECT 1::bigint")
        .fetch_one(pool)
        .await?;
    Ok(())
}

/// Number of cached recipe documents, expired rows included.
pub async fn cached_recipe_count(pool: &PgPool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM recipe_cache")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
