//! Postgres-backed recipe document store.
//!
//! Documents live as JSONB in the `recipe_cache` table with the id and
//! write timestamp broken out as indexed columns. `find` filters rows past
//! the configured max age so an expired document is never observable, even
//! before the background sweep physically removes it.

use crate::cache::recipe::RecipeStore;
use crate::spoonacular::types::Recipe;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use std::time::Duration;

pub struct PgRecipeStore {
    pool: PgPool,
    max_age: Duration,
}

impl PgRecipeStore {
    pub fn new(pool: PgPool, max_age: Duration) -> Self {
        Self { pool, max_age }
    }
}

#[async_trait]
impl RecipeStore for PgRecipeStore {
    async fn find(&self, id: i64) -> Result<Option<Recipe>> {
        let row: Option<(serde_json::Value,)> = sqlx::query_as(
            "SELECT document FROM recipe_cache \
             WHERE id = $1 AND updated_at > now() - make_interval(secs => $2)",
        )
        .bind(id)
        .bind(self.max_age.as_secs_f64())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some((document,)) => {
                let recipe = serde_json::from_value(document)
                    .with_context(|| format!("corrupt cached recipe document for id {id}"))?;
                Ok(Some(recipe))
            }
            None => Ok(None),
        }
    }

    async fn upsert(&self, recipe: &Recipe) -> Result<()> {
        let document = serde_json::to_value(recipe).context("failed to serialize recipe")?;
        sqlx::query(
            "INSERT INTO recipe_cache (id, document, updated_at) \
             VALUES ($1, $2, now()) \
             ON CONFLICT (id) \
             DO UPDATE SET document = EXCLUDED.document, updated_at = now()",
        )
        .bind(recipe.id)
        .bind(document)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM recipe_cache WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
