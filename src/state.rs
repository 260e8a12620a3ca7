//! Application state shared across the web handlers and background tasks.
//!
//! Everything here is constructed once at startup and threaded through
//! explicitly — no lazily-initialized globals. The database pool is the
//! single store connection, created in `App::new` and reused for the life
//! of the process.

use crate::cache::writeback::Writeback;
use crate::spoonacular::RecipeQueries;
use sqlx::PgPool;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub recipes: RecipeQueries,
    pub writeback: Writeback,
}

impl AppState {
    pub fn new(db_pool: PgPool, recipes: RecipeQueries, writeback: Writeback) -> Self {
        Self {
            db_pool,
            recipes,
            writeback,
        }
    }

    /// Spawn a background task that physically removes expired cache rows
    /// every `interval`. The task runs until the process exits.
    ///
    /// Reads never observe expired rows regardless of this sweep; it only
    /// reclaims space, so failures are logged and the next tick retries.
    pub fn spawn_cache_sweeper(&self, interval: Duration, max_age: Duration) {
        let pool = self.db_pool.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // skip the immediate first tick
            loop {
                ticker.tick().await;
                match crate::data::expiry::purge_expired(&pool, max_age).await {
                    Ok(stats) => {
                        if stats.recipes > 0 || stats.responses > 0 {
                            info!(
                                recipes = stats.recipes,
                                responses = stats.responses,
                                "expired cache rows removed"
                            );
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "cache expiry sweep failed");
                    }
                }
            }
        });
    }
}
