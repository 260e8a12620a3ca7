//! Persisted cache of recipe detail documents, keyed by recipe id.
//!
//! Reads degrade to a miss on storage failure; writes and removals go
//! through the [`Writeback`] queue so they can never block or fail the
//! caller's read path. Completeness of a returned record is judged by the
//! caller, not here.

use crate::cache::writeback::Writeback;
use crate::spoonacular::types::Recipe;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Durable storage for recipe documents.
///
/// Implementations must make `upsert` atomic per id (a concurrent upsert
/// race must never leave two documents for one id) and must stop returning
/// a document from `find` once it is older than the configured max age.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    async fn find(&self, id: i64) -> anyhow::Result<Option<Recipe>>;
    /// Full replace-or-insert keyed by `recipe.id`, refreshing the
    /// document's timestamp.
    async fn upsert(&self, recipe: &Recipe) -> anyhow::Result<()>;
    /// Delete every document for `id`, returning how many were removed.
    async fn delete(&self, id: i64) -> anyhow::Result<u64>;
}

/// Cache facade over a [`RecipeStore`].
#[derive(Clone)]
pub struct RecipeCache {
    store: Arc<dyn RecipeStore>,
    writeback: Writeback,
}

impl RecipeCache {
    pub fn new(store: Arc<dyn RecipeStore>, writeback: Writeback) -> Self {
        Self { store, writeback }
    }

    /// Point lookup by id. Storage failures are logged and reported as a
    /// miss so the caller falls through to an upstream fetch.
    pub async fn get(&self, id: i64) -> Option<Recipe> {
        match self.store.find(id).await {
            Ok(Some(recipe)) => {
                debug!(id, "recipe cache hit");
                Some(recipe)
            }
            Ok(None) => {
                debug!(id, "recipe cache miss");
                None
            }
            Err(e) => {
                warn!(id, error = %e, "recipe cache read failed, treating as miss");
                None
            }
        }
    }

    /// Queue a full replace of the cached document. Fire-and-forget.
    pub fn put(&self, recipe: Recipe) {
        let store = self.store.clone();
        self.writeback.submit("recipe put", async move {
            let id = recipe.id;
            store.upsert(&recipe).await?;
            debug!(id, "recipe cache saved");
            Ok(())
        });
    }

    /// Queue a write for each record independently.
    pub fn put_many(&self, recipes: Vec<Recipe>) {
        for recipe in recipes {
            self.put(recipe);
        }
    }

    /// Queue removal of every cached document for `id`. Fire-and-forget.
    pub fn remove(&self, id: i64) {
        let store = self.store.clone();
        self.writeback.submit("recipe remove", async move {
            let removed = store.delete(id).await?;
            debug!(id, removed, "recipe cache removed");
            Ok(())
        });
    }
}
