//! Postgres persistence: store implementations and maintenance queries.

pub mod expiry;
pub mod health;
pub mod http_cache;
pub mod recipes;

pub use http_cache::PgHttpCacheStore;
pub use recipes::PgRecipeStore;
