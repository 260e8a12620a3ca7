//! spoonful — a caching proxy service for the Spoonacular recipe API.
//!
//! Recipe queries go cache-first against two PostgreSQL-backed caches: a
//! recipe document cache keyed by id (with partial-record refetch
//! semantics) and a must-revalidate HTTP response cache keyed by a request
//! fingerprint. Cache writes are asynchronous and best-effort; they never
//! block or fail the request a caller is waiting on.

pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod logging;
pub mod spoonacular;
pub mod state;
pub mod web;
