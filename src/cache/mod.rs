//! Cache layers for upstream API data.
//!
//! Two caches with different keys and different staleness rules:
//!
//! - [`recipe::RecipeCache`] — recipe documents keyed by id, where an entry
//!   can be present but *incomplete* (summary-only) and the caller decides
//!   whether to refetch.
//! - [`http::HttpCache`] — raw upstream responses keyed by a request
//!   [`fingerprint`], served only while fresh (must-revalidate).
//!
//! All writes go through the shared [`writeback::Writeback`] queue.

pub mod fingerprint;
pub mod http;
pub mod recipe;
pub mod writeback;
