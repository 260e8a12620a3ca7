//! Spoonacular API client: transport, typed errors, data types, and the
//! cache-aware query layer.

pub mod client;
pub mod errors;
pub mod json;
pub mod queries;
pub mod transport;
pub mod types;

pub use client::SpoonacularApi;
pub use errors::SpoonacularError;
pub use queries::RecipeQueries;
