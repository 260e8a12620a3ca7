//! Web API module: router, handlers, and error mapping.

pub mod error;
pub mod recipes;
pub mod routes;
pub mod status;

pub use routes::create_router;
