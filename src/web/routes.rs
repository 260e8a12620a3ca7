//! Router construction and shared response utilities.

use axum::http::HeaderValue;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::web::{recipes, status};

/// Cache-Control presets for public endpoints.
pub mod cache {
    /// Recipe detail — the backing cache is good for an hour, but let
    /// clients revalidate sooner.
    pub const DETAIL: &str = "public, max-age=300, stale-while-revalidate=60";
    /// Search results.
    pub const SEARCH: &str = "public, max-age=60, stale-while-revalidate=60";
    /// Random picks — caching defeats the point.
    pub const NO_STORE: &str = "no-store";
}

/// Wraps a JSON response with a `Cache-Control` header.
pub fn with_cache_control<T: serde::Serialize>(value: T, header: &'static str) -> Response {
    let mut response = Json(value).into_response();
    response.headers_mut().insert(
        axum::http::header::CACHE_CONTROL,
        HeaderValue::from_static(header),
    );
    response
}

/// Creates the web server router.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(status::health))
        .route("/api/recipes/random", get(recipes::random_recipes))
        .route("/api/recipes/search", get(recipes::search_recipes))
        .route("/api/recipes/{id}", get(recipes::get_recipe))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
