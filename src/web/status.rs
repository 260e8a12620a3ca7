//! Health endpoint.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::data;
use crate::state::AppState;
use crate::web::error::ApiError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    status: &'static str,
    cached_recipes: i64,
}

/// GET /api/health — database liveness plus a cache size gauge.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    data::health::ping(&state.db_pool)
        .await
        .map_err(|e| ApiError::internal(format!("database unavailable: {e}")))?;
    let cached_recipes = data::health::cached_recipe_count(&state.db_pool)
        .await
        .unwrap_or(0);
    Ok(Json(HealthResponse {
        status: "ok",
        cached_recipes,
    }))
}
