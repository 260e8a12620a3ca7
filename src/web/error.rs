//! API error responses.
//!
//! Handlers return [`ApiError`]; upstream failures surface as a generic
//! 502 with the detail kept in the logs, never in the response body.

use crate::spoonacular::SpoonacularError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<SpoonacularError> for ApiError {
    fn from(e: SpoonacularError) -> Self {
        error!(error = %e, status = ?e.status(), "upstream recipe API call failed");
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: "recipe service unavailable".to_string(),
        }
    }
}
