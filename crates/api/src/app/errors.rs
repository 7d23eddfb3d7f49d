use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use instawrite_core::DomainError;
use instawrite_infra::StoreError;

/// Every failure a blog route can produce.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, malformed or unverifiable bearer token.
    #[error("unauthorized")]
    Unauthorized,

    /// Body failed its input schema.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized => json_error(StatusCode::UNAUTHORIZED, "unauthorized"),
            ApiError::InvalidInput(e) => {
                tracing::debug!(error = %e, "rejecting request body");
                json_error(StatusCode::BAD_REQUEST, "invalid input")
            }
            ApiError::Store(e) => {
                tracing::error!(error = %e, "post store failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}

pub fn json_error(status: StatusCode, error: &'static str) -> Response {
    (status, axum::Json(json!({ "error": error }))).into_response()
}
