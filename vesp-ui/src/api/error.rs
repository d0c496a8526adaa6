//! API error type shared by all handlers
//!
//! Maps to JSON error bodies `{"error": "..."}` with conventional status
//! codes. Database failures are logged server-side and surfaced to the
//! client as a generic 500 message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// API errors with their HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed request fields -> 400
    BadRequest(String),
    /// Bad credentials -> 401
    Unauthorized(String),
    /// Referenced resource does not exist -> 404
    NotFound(String),
    /// Duplicate resource (username, repeated rating) -> 409
    Conflict(String),
    /// Database or other internal failure -> 500
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        error!("Database error: {}", e);
        ApiError::Internal("Database error".to_string())
    }
}

impl From<vesp_common::Error> for ApiError {
    fn from(e: vesp_common::Error) -> Self {
        use vesp_common::Error;
        match e {
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::Conflict(msg) => ApiError::Conflict(msg),
            Error::Auth(msg) => {
                error!("Auth subsystem error: {}", msg);
                ApiError::Internal("Authentication error".to_string())
            }
            other => {
                error!("Internal error: {}", other);
                ApiError::Internal("Internal error".to_string())
            }
        }
    }
}
