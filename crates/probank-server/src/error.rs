//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the unified error type for all API endpoints. It
//! implements `axum::response::IntoResponse` to produce structured JSON
//! error responses with appropriate HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::schema::diagnostics::ValidationFailure;

/// Structured error detail in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "VALIDATION_FAILED").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional structured details (e.g., per-field validation failures).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API errors with HTTP status code mapping.
///
/// Each variant maps to a specific HTTP status code and produces a structured
/// JSON error response body. `NotFound` and `ValidationFailed` are the only
/// outcomes the service produces deliberately; store failures pass through
/// opaquely as `InternalError`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Entity not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid request (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Request shape validation failed (422).
    #[error("validation failed")]
    ValidationFailed(Vec<ValidationFailure>),

    /// Internal server error (500).
    #[error("internal error: {0}")]
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ApiErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message: msg.clone(),
                    details: None,
                },
            ),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorDetail {
                    code: "BAD_REQUEST".to_string(),
                    message: msg.clone(),
                    details: None,
                },
            ),
            ApiError::ValidationFailed(failures) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiErrorDetail {
                    code: "VALIDATION_FAILED".to_string(),
                    message: format!("{} validation error(s)", failures.len()),
                    details: serde_json::to_value(failures).ok(),
                },
            ),
            ApiError::InternalError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: msg.clone(),
                    details: None,
                },
            ),
        };

        let body = serde_json::json!({
            "success": false,
            "error": detail,
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<probank_storage::StorageError> for ApiError {
    fn from(err: probank_storage::StorageError) -> Self {
        match &err {
            probank_storage::StorageError::ProblemNotFound(_)
            | probank_storage::StorageError::ProblemSetNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            // Infrastructure failures are opaque -- not interpreted here.
            _ => ApiError::InternalError(err.to_string()),
        }
    }
}
