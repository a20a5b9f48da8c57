//! Pitchboard — API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pitchboard_core::error::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
    /// Whether the caller may retry the request.
    pub retryable: bool,
}

/// HTTP-layer wrapper around `DomainError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self.0 {
            DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            DomainError::DuplicateSubmission { .. } => {
                (StatusCode::CONFLICT, "duplicate_submission")
            }
            DomainError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            DomainError::ConnectionNotFound(_) => (StatusCode::NOT_FOUND, "connection_not_found"),
            DomainError::TransientStore(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable")
            }
        };

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
            retryable: self.0.is_retryable(),
        };

        (status, Json(body)).into_response()
    }
}
