//! Edge Error Types
//!
//! Error types for the edge server and their conversion to HTTP responses.

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::embed::EmbedError;
use crate::pricing::PricingError;

/// Edge server error types
#[derive(Error, Debug)]
pub enum EdgeError {
    /// Request validation failed
    #[error("{0}")]
    Validation(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Calculator input rejected
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Embed parameters rejected
    #[error(transparent)]
    Embed(#[from] EmbedError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<QueryRejection> for EdgeError {
    fn from(rejection: QueryRejection) -> Self {
        EdgeError::Validation(rejection.body_text())
    }
}

/// Error response body, shaped like the backend's so clients parse both alike
#[derive(Serialize)]
pub struct ErrorResponse {
    pub detail: String,
    pub code: &'static str,
    pub request_id: String,
}

impl IntoResponse for EdgeError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            EdgeError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            EdgeError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            EdgeError::Pricing(_) => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_USAGE"),
            EdgeError::Embed(_) => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_EMBED"),
            EdgeError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            EdgeError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        };

        let request_id = uuid::Uuid::new_v4().to_string();

        if status.is_server_error() {
            tracing::error!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "Edge error occurred"
            );
        } else {
            tracing::debug!(request_id = %request_id, error_code = %code, error_message = %self, "Request rejected");
        }

        let body = ErrorResponse {
            detail: self.to_string(),
            code,
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for edge handlers
pub type EdgeResult<T> = Result<T, EdgeError>;
