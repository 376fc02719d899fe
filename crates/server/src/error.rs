//! Unified error handling.
//!
//! Provides a unified `AppError` type translating repository outcomes into
//! the JSON error envelope. All API route handlers return
//! `Result<T, AppError>`. Store faults are logged server-side and never
//! exposed to the caller.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::store::{CartError, StoreError};

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::CartNotFound | CartError::ProductNotFound | CartError::EntryNotFound => {
                Self::NotFound(err.to_string())
            }
            CartError::Store(e) => Self::Store(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::Store(ref err) = self {
            tracing::error!(error = %err, "Request error");
        }

        let status = match &self {
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Store(_) => "Internal server error".to_string(),
            Self::NotFound(msg) | Self::Validation(msg) => msg.clone(),
        };

        let body = Json(json!({ "status": "error", "message": message }));
        (status, body).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
