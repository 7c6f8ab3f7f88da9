//! Error handling module for the catch log backend.
//!
//! Provides the service error type with mapping to HTTP status codes and the
//! `{"detail": ...}` response body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::StoreError;

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Request body failed type checking or a required field was blank
    Validation(String),
    /// Malformed request outside the body, e.g. a non-integer path id
    BadRequest(String),
    /// The store rejected the operation or could not be reached
    Store(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Store(msg) => msg.clone(),
        }
    }

    /// Wrap a store failure with an operation prefix, e.g. `Delete failed`.
    pub fn store_with_context(context: &str, err: StoreError) -> Self {
        tracing::error!("{}: {:?}", context, err);
        AppError::Store(format!("{}: {}", context, err))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for AppError {}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        tracing::error!("Store error: {:?}", err);
        AppError::Store(err.to_string())
    }
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            detail: self.message(),
        };
        (status, Json(body)).into_response()
    }
}
