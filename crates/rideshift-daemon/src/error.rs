//! Error types for rideshift-daemon

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rideshift_types::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Daemon-level errors
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Server startup error
    #[error("Server error: {0}")]
    Server(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage-specific errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Item not found
    #[error("{0}")]
    NotFound(String),

    /// Unique key already taken
    #[error("{0}")]
    Conflict(String),

    /// The record rejected the mutation
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Backend failure
    #[error("Storage failure: {0}")]
    Internal(String),
}

/// API-specific errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    /// Malformed request
    #[error("{0}")]
    BadRequest(String),

    /// Conflict
    #[error("{0}")]
    Conflict(String),

    /// Known path, unsupported method
    #[error("{0}")]
    MethodNotAllowed(String),

    /// Missing or invalid field
    #[error("{0}")]
    Validation(String),

    /// Action not legal in the current state
    #[error("{0}")]
    InvalidState(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Storage error
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Domain error
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

const INTERNAL_MESSAGE: &str = "Internal server error";

fn domain_status(err: &DomainError) -> (StatusCode, &'static str) {
    match err {
        DomainError::Validation(_) | DomainError::OutOfRange { .. } => {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
        }
        DomainError::InvalidState(_) => (StatusCode::BAD_REQUEST, "INVALID_STATE"),
        DomainError::Precondition(_) => (StatusCode::BAD_REQUEST, "PRECONDITION_FAILED"),
    }
}

impl ApiError {
    /// HTTP status and machine-readable code for this error
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::MethodNotAllowed(_) => (StatusCode::METHOD_NOT_ALLOWED, "METHOD_NOT_ALLOWED"),
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::InvalidState(_) => (StatusCode::BAD_REQUEST, "INVALID_STATE"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Storage(StorageError::NotFound(_)) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Storage(StorageError::Conflict(_)) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Storage(StorageError::Domain(err)) | ApiError::Domain(err) => {
                domain_status(err)
            }
            ApiError::Storage(StorageError::Internal(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, code, "Request failed");
            INTERNAL_MESSAGE.to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Generic 500 body for responses produced outside a handler (caught panics)
pub fn internal_error_response() -> Response {
    let body = ErrorResponse {
        error: INTERNAL_MESSAGE.to_string(),
        code: "INTERNAL_ERROR".to_string(),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for daemon operations
pub type DaemonResult<T> = Result<T, DaemonError>;
