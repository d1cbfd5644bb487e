//! Error types for the zodiac readings services
//!
//! Provides a single error enum with:
//! - Distinct variants for validation, idempotency conflicts, and storage faults
//! - HTTP status code mapping
//! - Structured `{success: false, error, code}` responses
//! - Error codes for client handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Message shown to clients when a session has already been persisted
pub const DUPLICATE_SESSION_MESSAGE: &str = "This reading has already been saved";

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors
    MissingField,
    InvalidFormat,

    // Conflict errors
    DuplicateSession,

    // Rate limiting
    RateLimited,

    // Database errors
    DatabaseError,
    ConnectionError,
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Missing required fields: session_id and birth_month")]
    MissingField { field: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    // Conflict errors
    #[error("This reading has already been saved")]
    DuplicateSession { session_id: String },

    // Rate limiting
    #[error("Rate limit exceeded: {limit} requests per second")]
    RateLimited { limit: u32 },

    // Database errors
    #[error("{0}")]
    Storage(#[from] sea_orm::DbErr),

    #[error("Database connection error: {message}")]
    DatabaseConnection { message: String },
}

impl AppError {
    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::MissingField { .. } => ErrorCode::MissingField,
            AppError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            AppError::DuplicateSession { .. } => ErrorCode::DuplicateSession,
            AppError::RateLimited { .. } => ErrorCode::RateLimited,
            AppError::Storage(_) => ErrorCode::DatabaseError,
            AppError::DatabaseConnection { .. } => ErrorCode::ConnectionError,
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// Duplicate sessions report 400, the same as validation failures.
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::MissingField { .. }
            | AppError::InvalidFormat { .. }
            | AppError::DuplicateSession { .. } => StatusCode::BAD_REQUEST,

            // 429 Too Many Requests
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,

            // 500 Internal Server Error
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,

            // 503 Service Unavailable
            AppError::DatabaseConnection { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Check if this error should be logged at error level
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Check if this error is a client error
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Emit the log line for this error at its severity
    pub fn log(&self) {
        let status = self.status_code();
        let code = self.code();

        if self.is_server_error() {
            tracing::error!(
                error = %self,
                code = ?code,
                status = status.as_u16(),
                "Server error"
            );
        } else {
            tracing::warn!(
                error = %self,
                code = ?code,
                status = status.as_u16(),
                "Client error"
            );
        }
    }

    /// Build the JSON body returned to callers
    pub fn to_body(&self) -> ErrorResponse {
        ErrorResponse {
            success: false,
            error: self.to_string(),
            code: self.code(),
        }
    }
}

/// Structured error response for API
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: ErrorCode,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        (self.status_code(), Json(self.to_body())).into_response()
    }
}
