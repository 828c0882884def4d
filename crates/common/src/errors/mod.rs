//! Error types for the spectra services
//!
//! Provides a single error enum shared by the filter builder, the
//! repository, and the HTTP layer, with:
//! - Distinct error types for different failure modes
//! - HTTP status code mapping
//! - Structured error responses
//! - Error codes for client handling
//!
//! Filter validation errors are always raised before any query executes;
//! storage errors are surfaced as-is, never retried here.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Filter/request validation errors (1xxx)
    ValidationError,
    InvalidFilterValue,
    InvalidRange,
    InvalidSortField,

    // Resource errors (4xxx)
    NotFound,
    RecordNotFound,
    SubstanceNotFound,

    // Conflict errors (5xxx)
    LinkTypeMismatch,

    // Database errors (7xxx)
    DatabaseError,
    ConnectionError,

    // Internal errors (9xxx)
    InternalError,
    ConfigurationError,
    SerializationError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            // Validation (1xxx)
            ErrorCode::ValidationError => 1001,
            ErrorCode::InvalidFilterValue => 1002,
            ErrorCode::InvalidRange => 1003,
            ErrorCode::InvalidSortField => 1004,

            // Resources (4xxx)
            ErrorCode::NotFound => 4001,
            ErrorCode::RecordNotFound => 4002,
            ErrorCode::SubstanceNotFound => 4003,

            // Conflicts (5xxx)
            ErrorCode::LinkTypeMismatch => 5001,

            // Database (7xxx)
            ErrorCode::DatabaseError => 7001,
            ErrorCode::ConnectionError => 7002,

            // Internal (9xxx)
            ErrorCode::InternalError => 9001,
            ErrorCode::ConfigurationError => 9002,
            ErrorCode::SerializationError => 9003,
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Request validation errors
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Invalid value for {field}: {value:?}")]
    InvalidFilterValue { field: String, value: String },

    #[error("Invalid range for {field}: lower bound {lower} exceeds upper bound {upper}")]
    InvalidRange {
        field: String,
        lower: f64,
        upper: f64,
    },

    #[error("Sort field not allowed: {field}")]
    InvalidSortField { field: String },

    // Resource errors
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound { resource_type: String, id: String },

    #[error("Record not found: {id}")]
    RecordNotFound { id: String },

    #[error("Substance not found: {dtxsid}")]
    SubstanceNotFound { dtxsid: String },

    // Write-path invariant violations
    #[error("Link endpoint {id} has record type {actual}, expected {expected}")]
    LinkTypeMismatch {
        id: String,
        expected: String,
        actual: String,
    },

    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Database connection error: {message}")]
    DatabaseConnection { message: String },

    // Internal errors
    #[error("Internal server error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { .. } => ErrorCode::ValidationError,
            AppError::InvalidFilterValue { .. } => ErrorCode::InvalidFilterValue,
            AppError::InvalidRange { .. } => ErrorCode::InvalidRange,
            AppError::InvalidSortField { .. } => ErrorCode::InvalidSortField,
            AppError::NotFound { .. } => ErrorCode::NotFound,
            AppError::RecordNotFound { .. } => ErrorCode::RecordNotFound,
            AppError::SubstanceNotFound { .. } => ErrorCode::SubstanceNotFound,
            AppError::LinkTypeMismatch { .. } => ErrorCode::LinkTypeMismatch,
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::DatabaseConnection { .. } => ErrorCode::ConnectionError,
            AppError::Internal { .. } => ErrorCode::InternalError,
            AppError::Configuration { .. } => ErrorCode::ConfigurationError,
            AppError::Serialization(_) => ErrorCode::SerializationError,
            AppError::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::Validation { .. }
            | AppError::InvalidFilterValue { .. }
            | AppError::InvalidRange { .. }
            | AppError::InvalidSortField { .. } => StatusCode::BAD_REQUEST,

            // 404 Not Found
            AppError::NotFound { .. }
            | AppError::RecordNotFound { .. }
            | AppError::SubstanceNotFound { .. } => StatusCode::NOT_FOUND,

            // 409 Conflict
            AppError::LinkTypeMismatch { .. } => StatusCode::CONFLICT,

            // 500 Internal Server Error
            AppError::Database(_)
            | AppError::Internal { .. }
            | AppError::Configuration { .. }
            | AppError::Serialization(_)
            | AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,

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
}

/// Structured error response for API
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();
        let message = self.to_string();

        // Log based on severity
        if self.is_server_error() {
            tracing::error!(
                error = %message,
                code = ?code,
                status = status.as_u16(),
                "Server error"
            );
        } else if self.is_client_error() {
            tracing::warn!(
                error = %message,
                code = ?code,
                status = status.as_u16(),
                "Client error"
            );
        }

        let body = ErrorResponse {
            error: ErrorDetails {
                code,
                message,
                details: None,
                request_id: None, // Filled by middleware when present
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_error_mapping() {
        let err = AppError::InvalidFilterValue {
            field: "source".into(),
            value: "NotARealSource".into(),
        };
        assert_eq!(err.code(), ErrorCode::InvalidFilterValue);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.is_client_error());
    }

    #[test]
    fn test_range_error_mapping() {
        let err = AppError::InvalidRange {
            field: "molecular_weight".into(),
            lower: 500.0,
            upper: 100.0,
        };
        assert_eq!(err.code(), ErrorCode::InvalidRange);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_mapping() {
        let err = AppError::RecordNotFound { id: "MoNA-1234".into() };
        assert_eq!(err.code(), ErrorCode::RecordNotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert!(!err.is_server_error());
    }

    #[test]
    fn test_server_error() {
        let err = AppError::Internal {
            message: "Something went wrong".into(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.is_server_error());
    }
}
