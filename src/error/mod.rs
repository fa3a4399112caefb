//! Error handling module
//!
//! Check failures never cross the aggregator boundary: they are turned into
//! DOWN results. What remains here are setup errors (configuration, metrics
//! registry) and the probe failures that liveness/readiness surface as HTTP 503.

pub mod types;

pub use types::{CheckError, ProbeError};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

/// Error body returned by the probe endpoints.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// A human-readable explanation of the failure
    pub detail: String,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    // Configuration errors
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String, field: Option<String> },

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String, line: Option<usize> },

    // Probe failures
    #[error("{0}")]
    ProbeFailed(#[from] ProbeError),

    // Metrics registry
    #[error("Metrics registry setup failed: {message}")]
    Metrics { message: String },

    // System errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("IO operation failed: {operation} - {message}")]
    Io { operation: String, message: String },
}

impl AppError {
    /// Create a new configuration validation error
    pub fn config_validation(message: impl Into<String>, field: Option<impl Into<String>>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
            field: field.map(Into::into),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ConfigParse { .. } | Self::Serialization { .. } => StatusCode::BAD_REQUEST,

            Self::ConfigNotFound { .. } => StatusCode::NOT_FOUND,

            Self::ProbeFailed(_) => StatusCode::SERVICE_UNAVAILABLE,

            Self::ConfigValidation { .. }
            | Self::Metrics { .. }
            | Self::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            Self::ProbeFailed(probe) => {
                warn!(probe = probe.probe_name(), error = %self, "Probe reported failure");
            }
            _ => {
                error!(error = %self, status = self.status_code().as_u16(), "Application error occurred");
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.status_code();
        let body = ErrorResponse {
            detail: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
