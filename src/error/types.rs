//! Error type definitions and conversions

use super::AppError;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single health check.
///
/// Never propagated past the aggregator: it becomes the `error` field of a
/// synthetic DOWN result.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("health check timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("health check panicked: {0}")]
    Panicked(String),

    #[error("{0}")]
    Failed(String),
}

impl CheckError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

impl From<tokio::task::JoinError> for CheckError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_panic() {
            let payload = err.into_panic();
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic payload".to_string());
            Self::Panicked(message)
        } else {
            Self::Failed(format!("health check task cancelled: {err}"))
        }
    }
}

/// Aggregate failure surfaced by the Kubernetes-style probes.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeError {
    #[error("Liveness check failed")]
    Liveness,

    #[error("Readiness check failed")]
    Readiness,
}

impl ProbeError {
    pub fn probe_name(&self) -> &'static str {
        match self {
            Self::Liveness => "liveness",
            Self::Readiness => "readiness",
        }
    }
}

// Implement From traits for common error types
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            operation: "io_operation".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::ConfigParse {
            message: err.to_string(),
            line: err.location().map(|loc| loc.line()),
        }
    }
}

impl From<metrics_exporter_prometheus::BuildError> for AppError {
    fn from(err: metrics_exporter_prometheus::BuildError) -> Self {
        Self::Metrics {
            message: err.to_string(),
        }
    }
}
