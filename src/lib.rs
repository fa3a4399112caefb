// src/lib.rs

//! Monitoring endpoints for axum services.
//!
//! [`Fastuator`] attaches five endpoints to a [`HostApp`] under a prefix
//! (`/fastuator` by default): aggregated `health`, Kubernetes-style
//! `liveness` and `readiness` probes, `info`, and Prometheus `metrics`.

// --- Modules ---
pub mod actuator;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod host;
pub mod info;
pub mod metrics;
pub mod middleware;
pub mod state;
pub mod system;

// --- Re-exports ---
pub use actuator::{Fastuator, FastuatorBuilder};
pub use config::AppConfig;
pub use error::{AppError, Result};
pub use health::{AggregateResult, CheckResult, HealthCheck, HealthIndicator, Status};
pub use host::HostApp;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::{error, info};

/// Builds the demo host application with the actuator installed from `config`.
pub fn create_app(config: &AppConfig) -> Result<Router> {
    let mut app = HostApp::new(Router::new().route("/", get(root)));

    FastuatorBuilder::from_config(&config.actuator)
        .version(env!("CARGO_PKG_VERSION"))
        .build()?
        .install(&mut app);

    app.add_middleware("request_tracing", |router| {
        router.layer(axum::middleware::from_fn(middleware::trace_requests))
    });

    Ok(app.into_router())
}

async fn root() -> Json<Value> {
    Json(json!({ "service": env!("CARGO_PKG_NAME"), "status": "running" }))
}

/// Loads configuration and builds the router, returning both.
pub async fn run(config_path_override: Option<PathBuf>) -> Result<(Router, AppConfig)> {
    info!("Starting fastuator...");

    let app_config = setup_configuration(config_path_override)?;
    let app = create_app(&app_config).map_err(|e| {
        error!(error = ?e, "Failed to build application. Exiting.");
        e
    })?;

    Ok((app, app_config))
}

/// Loads, validates and logs the configuration.
pub fn setup_configuration(config_path_override: Option<PathBuf>) -> Result<AppConfig> {
    let config_path = config_path_override.unwrap_or_else(|| {
        std::env::var("CONFIG_PATH").map_or_else(|_| PathBuf::from("config.yaml"), PathBuf::from)
    });

    let config_path_display = config_path.display().to_string();
    if config_path.exists() {
        info!(config.path = %config_path_display, "Using configuration file");
    } else {
        info!(config.path = %config_path_display, "Optional configuration file not found. Using defaults and environment variables.");
    }

    let app_config = config::load_config(&config_path).map_err(|e| {
        error!(
            config.path = %config_path_display,
            error = ?e,
            "Failed to load or validate configuration. Exiting."
        );
        e
    })?;

    info!(
        actuator.prefix = %app_config.actuator.prefix,
        actuator.metrics = app_config.actuator.enable_metrics,
        actuator.health_checks = ?app_config.actuator.health_checks,
        actuator.liveness_checks = ?app_config.actuator.liveness_checks,
        server.port = app_config.server.port,
        "Configuration loaded and validated successfully."
    );

    Ok(app_config)
}
