// src/config/loader.rs

use crate::config::{AppConfig, ConfigValidator};
use crate::error::{AppError, Result};
use std::path::Path;
use tracing::{debug, info, warn};

/// Load configuration from file or environment variables
pub fn load_config(config_path: &Path) -> Result<AppConfig> {
    let mut config = if config_path.exists() {
        info!("Loading configuration from file: {}", config_path.display());
        load_from_file(config_path)?
    } else {
        info!("Configuration file not found, using defaults");
        AppConfig::default()
    };

    // Override with environment variables
    override_with_env(&mut config);

    // Validate the final configuration
    ConfigValidator::validate(&config)?;

    debug!("Configuration loaded and validated successfully");
    Ok(config)
}

fn load_from_file(config_path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(config_path).map_err(|_| AppError::ConfigNotFound {
        path: config_path.display().to_string(),
    })?;

    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }

    serde_yaml::from_str(&content).map_err(|e| AppError::ConfigParse {
        message: format!("Failed to parse config file: {}", e),
        line: e.location().map(|loc| loc.line()),
    })
}

/// Applies `HOST`, `PORT` and the `FASTUATOR_*` variables on top of `config`.
pub fn override_with_env(config: &mut AppConfig) {
    if let Ok(host) = std::env::var("HOST") {
        info!("Overriding server host from environment variable: {}", host);
        config.server.host = host;
    }

    if let Ok(port_str) = std::env::var("PORT") {
        if let Ok(port) = port_str.parse::<u16>() {
            info!("Overriding server port from environment variable: {}", port);
            config.server.port = port;
        } else {
            warn!("Invalid PORT environment variable: {}", port_str);
        }
    }

    if let Ok(prefix) = std::env::var("FASTUATOR_PREFIX") {
        info!("Overriding endpoint prefix from environment: {}", prefix);
        config.actuator.prefix = prefix;
    }

    if let Ok(flag) = std::env::var("FASTUATOR_ENABLE_METRICS") {
        match flag.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => config.actuator.enable_metrics = true,
            "0" | "false" | "no" | "off" => config.actuator.enable_metrics = false,
            _ => warn!("Invalid FASTUATOR_ENABLE_METRICS environment variable: {}", flag),
        }
    }

    if let Ok(timeout_str) = std::env::var("FASTUATOR_CHECK_TIMEOUT_SECS") {
        if let Ok(timeout) = timeout_str.parse::<u64>() {
            info!("Overriding check timeout from environment: {}s", timeout);
            config.actuator.check_timeout_secs = timeout;
        } else {
            warn!("Invalid FASTUATOR_CHECK_TIMEOUT_SECS environment variable: {}", timeout_str);
        }
    }
}
