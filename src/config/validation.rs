// src/config/validation.rs

use crate::config::{ActuatorConfig, AppConfig};
use crate::error::{AppError, Result};
use tracing::{debug, warn};

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(config: &AppConfig) -> Result<()> {
        debug!("Starting configuration validation");

        if let Err(e) = Self::validate_server_config(config) {
            warn!("Server config validation failed: {}", e);
            return Err(e);
        }
        debug!("Server config validation passed");

        if let Err(e) = Self::validate_actuator(&config.actuator) {
            warn!("Actuator config validation failed: {}", e);
            return Err(e);
        }
        debug!("Actuator config validation passed");

        debug!("Configuration validation completed successfully");
        Ok(())
    }

    fn validate_server_config(config: &AppConfig) -> Result<()> {
        // Allow port 0 in test mode (system will assign a free port)
        if config.server.port == 0 && !config.server.test_mode {
            return Err(AppError::config_validation(
                "Server port cannot be 0 (except in test mode)",
                Some("server.port"),
            ));
        }

        if config.server.host.trim().is_empty() {
            return Err(AppError::config_validation(
                "Server host cannot be empty",
                Some("server.host"),
            ));
        }

        Ok(())
    }

    pub fn validate_actuator(actuator: &ActuatorConfig) -> Result<()> {
        Self::validate_prefix(&actuator.prefix)?;

        if actuator.check_timeout_secs == 0 {
            return Err(AppError::config_validation(
                "Check timeout cannot be 0",
                Some("actuator.check_timeout_secs"),
            ));
        }

        let thresholds = [
            ("actuator.thresholds.cpu_percent", actuator.thresholds.cpu_percent),
            ("actuator.thresholds.memory_percent", actuator.thresholds.memory_percent),
            ("actuator.thresholds.disk_percent", actuator.thresholds.disk_percent),
        ];
        for (field, value) in thresholds {
            if !(value > 0.0 && value <= 100.0) {
                return Err(AppError::config_validation(
                    format!("Threshold must be in (0, 100], got {}", value),
                    Some(field),
                ));
            }
        }

        if actuator.liveness_checks.is_empty() {
            warn!("No liveness checks configured; liveness will always report UP");
        }

        Ok(())
    }

    /// A prefix is empty or starts with `/`, has no trailing `/` and no
    /// route parameters.
    pub fn validate_prefix(prefix: &str) -> Result<()> {
        if prefix.is_empty() {
            return Ok(());
        }

        if !prefix.starts_with('/') {
            return Err(AppError::config_validation(
                format!("Prefix must start with '/': {}", prefix),
                Some("actuator.prefix"),
            ));
        }

        if prefix.ends_with('/') {
            return Err(AppError::config_validation(
                format!("Prefix must not end with '/': {}", prefix),
                Some("actuator.prefix"),
            ));
        }

        if prefix.contains([':', '*', '{', '}']) || prefix.contains("//") {
            return Err(AppError::config_validation(
                format!("Prefix must be a literal path: {}", prefix),
                Some("actuator.prefix"),
            ));
        }

        Ok(())
    }
}
