// src/config/app.rs

use crate::system::{BuiltinCheck, DEFAULT_THRESHOLD_PERCENT};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// URL prefix the actuator endpoints are mounted under by default.
pub const DEFAULT_PREFIX: &str = "/fastuator";

#[derive(Debug, Deserialize, Clone, PartialEq, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub test_mode: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            test_mode: false,
        }
    }
}

/// Utilization thresholds (percent) for the built-in resource checks.
#[derive(Debug, Deserialize, Clone, PartialEq, Serialize)]
pub struct ResourceThresholds {
    #[serde(default = "default_threshold")]
    pub cpu_percent: f64,
    #[serde(default = "default_threshold")]
    pub memory_percent: f64,
    #[serde(default = "default_threshold")]
    pub disk_percent: f64,
    #[serde(default = "default_mount_point")]
    pub disk_mount_point: PathBuf,
}

impl Default for ResourceThresholds {
    fn default() -> Self {
        Self {
            cpu_percent: default_threshold(),
            memory_percent: default_threshold(),
            disk_percent: default_threshold(),
            disk_mount_point: default_mount_point(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Serialize)]
pub struct ActuatorConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_enable_metrics")]
    pub enable_metrics: bool,
    #[serde(default = "default_check_timeout")]
    pub check_timeout_secs: u64,
    #[serde(default = "default_health_checks")]
    pub health_checks: Vec<BuiltinCheck>,
    #[serde(default = "default_liveness_checks")]
    pub liveness_checks: Vec<BuiltinCheck>,
    /// `None` reuses `health_checks`.
    #[serde(default)]
    pub readiness_checks: Option<Vec<BuiltinCheck>>,
    #[serde(default)]
    pub thresholds: ResourceThresholds,
    /// Version reported by `/info`. Looked up from the environment when unset.
    #[serde(default)]
    pub app_version: Option<String>,
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            enable_metrics: default_enable_metrics(),
            check_timeout_secs: default_check_timeout(),
            health_checks: default_health_checks(),
            liveness_checks: default_liveness_checks(),
            readiness_checks: None,
            thresholds: ResourceThresholds::default(),
            app_version: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub actuator: ActuatorConfig,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_enable_metrics() -> bool {
    true
}

fn default_check_timeout() -> u64 {
    5
}

fn default_health_checks() -> Vec<BuiltinCheck> {
    vec![BuiltinCheck::Cpu, BuiltinCheck::Disk, BuiltinCheck::Memory]
}

fn default_liveness_checks() -> Vec<BuiltinCheck> {
    vec![BuiltinCheck::Cpu]
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD_PERCENT
}

fn default_mount_point() -> PathBuf {
    PathBuf::from("/")
}
