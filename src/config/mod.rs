// src/config/mod.rs

pub mod app;
pub mod loader;
pub mod validation;

pub use app::{ActuatorConfig, AppConfig, ResourceThresholds, ServerConfig, DEFAULT_PREFIX};
pub use loader::{load_config, override_with_env};
pub use validation::ConfigValidator;
