// src/info.rs

//! Build and runtime metadata for the `/info` endpoint.

use serde::Serialize;
use std::sync::Arc;
use sysinfo::System;
use thiserror::Error;
use tracing::debug;

/// Version reported when the package version cannot be resolved.
pub const DEV_VERSION: &str = "dev";

/// Environment variable consulted by the default version lookup.
pub const VERSION_ENV_VAR: &str = "FASTUATOR_APP_VERSION";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("package version not found")]
    NotFound,

    #[error("package version lookup failed: {0}")]
    Lookup(String),
}

/// Resolves the host package's declared version.
pub type VersionLookup = Arc<dyn Fn() -> Result<String, VersionError> + Send + Sync>;

/// Reads the version from `FASTUATOR_APP_VERSION`.
pub fn env_version_lookup() -> VersionLookup {
    Arc::new(|| std::env::var(VERSION_ENV_VAR).map_err(|_| VersionError::NotFound))
}

/// Always returns `version`.
pub fn fixed_version(version: impl Into<String>) -> VersionLookup {
    let version = version.into();
    Arc::new(move || Ok(version.clone()))
}

/// Runs `lookup`, falling back to `"dev"` on failure or an empty version.
pub fn resolve_version(lookup: &(dyn Fn() -> Result<String, VersionError> + Send + Sync)) -> String {
    match lookup() {
        Ok(version) if !version.trim().is_empty() => version.trim().to_string(),
        Ok(_) => {
            debug!("Package version is empty, reporting dev version");
            DEV_VERSION.to_string()
        }
        Err(e) => {
            debug!(error = %e, "Package version unavailable, reporting dev version");
            DEV_VERSION.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub version: String,
    pub rust: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemInfo {
    pub platform: String,
    pub rust_target: String,
}

/// Body of the `/info` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppInfo {
    pub build: BuildInfo,
    pub system: SystemInfo,
}

#[derive(Clone)]
pub struct InfoProvider {
    version_lookup: VersionLookup,
}

impl InfoProvider {
    pub fn new(version_lookup: VersionLookup) -> Self {
        Self { version_lookup }
    }

    pub fn collect(&self) -> AppInfo {
        AppInfo {
            build: BuildInfo {
                version: resolve_version(self.version_lookup.as_ref()),
                rust: rust_version().to_string(),
            },
            system: SystemInfo {
                platform: platform(),
                rust_target: rust_target().to_string(),
            },
        }
    }
}

impl Default for InfoProvider {
    fn default() -> Self {
        Self::new(env_version_lookup())
    }
}

impl std::fmt::Debug for InfoProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InfoProvider").finish_non_exhaustive()
    }
}

/// Compiler version captured by the build script.
pub fn rust_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}

pub fn rust_target() -> &'static str {
    option_env!("TARGET").unwrap_or(std::env::consts::ARCH)
}

/// OS description plus CPU architecture, e.g. `Linux 22.04 Ubuntu-x86_64`.
pub fn platform() -> String {
    let os = System::long_os_version()
        .or_else(System::os_version)
        .unwrap_or_else(|| "unknown".to_string());
    format!("{}-{}", os, std::env::consts::ARCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_failure_reports_dev() {
        let lookup: VersionLookup = Arc::new(|| Err(VersionError::NotFound));
        assert_eq!(resolve_version(lookup.as_ref()), DEV_VERSION);
    }

    #[test]
    fn test_empty_version_reports_dev() {
        assert_eq!(resolve_version(fixed_version("  ").as_ref()), DEV_VERSION);
    }

    #[test]
    fn test_platform_names_architecture() {
        assert!(platform().ends_with(std::env::consts::ARCH));
    }
}
