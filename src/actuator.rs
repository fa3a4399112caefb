// src/actuator.rs

use crate::config::{ActuatorConfig, ConfigValidator, ResourceThresholds};
use crate::error::{AppError, Result};
use crate::handlers;
use crate::health::{HealthAggregator, HealthCheck, ProbeSet};
use crate::host::HostApp;
use crate::info::{env_version_lookup, fixed_version, InfoProvider, VersionLookup};
use crate::metrics::{metrics_middleware, metrics_router, MetricsRegistry};
use crate::state::ActuatorState;
use crate::system::{BuiltinCheck, SystemSampler};
use axum::{routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Marker set on a [`HostApp`] once the request metrics middleware feeding
/// the registry of one prefix is attached. The full marker is
/// `fastuator.metrics_middleware:<prefix>`.
pub const METRICS_MIDDLEWARE_MARKER: &str = "fastuator.metrics_middleware";

/// Registers health, liveness, readiness, info and metrics endpoints on a
/// host application.
///
/// ```no_run
/// use axum::{routing::get, Router};
/// use fastuator::{health::{CheckResult, HealthCheck}, Fastuator, HostApp};
///
/// # fn main() -> fastuator::Result<()> {
/// let mut app = HostApp::new(Router::new().route("/", get(|| async { "hello" })));
///
/// let redis = HealthCheck::from_fn("redis_health", || async {
///     Ok::<_, std::io::Error>(CheckResult::up().with_detail("redis", "connected"))
/// });
/// Fastuator::builder().health_checks(vec![redis]).build()?.install(&mut app);
///
/// let router: Router = app.into_router();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Fastuator {
    prefix: String,
    state: Arc<ActuatorState>,
}

impl Fastuator {
    pub fn builder() -> FastuatorBuilder {
        FastuatorBuilder::default()
    }

    /// Actuator with the default checks and metrics enabled.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn probes(&self) -> &ProbeSet {
        &self.state.probes
    }

    pub fn metrics(&self) -> Option<&Arc<MetricsRegistry>> {
        self.state.metrics.as_ref()
    }

    /// Router with the health, liveness, readiness and info endpoints.
    pub fn routes(&self) -> Router {
        let prefix = &self.prefix;
        Router::new()
            .route(&format!("{prefix}/health"), get(handlers::health))
            .route(&format!("{prefix}/liveness"), get(handlers::liveness))
            .route(&format!("{prefix}/readiness"), get(handlers::readiness))
            .route(&format!("{prefix}/info"), get(handlers::info))
            .with_state(Arc::clone(&self.state))
    }

    /// Attaches the endpoints and, when enabled, the metrics sub-application
    /// and middleware.
    ///
    /// Safe to call more than once on the same `app`: whatever is already
    /// registered there is skipped.
    pub fn install(&self, app: &mut HostApp) {
        let prefix = &self.prefix;

        if let Some(registry) = &self.state.metrics {
            if app.mark(format!("fastuator.metrics:{prefix}")) {
                let path = format!("{prefix}/metrics");
                app.attach_router(path.clone(), metrics_router(&path, Arc::clone(registry)));
            } else {
                warn!(prefix = %prefix, "Metrics endpoint already registered, skipping");
            }

            // One middleware per registry
            let middleware_marker = format!("{METRICS_MIDDLEWARE_MARKER}:{prefix}");
            if app.mark(middleware_marker.clone()) {
                let registry = Arc::clone(registry);
                app.add_middleware(middleware_marker, move |router| {
                    router.layer(axum::middleware::from_fn_with_state(registry, metrics_middleware))
                });
            } else {
                warn!(prefix = %prefix, "Metrics middleware already registered, skipping");
            }
        }

        if app.mark(format!("fastuator.routes:{prefix}")) {
            app.attach_router(format!("{prefix}/*"), self.routes());
            info!(
                prefix = %prefix,
                metrics = self.state.metrics.is_some(),
                "Fastuator endpoints registered"
            );
        } else {
            warn!(prefix = %prefix, "Fastuator endpoints already registered, skipping");
        }
    }
}

/// Builder for [`Fastuator`].
///
/// Check lists left unset fall back to the built-in resource checks: health
/// uses CPU, disk and memory, liveness uses CPU only, readiness reuses the
/// health list.
pub struct FastuatorBuilder {
    prefix: String,
    health_checks: Option<Vec<HealthCheck>>,
    liveness_checks: Option<Vec<HealthCheck>>,
    readiness_checks: Option<Vec<HealthCheck>>,
    builtin: ActuatorConfig,
    check_timeout: Duration,
    enable_metrics: bool,
    version_lookup: Option<VersionLookup>,
}

impl Default for FastuatorBuilder {
    fn default() -> Self {
        Self::from_config(&ActuatorConfig::default())
    }
}

impl FastuatorBuilder {
    /// Starts from a loaded configuration.
    pub fn from_config(config: &ActuatorConfig) -> Self {
        Self {
            prefix: config.prefix.clone(),
            health_checks: None,
            liveness_checks: None,
            readiness_checks: None,
            builtin: config.clone(),
            check_timeout: Duration::from_secs(config.check_timeout_secs),
            enable_metrics: config.enable_metrics,
            version_lookup: config.app_version.clone().map(fixed_version),
        }
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn health_checks(mut self, checks: Vec<HealthCheck>) -> Self {
        self.health_checks = Some(checks);
        self
    }

    pub fn liveness_checks(mut self, checks: Vec<HealthCheck>) -> Self {
        self.liveness_checks = Some(checks);
        self
    }

    pub fn readiness_checks(mut self, checks: Vec<HealthCheck>) -> Self {
        self.readiness_checks = Some(checks);
        self
    }

    pub fn enable_metrics(mut self, enabled: bool) -> Self {
        self.enable_metrics = enabled;
        self
    }

    pub fn check_timeout(mut self, timeout: Duration) -> Self {
        self.check_timeout = timeout;
        self
    }

    pub fn thresholds(mut self, thresholds: ResourceThresholds) -> Self {
        self.builtin.thresholds = thresholds;
        self
    }

    /// Reports `version` from `/info`, typically `env!("CARGO_PKG_VERSION")`.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version_lookup = Some(fixed_version(version));
        self
    }

    pub fn version_lookup(mut self, lookup: VersionLookup) -> Self {
        self.version_lookup = Some(lookup);
        self
    }

    pub fn build(self) -> Result<Fastuator> {
        let mut settings = self.builtin;
        settings.prefix = self.prefix;
        if self.check_timeout.is_zero() {
            return Err(AppError::config_validation(
                "Check timeout cannot be 0",
                Some("check_timeout"),
            ));
        }
        settings.check_timeout_secs = self.check_timeout.as_secs().max(1);
        ConfigValidator::validate_actuator(&settings)?;

        let sampler = SystemSampler::new();
        let builtin = |list: &[BuiltinCheck]| -> Vec<HealthCheck> {
            list.iter()
                .map(|check| check.build(&sampler, &settings.thresholds))
                .collect()
        };

        let health = self
            .health_checks
            .unwrap_or_else(|| builtin(&settings.health_checks));
        let liveness = self
            .liveness_checks
            .unwrap_or_else(|| builtin(&settings.liveness_checks));
        let readiness = match (self.readiness_checks, &settings.readiness_checks) {
            (Some(checks), _) => checks,
            (None, Some(list)) => builtin(list),
            (None, None) => health.clone(),
        };

        let metrics = if self.enable_metrics {
            Some(Arc::new(MetricsRegistry::new()?))
        } else {
            None
        };

        let aggregator = HealthAggregator::new(self.check_timeout);
        let probes = ProbeSet::new(aggregator, health, liveness, readiness);
        let info = InfoProvider::new(self.version_lookup.unwrap_or_else(env_version_lookup));

        info!(
            prefix = %settings.prefix,
            health_checks = probes.health_checks().len(),
            liveness_checks = probes.liveness_checks().len(),
            readiness_checks = probes.readiness_checks().len(),
            check_timeout = ?self.check_timeout,
            "Fastuator configured"
        );

        Ok(Fastuator {
            prefix: settings.prefix,
            state: Arc::new(ActuatorState::new(probes, info, metrics)),
        })
    }
}

impl std::fmt::Debug for FastuatorBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastuatorBuilder")
            .field("prefix", &self.prefix)
            .field("enable_metrics", &self.enable_metrics)
            .field("check_timeout", &self.check_timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_PREFIX;
    use crate::health::DEFAULT_CHECK_TIMEOUT;

    #[test]
    fn test_defaults() {
        let actuator = Fastuator::new().unwrap();
        assert_eq!(actuator.prefix(), DEFAULT_PREFIX);
        assert!(actuator.metrics().is_some());
        assert_eq!(actuator.probes().aggregator().timeout(), DEFAULT_CHECK_TIMEOUT);

        let names = |checks: &[HealthCheck]| -> Vec<String> {
            checks.iter().filter_map(|c| c.name().map(str::to_string)).collect()
        };
        assert_eq!(
            names(actuator.probes().health_checks()),
            vec!["cpu_health", "disk_health", "memory_health"]
        );
        assert_eq!(names(actuator.probes().liveness_checks()), vec!["cpu_health"]);
        assert_eq!(
            names(actuator.probes().readiness_checks()),
            names(actuator.probes().health_checks())
        );
    }

    #[test]
    fn test_readiness_defaults_to_overridden_health_list() {
        let check = HealthCheck::from_fn("redis", || async {
            Ok::<_, std::convert::Infallible>(crate::health::CheckResult::up())
        });
        let actuator = Fastuator::builder()
            .health_checks(vec![check])
            .enable_metrics(false)
            .build()
            .unwrap();

        assert_eq!(actuator.probes().readiness_checks().len(), 1);
        assert_eq!(actuator.probes().readiness_checks()[0].name(), Some("redis"));
        assert!(actuator.metrics().is_none());
    }

    #[test]
    fn test_invalid_prefix_is_rejected() {
        assert!(Fastuator::builder().prefix("fastuator").build().is_err());
        assert!(Fastuator::builder().prefix("/fastuator/").build().is_err());
    }
}
