//! Metrics collection and export module
//!
//! Metrics go through an explicitly constructed [`MetricsRegistry`] backed by
//! a Prometheus recorder. Nothing is installed as the global `metrics`
//! recorder, so several registries can coexist in one process (tests do this).

pub mod exporters;
pub mod middleware;

pub use exporters::{metrics_handler, metrics_router};
pub use middleware::{metrics_middleware, UNMATCHED_ENDPOINT};

use crate::error::Result;
use crate::health::Status;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics::{Gauge, Histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder};
use std::time::Duration;

pub const REQUESTS_TOTAL: &str = "http_requests_total";
pub const REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";
pub const HEALTH_STATUS: &str = "app_health_status";

/// Bucket boundaries (seconds) of the request duration histogram.
pub const DURATION_BUCKETS: [f64; 9] = [0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

/// Request counter, duration histogram and health gauge of one application.
pub struct MetricsRegistry {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
    request_duration: Histogram,
    health_status: Gauge,
}

impl MetricsRegistry {
    pub fn new() -> Result<Self> {
        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Full(REQUEST_DURATION_SECONDS.to_string()),
                &DURATION_BUCKETS,
            )?
            .build_recorder();
        let handle = recorder.handle();

        let (request_duration, health_status) = metrics::with_local_recorder(&recorder, || {
            describe_counter!(REQUESTS_TOTAL, "Total HTTP requests");
            describe_histogram!(REQUEST_DURATION_SECONDS, "HTTP request duration in seconds");
            describe_gauge!(HEALTH_STATUS, "Application health status (1=UP, 0=DOWN)");

            (histogram!(REQUEST_DURATION_SECONDS), gauge!(HEALTH_STATUS))
        });

        tracing::info!("Metrics registry initialized");
        Ok(Self {
            recorder,
            handle,
            request_duration,
            health_status,
        })
    }

    /// Counts one request and observes its duration.
    pub fn record_request(&self, method: &str, endpoint: &str, status: u16, duration: Duration) {
        metrics::with_local_recorder(&self.recorder, || {
            counter!(
                REQUESTS_TOTAL,
                "method" => method.to_string(),
                "endpoint" => endpoint.to_string(),
                "status" => status.to_string()
            )
            .increment(1);
        });
        self.request_duration.record(duration.as_secs_f64());
    }

    pub fn set_health_status(&self, status: Status) {
        self.health_status.set(status.as_gauge());
    }

    /// Prometheus text exposition of everything recorded so far.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

impl std::fmt::Debug for MetricsRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsRegistry").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registry_records_labeled_requests() {
        let registry = MetricsRegistry::new().unwrap();

        registry.record_request("GET", "/fastuator/health", 200, Duration::from_millis(30));
        registry.record_request("GET", "/fastuator/health", 200, Duration::from_millis(70));

        let text = registry.render();
        assert!(text.contains(REQUESTS_TOTAL));
        assert!(text.contains("endpoint=\"/fastuator/health\""));
        assert!(text.contains("status=\"200\""));
        assert!(text.contains("http_request_duration_seconds_bucket{le=\"0.05\"} 1"));
        assert!(text.contains("http_request_duration_seconds_count 2"));
    }

    #[test]
    fn test_health_gauge_tracks_status() {
        let registry = MetricsRegistry::new().unwrap();

        registry.set_health_status(Status::Down);
        assert!(registry.render().contains("app_health_status 0"));

        registry.set_health_status(Status::Up);
        assert!(registry.render().contains("app_health_status 1"));
    }

    #[test]
    fn test_registries_are_independent() {
        let first = MetricsRegistry::new().unwrap();
        let second = MetricsRegistry::new().unwrap();

        first.record_request("GET", "/only-first", 200, Duration::from_millis(1));
        assert!(!second.render().contains("/only-first"));
    }
}
