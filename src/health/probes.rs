// src/health/probes.rs

use crate::error::ProbeError;
use crate::health::{
    aggregate_status, AggregateResult, CheckList, HealthAggregator, HealthCheck, Status,
};
use serde::Serialize;
use tracing::{info, warn};

/// Body returned by a passing liveness or readiness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProbeStatus {
    pub status: Status,
}

impl ProbeStatus {
    pub const UP: ProbeStatus = ProbeStatus { status: Status::Up };
}

/// The three check lists behind the health, liveness and readiness endpoints.
///
/// Liveness should only contain checks a restart can fix (process-local
/// state). External dependencies belong in readiness, where a failure takes
/// the instance out of rotation instead of restarting it.
///
/// Component names are resolved once here, not on every request.
#[derive(Debug, Clone)]
pub struct ProbeSet {
    aggregator: HealthAggregator,
    health: CheckList,
    liveness: CheckList,
    readiness: CheckList,
}

impl ProbeSet {
    pub fn new(
        aggregator: HealthAggregator,
        health: Vec<HealthCheck>,
        liveness: Vec<HealthCheck>,
        readiness: Vec<HealthCheck>,
    ) -> Self {
        Self {
            aggregator,
            health: CheckList::new(health),
            liveness: CheckList::new(liveness),
            readiness: CheckList::new(readiness),
        }
    }

    pub fn aggregator(&self) -> &HealthAggregator {
        &self.aggregator
    }

    pub fn health_checks(&self) -> &[HealthCheck] {
        self.health.checks()
    }

    pub fn liveness_checks(&self) -> &[HealthCheck] {
        self.liveness.checks()
    }

    pub fn readiness_checks(&self) -> &[HealthCheck] {
        self.readiness.checks()
    }

    pub fn health_list(&self) -> &CheckList {
        &self.health
    }

    /// Aggregate health. Never fails: broken checks show up as DOWN.
    pub async fn health(&self, show_details: bool) -> AggregateResult {
        let result = self.aggregator.aggregate_list(&self.health, show_details).await;
        info!(status = ?result.status, checks = self.health.len(), "Aggregate health evaluated");
        result
    }

    pub async fn liveness(&self) -> Result<ProbeStatus, ProbeError> {
        self.probe(&self.liveness, ProbeError::Liveness).await
    }

    pub async fn readiness(&self) -> Result<ProbeStatus, ProbeError> {
        self.probe(&self.readiness, ProbeError::Readiness).await
    }

    async fn probe(
        &self,
        checks: &CheckList,
        failure: ProbeError,
    ) -> Result<ProbeStatus, ProbeError> {
        let results = self.aggregator.run_list(checks).await;

        match aggregate_status(results.iter().map(|(_, r)| r)) {
            Status::Up => Ok(ProbeStatus::UP),
            Status::Down => {
                let failing: Vec<&str> = results
                    .iter()
                    .filter(|(_, r)| !r.status().is_up())
                    .map(|(n, _)| n.as_str())
                    .collect();
                warn!(probe = failure.probe_name(), failing = ?failing, "Probe failed");
                Err(failure)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::CheckResult;
    use std::convert::Infallible;

    fn check(name: &str, status: Status) -> HealthCheck {
        HealthCheck::from_fn(name, move || async move {
            Ok::<_, Infallible>(CheckResult::new(status))
        })
    }

    #[tokio::test]
    async fn test_liveness_ignores_readiness_checks() {
        let probes = ProbeSet::new(
            HealthAggregator::default(),
            vec![check("database", Status::Down)],
            vec![check("cpu", Status::Up)],
            vec![check("database", Status::Down)],
        );

        assert_eq!(probes.liveness().await, Ok(ProbeStatus::UP));
        assert_eq!(probes.readiness().await, Err(ProbeError::Readiness));
        assert_eq!(probes.health(false).await.status, Status::Down);
    }

    #[tokio::test]
    async fn test_duplicate_names_resolved_once_at_construction() {
        let probes = ProbeSet::new(
            HealthAggregator::default(),
            vec![check("db", Status::Up), check("db", Status::Up)],
            vec![],
            vec![],
        );
        assert_eq!(probes.health_list().names(), ["db", "db_1"]);

        for _ in 0..2 {
            let result = probes.health(true).await;
            let names: Vec<_> = result.components.unwrap().names().map(str::to_string).collect();
            assert_eq!(names, probes.health_list().names());
        }
    }

    #[tokio::test]
    async fn test_erroring_liveness_check_fails_probe() {
        let probes = ProbeSet::new(
            HealthAggregator::default(),
            vec![],
            vec![HealthCheck::from_fn("cpu", || async {
                Err::<CheckResult, _>("sampler unavailable")
            })],
            vec![],
        );

        assert_eq!(probes.liveness().await, Err(ProbeError::Liveness));
        assert_eq!(probes.readiness().await, Ok(ProbeStatus::UP));
    }
}
