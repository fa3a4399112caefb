// src/health/aggregator.rs

use crate::error::CheckError;
use crate::health::{AggregateResult, CheckResult, Components, HealthCheck, Status};
use futures_util::future::join_all;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, warn};

/// Per-check time limit used when none is configured.
pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs health checks concurrently and folds them into one verdict.
#[derive(Debug, Clone, Copy)]
pub struct HealthAggregator {
    timeout: Duration,
}

impl Default for HealthAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_CHECK_TIMEOUT)
    }
}

impl HealthAggregator {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Executes every check in its own task under the per-check timeout.
    ///
    /// Errors, panics and timeouts become synthetic DOWN results. The output
    /// follows the order of `checks`, whatever order the tasks finish in.
    pub async fn run(&self, checks: &[HealthCheck]) -> Vec<(String, CheckResult)> {
        self.run_list(&CheckList::new(checks.to_vec())).await
    }

    /// Like [`HealthAggregator::run`], reusing the names resolved when `list`
    /// was built.
    pub async fn run_list(&self, list: &CheckList) -> Vec<(String, CheckResult)> {
        let limit = self.timeout;

        let tasks: Vec<_> = list
            .checks()
            .iter()
            .map(|check| {
                let indicator = check.indicator();
                tokio::spawn(async move {
                    match tokio::time::timeout(limit, indicator.check()).await {
                        Ok(outcome) => outcome,
                        Err(_) => Err(CheckError::Timeout(limit)),
                    }
                })
            })
            .collect();

        // Wait for all checks; a failed task never cancels its siblings
        let outcomes = join_all(tasks).await;

        list.names()
            .iter()
            .cloned()
            .zip(outcomes)
            .map(|(name, joined)| {
                let result = match joined.map_err(CheckError::from).and_then(|outcome| outcome) {
                    Ok(result) => {
                        debug!(check = %name, status = ?result.status(), "Health check completed");
                        result
                    }
                    Err(e) => {
                        warn!(check = %name, error = %e, "Health check failed");
                        CheckResult::failure(e)
                    }
                };
                (name, result)
            })
            .collect()
    }

    /// Runs `checks` and reduces them; `show_details` keeps per-check records.
    pub async fn aggregate(&self, checks: &[HealthCheck], show_details: bool) -> AggregateResult {
        self.aggregate_list(&CheckList::new(checks.to_vec()), show_details).await
    }

    pub async fn aggregate_list(&self, list: &CheckList, show_details: bool) -> AggregateResult {
        let results = self.run_list(list).await;
        let status = aggregate_status(results.iter().map(|(_, r)| r));

        AggregateResult {
            status,
            components: show_details.then(|| Components::new(results)),
        }
    }
}

/// Checks together with the names they are reported under, resolved once.
#[derive(Debug, Clone, Default)]
pub struct CheckList {
    names: Vec<String>,
    checks: Vec<HealthCheck>,
}

impl CheckList {
    pub fn new(checks: Vec<HealthCheck>) -> Self {
        Self {
            names: component_names(&checks),
            checks,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn checks(&self) -> &[HealthCheck] {
        &self.checks
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

/// DOWN if any result is not UP. An empty list is UP.
pub fn aggregate_status<'a>(results: impl IntoIterator<Item = &'a CheckResult>) -> Status {
    if results.into_iter().all(|r| r.status().is_up()) {
        Status::Up
    } else {
        Status::Down
    }
}

/// Names checks are reported under: the declared name, else `check_<index>`.
/// A name already taken gets an `_<index>` suffix.
pub fn component_names(checks: &[HealthCheck]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(checks.len());

    checks
        .iter()
        .enumerate()
        .map(|(index, check)| {
            let base = check
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("check_{index}"));

            let mut name = base.clone();
            let mut attempt = 0usize;
            while !seen.insert(name.clone()) {
                name = if attempt == 0 {
                    format!("{base}_{index}")
                } else {
                    format!("{base}_{index}_{attempt}")
                };
                attempt += 1;
            }
            if name != base {
                warn!(check = %base, reported_as = %name, "Duplicate health check name");
            }
            name
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    fn up(name: &str) -> HealthCheck {
        HealthCheck::from_fn(name, || async { Ok::<_, Infallible>(CheckResult::up()) })
    }

    #[test]
    fn test_aggregate_status_empty_is_up() {
        assert_eq!(aggregate_status(std::iter::empty()), Status::Up);
    }

    #[test]
    fn test_aggregate_status_any_down() {
        let results = [CheckResult::up(), CheckResult::down(), CheckResult::up()];
        assert_eq!(aggregate_status(&results), Status::Down);
    }

    #[test]
    fn test_component_names_fallback_and_dedupe() {
        let checks = vec![
            up("db"),
            HealthCheck::unnamed_fn(|| async { Ok::<_, Infallible>(CheckResult::up()) }),
            up("db"),
            up("check_1"),
        ];

        assert_eq!(
            component_names(&checks),
            vec!["db", "check_1", "db_2", "check_1_3"]
        );
    }

    #[tokio::test]
    async fn test_run_preserves_input_order() {
        let slow = HealthCheck::from_fn("slow", || async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok::<_, Infallible>(CheckResult::up())
        });
        let checks = vec![slow, up("fast")];

        let results = HealthAggregator::default().run(&checks).await;
        let names: Vec<_> = results.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["slow", "fast"]);
    }
}
