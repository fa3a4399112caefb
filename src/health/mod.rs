//! Health aggregation
//!
//! Checks are named async callables returning a [`CheckResult`]. The
//! [`HealthAggregator`] fans them out concurrently, each under its own
//! timeout, and reduces the outcome to a single [`Status`]. The probe adapters
//! in [`probes`] reuse it for the health, liveness and readiness endpoints.

pub mod aggregator;
pub mod check;
pub mod probes;

pub use aggregator::{
    aggregate_status, component_names, CheckList, HealthAggregator, DEFAULT_CHECK_TIMEOUT,
};
pub use check::{HealthCheck, HealthIndicator};
pub use probes::{ProbeSet, ProbeStatus};

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Health state of a single check or of the whole application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Up,
    Down,
}

impl Status {
    pub fn is_up(self) -> bool {
        self == Status::Up
    }

    /// Value exported through the `app_health_status` gauge.
    pub fn as_gauge(self) -> f64 {
        match self {
            Status::Up => 1.0,
            Status::Down => 0.0,
        }
    }
}

/// Outcome of one health check: a status plus free-form diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    status: Status,
    #[serde(flatten)]
    details: Map<String, Value>,
}

impl CheckResult {
    pub fn up() -> Self {
        Self::new(Status::Up)
    }

    pub fn down() -> Self {
        Self::new(Status::Down)
    }

    pub fn new(status: Status) -> Self {
        Self {
            status,
            details: Map::new(),
        }
    }

    /// Synthetic DOWN result standing in for a check that failed or timed out.
    pub fn failure(error: impl std::fmt::Display) -> Self {
        Self::down().with_detail("error", error.to_string())
    }

    /// Adds a diagnostic entry. `status` is reserved and ignored here.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if key != "status" {
            self.details.insert(key, value.into());
        }
        self
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn details(&self) -> &Map<String, Value> {
        &self.details
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.get(key)
    }

    /// The `error` field of a synthetic failure, if any.
    pub fn error(&self) -> Option<&str> {
        self.details.get("error").and_then(Value::as_str)
    }
}

/// Per-check results in check-list order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Components(Vec<(String, CheckResult)>);

impl Components {
    pub fn new(entries: Vec<(String, CheckResult)>) -> Self {
        Self(entries)
    }

    pub fn get(&self, name: &str) -> Option<&CheckResult> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CheckResult)> {
        self.0.iter().map(|(n, r)| (n.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Components {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, result) in &self.0 {
            map.serialize_entry(name, result)?;
        }
        map.end()
    }
}

/// Body of the aggregate health endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_check_result_serializes_flat() {
        let result = CheckResult::up()
            .with_detail("cpu_percent", 12.5)
            .with_detail("status", "ignored");

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value, json!({"status": "UP", "cpu_percent": 12.5}));
    }

    #[test]
    fn test_check_result_deserializes_extra_fields() {
        let result: CheckResult =
            serde_json::from_value(json!({"status": "DOWN", "reason": "Test failure"})).unwrap();
        assert_eq!(result.status(), Status::Down);
        assert_eq!(result.detail("reason"), Some(&json!("Test failure")));
    }

    #[test]
    fn test_components_keep_insertion_order() {
        let components = Components::new(vec![
            ("zeta".to_string(), CheckResult::up()),
            ("alpha".to_string(), CheckResult::failure("boom")),
        ]);

        let text = serde_json::to_string(&components).unwrap();
        assert!(text.find("zeta").unwrap() < text.find("alpha").unwrap());
        assert_eq!(components.get("alpha").and_then(CheckResult::error), Some("boom"));
    }

    #[test]
    fn test_aggregate_result_omits_components_without_details() {
        let result = AggregateResult {
            status: Status::Down,
            components: None,
        };
        assert_eq!(serde_json::to_value(&result).unwrap(), json!({"status": "DOWN"}));
    }
}
