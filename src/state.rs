// src/state.rs

use crate::health::ProbeSet;
use crate::info::InfoProvider;
use crate::metrics::MetricsRegistry;
use std::sync::Arc;

/// Shared state of the actuator endpoints.
#[derive(Debug)]
pub struct ActuatorState {
    pub probes: ProbeSet,
    pub info: InfoProvider,
    pub metrics: Option<Arc<MetricsRegistry>>,
}

impl ActuatorState {
    pub fn new(probes: ProbeSet, info: InfoProvider, metrics: Option<Arc<MetricsRegistry>>) -> Self {
        Self {
            probes,
            info,
            metrics,
        }
    }
}
