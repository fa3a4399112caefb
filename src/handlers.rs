// src/handlers.rs

use crate::error::Result;
use crate::health::{AggregateResult, ProbeStatus};
use crate::info::AppInfo;
use crate::state::ActuatorState;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{de, Deserialize, Deserializer};
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct HealthQuery {
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub show_details: bool,
}

/// Accepts the usual query-string spellings of a boolean.
fn deserialize_flag<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(de::Error::invalid_value(
            de::Unexpected::Str(other),
            &"a boolean flag",
        )),
    }
}

/// `GET {prefix}/health`: always 200, DOWN is reported in the body.
pub async fn health(
    State(state): State<Arc<ActuatorState>>,
    Query(query): Query<HealthQuery>,
) -> Json<AggregateResult> {
    let result = state.probes.health(query.show_details).await;

    if let Some(metrics) = &state.metrics {
        metrics.set_health_status(result.status);
    }

    Json(result)
}

/// `GET {prefix}/liveness`: 503 when any liveness check is not UP.
pub async fn liveness(State(state): State<Arc<ActuatorState>>) -> Result<Json<ProbeStatus>> {
    Ok(Json(state.probes.liveness().await?))
}

/// `GET {prefix}/readiness`: 503 when any readiness check is not UP.
pub async fn readiness(State(state): State<Arc<ActuatorState>>) -> Result<Json<ProbeStatus>> {
    Ok(Json(state.probes.readiness().await?))
}

pub async fn info(State(state): State<Arc<ActuatorState>>) -> Json<AppInfo> {
    Json(state.info.collect())
}
