use crate::metrics::MetricsRegistry;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::sync::Arc;
use tracing::debug;

/// Content type of the Prometheus text exposition format.
pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Renders the registry in the Prometheus text format.
pub async fn metrics_handler(State(registry): State<Arc<MetricsRegistry>>) -> impl IntoResponse {
    let body = registry.render();
    debug!(bytes = body.len(), "Metrics scraped");
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)],
        body,
    )
}

/// Sub-application serving the exposition at `path`.
pub fn metrics_router(path: &str, registry: Arc<MetricsRegistry>) -> Router {
    Router::new()
        .route(path, get(metrics_handler))
        .with_state(registry)
}
