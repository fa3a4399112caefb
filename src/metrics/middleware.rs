use crate::metrics::MetricsRegistry;
use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// `endpoint` label of requests no route matched.
pub const UNMATCHED_ENDPOINT: &str = "unmatched";

/// Measures every request and records it in the registry: one count keyed by
/// method, route and status, plus one duration observation.
///
/// The route is the matched template (`/users/:id`). Requests no route
/// matched share the `unmatched` label, so stray paths add no new series.
pub async fn metrics_middleware(
    State(registry): State<Arc<MetricsRegistry>>,
    req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let endpoint = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ENDPOINT.to_string());

    let response = next.run(req).await;
    let status = response.status();
    let elapsed = start.elapsed();

    registry.record_request(method.as_str(), &endpoint, status.as_u16(), elapsed);
    debug!(
        http.method = %method,
        url.path = %endpoint,
        http.status_code = status.as_u16(),
        http.response.duration = ?elapsed,
        "metrics_middleware: request recorded"
    );

    response
}
