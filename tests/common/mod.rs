//! Common test utilities and fixtures

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    routing::get,
    Router,
};
use fastuator::{CheckResult, Fastuator, FastuatorBuilder, HealthCheck, HostApp};
use std::convert::Infallible;

/// Ready-made checks
pub mod checks {
    use super::*;

    pub fn passing(name: &str) -> HealthCheck {
        HealthCheck::from_fn(name, || async { Ok::<_, Infallible>(CheckResult::up()) })
    }

    pub fn failing(name: &str) -> HealthCheck {
        HealthCheck::from_fn(name, || async {
            Ok::<_, Infallible>(CheckResult::down().with_detail("reason", "Test failure"))
        })
    }

    pub fn raising(name: &str, message: &'static str) -> HealthCheck {
        HealthCheck::from_fn(name, move || async move { Err::<CheckResult, _>(message) })
    }
}

/// Host application with one route of its own plus the actuator built by
/// `builder`.
pub fn app_with(builder: FastuatorBuilder) -> Router {
    let mut app = HostApp::new(Router::new().route("/", get(|| async { "home" })));
    builder.build().unwrap().install(&mut app);
    app.into_router()
}

/// Builder whose three check lists all use `check`.
pub fn uniform(check: HealthCheck) -> FastuatorBuilder {
    Fastuator::builder()
        .health_checks(vec![check.clone()])
        .liveness_checks(vec![check.clone()])
        .readiness_checks(vec![check])
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Issues a GET and returns the status and the raw body.
pub async fn get_text(router: &Router, uri: &str) -> (StatusCode, String, Option<String>) {
    use tower::ServiceExt;

    let response = router.clone().oneshot(get_request(uri)).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap(), content_type)
}

/// Issues a GET and parses the JSON body.
pub async fn get_json(router: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, body, _) = get_text(router, uri).await;
    let json = serde_json::from_str(&body).expect("Response body should be valid JSON");
    (status, json)
}
