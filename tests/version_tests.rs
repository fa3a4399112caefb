// tests/version_tests.rs

mod common;

use axum::http::StatusCode;
use common::{app_with, checks, get_json, uniform};
use fastuator::info::{
    env_version_lookup, fixed_version, resolve_version, InfoProvider, VersionError, VersionLookup,
    DEV_VERSION, VERSION_ENV_VAR,
};
use rstest::rstest;
use serial_test::serial;
use std::sync::Arc;

fn failing_lookup(error: VersionError) -> VersionLookup {
    Arc::new(move || Err(error.clone()))
}

#[rstest]
#[case("0.0.1")]
#[case("1.2.3-dev")]
#[case("2.0.0+build.7")]
fn test_declared_version_is_reported(#[case] version: &str) {
    let info = InfoProvider::new(fixed_version(version)).collect();
    assert_eq!(info.build.version, version);
}

#[rstest]
#[case(VersionError::NotFound)]
#[case(VersionError::Lookup("metadata unreadable".to_string()))]
fn test_failed_lookup_falls_back_to_dev(#[case] error: VersionError) {
    assert_eq!(resolve_version(failing_lookup(error).as_ref()), DEV_VERSION);
}

#[tokio::test]
async fn test_info_endpoint_reports_dev_on_lookup_failure() {
    let app = app_with(
        uniform(checks::passing("ok")).version_lookup(failing_lookup(VersionError::NotFound)),
    );

    let (status, body) = get_json(&app, "/fastuator/info").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["build"]["version"], DEV_VERSION);
}

#[test]
#[serial]
fn test_env_lookup_reads_variable() {
    std::env::set_var(VERSION_ENV_VAR, "3.1.4");
    let version = resolve_version(env_version_lookup().as_ref());
    std::env::remove_var(VERSION_ENV_VAR);

    assert_eq!(version, "3.1.4");
}

#[test]
#[serial]
fn test_env_lookup_without_variable_is_dev() {
    std::env::remove_var(VERSION_ENV_VAR);
    assert_eq!(resolve_version(env_version_lookup().as_ref()), DEV_VERSION);
}
