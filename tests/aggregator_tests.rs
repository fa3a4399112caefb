// tests/aggregator_tests.rs

mod common;

use fastuator::health::{
    aggregate_status, component_names, CheckResult, HealthAggregator, HealthCheck, ProbeSet,
    Status, DEFAULT_CHECK_TIMEOUT,
};
use proptest::prelude::*;
use std::convert::Infallible;
use std::time::Duration;
use tokio::time::Instant;

fn sleeping(name: &str, delay: Duration) -> HealthCheck {
    HealthCheck::from_fn(name, move || async move {
        tokio::time::sleep(delay).await;
        Ok::<_, Infallible>(CheckResult::up())
    })
}

#[tokio::test(start_paused = true)]
async fn test_slow_check_times_out() {
    let aggregator = HealthAggregator::new(DEFAULT_CHECK_TIMEOUT);
    let checks = vec![sleeping("slow", Duration::from_secs(10))];

    let started = Instant::now();
    let result = aggregator.aggregate(&checks, true).await;

    assert!(started.elapsed() < Duration::from_secs(6));
    assert_eq!(result.status, Status::Down);
    let slow = result.components.as_ref().and_then(|c| c.get("slow")).unwrap();
    assert_eq!(slow.status(), Status::Down);
    assert!(slow.error().unwrap().contains("timed out"));
}

#[tokio::test(start_paused = true)]
async fn test_checks_run_concurrently() {
    let aggregator = HealthAggregator::new(Duration::from_secs(5));
    let checks: Vec<_> = (0..4)
        .map(|i| sleeping(&format!("check{i}"), Duration::from_secs(2)))
        .collect();

    let started = Instant::now();
    let result = aggregator.aggregate(&checks, false).await;

    assert_eq!(result.status, Status::Up);
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_timeout_leaves_fast_checks_intact() {
    let aggregator = HealthAggregator::new(Duration::from_secs(1));
    let checks = vec![
        sleeping("fast", Duration::from_millis(10)),
        sleeping("slow", Duration::from_secs(30)),
    ];

    let results = aggregator.run(&checks).await;
    assert_eq!(results[0].0, "fast");
    assert_eq!(results[0].1.status(), Status::Up);
    assert_eq!(results[1].0, "slow");
    assert_eq!(results[1].1.status(), Status::Down);
}

#[tokio::test]
async fn test_probe_set_empty_lists_are_up() {
    let probes = ProbeSet::new(HealthAggregator::default(), vec![], vec![], vec![]);

    assert_eq!(probes.health(true).await.status, Status::Up);
    assert!(probes.liveness().await.is_ok());
    assert!(probes.readiness().await.is_ok());
}

#[tokio::test]
async fn test_details_are_passed_through() {
    let check = HealthCheck::from_fn("redis_health", || async {
        Ok::<_, Infallible>(CheckResult::up().with_detail("redis", "connected"))
    });
    let result = HealthAggregator::default().aggregate(&[check], true).await;

    let redis = result.components.unwrap();
    assert_eq!(
        redis.get("redis_health").and_then(|r| r.detail("redis")),
        Some(&serde_json::json!("connected"))
    );
}

#[test]
fn test_unnamed_checks_use_index() {
    let checks = vec![
        HealthCheck::unnamed_fn(|| async { Ok::<_, Infallible>(CheckResult::up()) }),
        common::checks::passing("named"),
        HealthCheck::unnamed_fn(|| async { Ok::<_, Infallible>(CheckResult::up()) }),
    ];

    assert_eq!(component_names(&checks), vec!["check_0", "named", "check_2"]);
}

#[derive(Debug, Clone, Copy)]
enum Outcome {
    Up,
    Down,
    Error,
}

fn outcome_strategy() -> impl Strategy<Value = Outcome> {
    prop_oneof![Just(Outcome::Up), Just(Outcome::Down), Just(Outcome::Error)]
}

fn check_for(index: usize, outcome: Outcome) -> HealthCheck {
    let name = format!("c{index}");
    match outcome {
        Outcome::Up => common::checks::passing(&name),
        Outcome::Down => common::checks::failing(&name),
        Outcome::Error => common::checks::raising(&name, "boom"),
    }
}

proptest! {
    #[test]
    fn prop_aggregate_down_iff_any_not_up(outcomes in prop::collection::vec(outcome_strategy(), 0..8)) {
        let checks: Vec<_> = outcomes
            .iter()
            .enumerate()
            .map(|(i, o)| check_for(i, *o))
            .collect();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let result = runtime.block_on(HealthAggregator::default().aggregate(&checks, true));

        let expected = if outcomes.iter().all(|o| matches!(o, Outcome::Up)) {
            Status::Up
        } else {
            Status::Down
        };
        prop_assert_eq!(result.status, expected);

        let components = result.components.unwrap();
        prop_assert_eq!(components.len(), outcomes.len());
        prop_assert_eq!(aggregate_status(components.iter().map(|(_, r)| r)), expected);
    }
}
