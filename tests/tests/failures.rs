mod utils;
#[allow(unused)]
use utils::*;

use loadgen::prelude::*;
use mock_service::{Behavior, MockConfig};
use std::num::NonZeroU32;
use std::time::Duration;

const ADMIN_HEADER: &str = "Basic YWRtaW46a3NlcnZlLWRlbW8=";

#[tokio::test]
#[ntest::timeout(30_000)]
async fn unreachable_target_counts_failures() {
    init();
    let config = config_for(closed_port(), 8, 2).with_preflight(false);

    let summary = LoadTest::new(config).await.unwrap();

    assert_eq!(summary.failed, 8);
    assert_eq!(summary.successful, 0);
    assert!(summary.latency.is_none());
}

#[tokio::test]
#[ntest::timeout(30_000)]
async fn preflight_aborts_unreachable_target() {
    init();
    let config = config_for(closed_port(), 8, 2);

    let err = LoadTest::new(config).await.unwrap_err();

    assert!(matches!(err, LoadError::Unreachable { .. }));
}

#[tokio::test]
#[ntest::timeout(30_000)]
async fn preflight_accepts_any_http_answer() {
    let mock = MockConfig {
        model: "other-model".to_string(),
        ..MockConfig::default()
    };
    let (_handle, config) = mock_run(mock, 4, 2).await;

    // Health route 404s and every predict call lands on the wrong model.
    let summary = LoadTest::new(config).await.unwrap();

    assert_eq!(summary.failed, 4);
}

#[tokio::test]
#[ntest::timeout(30_000)]
async fn basic_auth_is_sent() {
    let mock = MockConfig::default().required_auth(ADMIN_HEADER);
    let (_handle, config) = mock_run(mock, 10, 2).await;
    let config = config.with_auth(Some(BasicAuth::new("admin", "kserve-demo")));

    let summary = LoadTest::new(config).await.unwrap();

    assert_eq!(summary.successful, 10);
}

#[tokio::test]
#[ntest::timeout(30_000)]
async fn missing_auth_is_rejected() {
    let mock = MockConfig::default().required_auth(ADMIN_HEADER);
    let (handle, config) = mock_run(mock, 10, 2).await;

    let summary = LoadTest::new(config).await.unwrap();

    assert_eq!(summary.failed, 10);
    assert_eq!(handle.hits(), 10);
}

#[tokio::test]
#[ntest::timeout(30_000)]
async fn verify_catches_short_responses() {
    let mock = MockConfig::default().behavior(Behavior::ShortPredictions);
    let (_handle, config) = mock_run(mock, 6, 2).await;

    let unverified = LoadTest::new(config.clone()).await.unwrap();
    assert_eq!(unverified.successful, 6);

    let verified = LoadTest::new(config.with_verify_predictions(true))
        .await
        .unwrap();
    assert_eq!(verified.failed, 6);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ntest::timeout(30_000)]
async fn throttled_requests_are_failures() {
    let mock = MockConfig::default().max_tps(NonZeroU32::new(1).unwrap());
    let (_handle, config) = mock_run(mock, 20, 5).await;

    let summary = LoadTest::new(config).await.unwrap();

    assert_eq!(summary.completed, 20);
    assert!(summary.successful >= 1);
    assert!(summary.failed >= 1);
}

#[tokio::test]
#[ntest::timeout(30_000)]
async fn slow_responses_time_out() {
    let mock = MockConfig::default().latency(Duration::from_secs(2));
    let (_handle, config) = mock_run(mock, 2, 2).await;
    let config = config.with_timeout(Some(Duration::from_millis(100)));

    let summary = LoadTest::new(config).await.unwrap();

    assert_eq!(summary.failed, 2);
}
