mod utils;
#[allow(unused)]
use utils::*;

use loadgen::prelude::*;
use mock_service::{Behavior, MockConfig};
use std::time::Duration;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ntest::timeout(30_000)]
async fn every_request_succeeds() {
    let mock = MockConfig::default().latency(Duration::from_millis(10));
    let (handle, config) = mock_run(mock, 100, 10).await;

    let summary = LoadTest::new(config).await.unwrap();

    assert_eq!(summary.completed, 100);
    assert_eq!(summary.successful, 100);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.dropped, 0);
    assert_eq!(handle.hits(), 100);

    let latency = summary.latency.unwrap();
    assert!(latency.min >= Duration::from_millis(10));
    assert!(latency.mean >= latency.min);
    assert!(latency.max >= latency.mean);
    assert!(latency.mean < Duration::from_millis(200));

    let expected = summary.successful as f64 / summary.elapsed.as_secs_f64();
    let throughput = summary.throughput.unwrap();
    assert!((throughput - expected).abs() < 1e-6 * expected);
    // Ten workers against a 10ms service cannot exceed ~1000 requests per second.
    assert!(throughput <= 1_000.);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ntest::timeout(30_000)]
async fn half_the_responses_fail() {
    let mock = MockConfig::default().behavior(Behavior::Alternate);
    let (_handle, config) = mock_run(mock, 100, 10).await;

    let summary = LoadTest::new(config).await.unwrap();

    assert_eq!(summary.successful, 50);
    assert_eq!(summary.failed, 50);
    assert_eq!(summary.completed, 100);
}

#[tokio::test]
#[ntest::timeout(30_000)]
async fn all_errors_leave_latency_empty() {
    let mock = MockConfig::default().behavior(Behavior::AlwaysStatus(500));
    let (_handle, config) = mock_run(mock, 20, 4).await;

    let summary = LoadTest::new(config).await.unwrap();

    assert_eq!(summary.successful, 0);
    assert_eq!(summary.failed, 20);
    assert!(summary.latency.is_none());
    assert!(summary.throughput.is_none());
    assert!(!summary.to_string().contains("Throughput"));
}

#[tokio::test]
#[ntest::timeout(30_000)]
async fn uneven_split_drops_the_remainder() {
    let (handle, config) = mock_run(MockConfig::default(), 10, 3).await;

    let summary = LoadTest::new(config).await.unwrap();

    assert_eq!(summary.completed, 9);
    assert_eq!(summary.dropped, 1);
    assert_eq!(handle.hits(), 9);
}

#[tokio::test]
#[ntest::timeout(30_000)]
async fn fewer_requests_than_workers_sends_nothing() {
    let (handle, config) = mock_run(MockConfig::default(), 3, 5).await;

    let summary = LoadTest::new(config).await.unwrap();

    assert_eq!(summary.completed, 0);
    assert_eq!(summary.dropped, 3);
    assert!(summary.latency.is_none());
    assert_eq!(handle.hits(), 0);
}

#[tokio::test]
#[ntest::timeout(30_000)]
async fn delay_paces_each_worker() {
    let (_handle, config) = mock_run(MockConfig::default(), 10, 2).await;
    let config = config.with_delay(Duration::from_millis(50));

    let summary = LoadTest::new(config).await.unwrap();

    // Five requests per worker, each followed by the delay.
    assert_eq!(summary.successful, 10);
    assert!(summary.elapsed >= Duration::from_millis(250));
}

#[tokio::test]
#[ntest::timeout(30_000)]
async fn custom_corpus_and_seed() {
    let corpus = SampleCorpus::new(vec!["Only this review".to_string()]).unwrap();
    let (handle, config) = mock_run(MockConfig::default(), 12, 3).await;
    let config = config.with_seed(Some(42)).with_verify_predictions(true);

    let summary = LoadTest::new(config).corpus(corpus).await.unwrap();

    assert_eq!(summary.successful, 12);
    assert_eq!(handle.hits(), 12);
}
