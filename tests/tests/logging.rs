mod utils;
#[allow(unused)]
use utils::*;

use loadgen::prelude::*;
use tracing_test::traced_test;

#[tokio::test]
#[traced_test]
async fn failures_are_logged_and_summarized() {
    let config = config_for(closed_port(), 4, 2).with_preflight(false);

    let summary = LoadTest::new(config).await.unwrap();

    assert_eq!(summary.failed, 4);
    assert!(logs_contain("Request failed"));
    assert!(logs_contain("Load test complete"));
}
