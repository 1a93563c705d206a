use crate::aggregator::AggregateStats;
use crate::corpus::RequestBuilder;
use crate::executor::{Executor, RequestOutcome};
use loadgen_core::SUCCESS_LOG_EVERY;
use std::sync::Arc;
use std::time::Duration;
#[allow(unused)]
use tracing::{debug, error, info, instrument, trace, warn};

/// Sends a fixed number of requests, one at a time, pausing `delay` after each.
///
/// Workers share nothing but the executor and the aggregate stats; they never wait on one
/// another.
pub(crate) struct Worker {
    id: usize,
    quota: u64,
    delay: Duration,
    builder: RequestBuilder,
    executor: Arc<Executor>,
    stats: Arc<AggregateStats>,
}

impl Worker {
    pub fn new(
        id: usize,
        quota: u64,
        delay: Duration,
        builder: RequestBuilder,
        executor: Arc<Executor>,
        stats: Arc<AggregateStats>,
    ) -> Self {
        Self {
            id,
            quota,
            delay,
            builder,
            executor,
            stats,
        }
    }

    /// Returns the number of requests sent, which is always the quota.
    #[instrument(name = "worker", skip_all, fields(id = self.id))]
    pub async fn run(mut self) -> u64 {
        let mut sent = 0;
        while sent < self.quota {
            let payload = self.builder.build();
            let outcome = self.executor.execute(&payload).await;
            self.record(outcome);
            sent += 1;

            // NOTE: The delay also follows the final request.
            tokio::time::sleep(self.delay).await;
        }

        debug!("Worker done after {sent} requests");
        sent
    }

    fn record(&self, outcome: RequestOutcome) {
        match outcome {
            RequestOutcome::Success { elapsed, .. } => {
                let successful = self.stats.record_success(elapsed);
                if successful % SUCCESS_LOG_EVERY == 0 {
                    let (_, failed) = self.stats.counts();
                    info!(
                        "Request successful, latency: {:.4}s (Success: {successful}, Fail: {failed})",
                        elapsed.as_secs_f64()
                    );
                } else {
                    debug!("Request successful, latency: {:.4}s", elapsed.as_secs_f64());
                }
            }
            RequestOutcome::Failure(reason) => {
                self.stats.record_failure();
                warn!("Request failed: {reason}");
            }
        }
    }
}
