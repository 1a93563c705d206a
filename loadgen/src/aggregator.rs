use loadgen_core::Snapshot;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Debug, Default)]
struct StatsData {
    successful: u64,
    failed: u64,
    latencies: Vec<Duration>,
}

/// Shared success/failure counters and latency log for a run.
///
/// Every read and write goes through a single mutex, so a count and its latency are always
/// updated together and a [`Snapshot`] never sees one without the other.
#[derive(Debug, Default)]
pub struct AggregateStats {
    data: Mutex<StatsData>,
}

impl AggregateStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the success count including this one.
    pub fn record_success(&self, latency: Duration) -> u64 {
        let mut data = self.lock();
        data.successful += 1;
        data.latencies.push(latency);
        data.successful
    }

    /// Returns the failure count including this one.
    pub fn record_failure(&self) -> u64 {
        let mut data = self.lock();
        data.failed += 1;
        data.failed
    }

    pub fn snapshot(&self) -> Snapshot {
        let data = self.lock();
        Snapshot {
            successful: data.successful,
            failed: data.failed,
            latencies: data.latencies.clone(),
        }
    }

    /// `(successful, failed)` without copying the latency log.
    pub fn counts(&self) -> (u64, u64) {
        let data = self.lock();
        (data.successful, data.failed)
    }

    // NOTE: No critical section can panic, so a poisoned lock still guards consistent data.
    fn lock(&self) -> MutexGuard<'_, StatsData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
