use std::fmt;
use std::time::Duration;

/// Point-in-time copy of the aggregate statistics, taken under the aggregator's lock.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub successful: u64,
    pub failed: u64,
    /// Latencies of successful requests, in the order they were recorded.
    pub latencies: Vec<Duration>,
}

impl Snapshot {
    pub fn completed(&self) -> u64 {
        self.successful + self.failed
    }
}

/// Latency figures over the successful requests of a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatencySummary {
    pub min: Duration,
    pub mean: Duration,
    pub max: Duration,
}

/// Final statistics for a run.
///
/// `latency` and `throughput` are `None` when no request succeeded.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub completed: u64,
    pub successful: u64,
    pub failed: u64,
    /// Requests never sent because `total_requests` did not divide evenly across workers.
    pub dropped: u64,
    pub elapsed: Duration,
    pub latency: Option<LatencySummary>,
    /// Successful requests per second of wall time.
    pub throughput: Option<f64>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Load Test Results:")?;
        writeln!(f, "Total requests sent: {}", self.completed)?;
        writeln!(f, "Successful requests: {}", self.successful)?;
        writeln!(f, "Failed requests: {}", self.failed)?;
        if self.dropped > 0 {
            writeln!(f, "Requests not sent (uneven split): {}", self.dropped)?;
        }
        write!(f, "Total time: {:.2} seconds", self.elapsed.as_secs_f64())?;

        if let Some(latency) = &self.latency {
            writeln!(f)?;
            writeln!(f, "Average latency: {:.4} seconds", latency.mean.as_secs_f64())?;
            writeln!(f, "Min latency: {:.4} seconds", latency.min.as_secs_f64())?;
            write!(f, "Max latency: {:.4} seconds", latency.max.as_secs_f64())?;
        }

        if let Some(throughput) = self.throughput {
            writeln!(f)?;
            write!(f, "Throughput: {throughput:.2} requests/second")?;
        }

        Ok(())
    }
}
