use loadgen_core::{LatencySummary, RunSummary, Snapshot};
use std::time::Duration;

/// Final statistics from the settled stats of a finished run.
///
/// Latency figures and throughput are left out when no request succeeded.
pub fn summarize(snapshot: &Snapshot, elapsed: Duration, dropped: u64) -> RunSummary {
    let latency = latency_summary(&snapshot.latencies);
    let throughput = latency.and_then(|_| {
        let secs = elapsed.as_secs_f64();
        (secs > 0.).then(|| snapshot.successful as f64 / secs)
    });

    RunSummary {
        completed: snapshot.completed(),
        successful: snapshot.successful,
        failed: snapshot.failed,
        dropped,
        elapsed,
        latency,
        throughput,
    }
}

pub fn latency_summary(latencies: &[Duration]) -> Option<LatencySummary> {
    let min = latencies.iter().min()?;
    let max = latencies.iter().max()?;
    let secs: Vec<f64> = latencies.iter().map(Duration::as_secs_f64).collect();
    let mean = statistical::mean(&secs);

    Some(LatencySummary {
        min: *min,
        mean: Duration::from_secs_f64(mean),
        max: *max,
    })
}

/// Print the summary block to stdout.
pub fn report(summary: &RunSummary) {
    println!("\n{summary}");
}
