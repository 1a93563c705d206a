//! Live progress line, polled from the aggregate stats on its own schedule.
use crate::aggregator::AggregateStats;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use loadgen_core::RunConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, Instant, Interval, MissedTickBehavior};
#[allow(unused)]
use tracing::{debug, error, info, trace, warn};

const PROGRESS_TEMPLATE: &str = "Progress: |{bar:30}| {percent}% Complete ({pos}/{len})";
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Why the progress loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgressEnd {
    Completed,
    DeadlineExceeded,
}

/// Build the bar the reporter draws into.
///
/// indicatif swallows terminal write errors, so a broken terminal never reaches the run.
pub fn progress_bar(total: u64, target: ProgressDrawTarget) -> ProgressBar {
    let bar = ProgressBar::with_draw_target(Some(total), target);
    match ProgressStyle::with_template(PROGRESS_TEMPLATE) {
        Ok(style) => bar.set_style(style.progress_chars("█▌-")),
        Err(err) => warn!("Invalid progress template, using default style: {err}"),
    }
    bar
}

/// Polls the stats until every request has completed or the deadline passes.
///
/// Never signals or cancels workers; the only link between the two is the shared stats.
pub(crate) struct ProgressReporter {
    stats: Arc<AggregateStats>,
    bar: ProgressBar,
    total: u64,
    interval: Duration,
    deadline: Duration,
}

impl ProgressReporter {
    pub fn new(
        stats: Arc<AggregateStats>,
        bar: ProgressBar,
        total: u64,
        interval: Duration,
        deadline: Duration,
    ) -> Self {
        Self {
            stats,
            bar,
            total,
            interval,
            deadline,
        }
    }

    pub fn from_config(config: &RunConfig, stats: Arc<AggregateStats>, bar: ProgressBar) -> Self {
        Self::new(
            stats,
            bar,
            config.total_requests,
            config.progress_interval,
            config.progress_deadline(),
        )
    }

    pub async fn run(self) -> ProgressEnd {
        let start = Instant::now();
        let mut timer = Timer::new(self.interval.max(MIN_POLL_INTERVAL)).await;

        loop {
            let (successful, failed) = self.stats.counts();
            let completed = successful + failed;
            self.bar.set_position(completed.min(self.total));

            if completed >= self.total {
                trace!("Progress complete at {completed}/{}", self.total);
                return ProgressEnd::Completed;
            }

            if start.elapsed() > self.deadline {
                debug!(
                    "Progress reporting stopped after {} at {completed}/{}",
                    humantime::format_duration(self.deadline),
                    self.total
                );
                return ProgressEnd::DeadlineExceeded;
            }

            timer.tick().await;
        }
    }
}

struct Timer {
    interval: Interval,
}

impl Timer {
    async fn new(interval_dur: Duration) -> Self {
        let mut interval = interval(interval_dur);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // NOTE: First tick completes instantly
        interval.tick().await;
        Self { interval }
    }

    async fn tick(&mut self) {
        self.interval.tick().await;
    }
}
