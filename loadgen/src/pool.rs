use crate::aggregator::AggregateStats;
use crate::corpus::{RequestBuilder, SampleCorpus};
use crate::error::LoadError;
use crate::executor::Executor;
use crate::progress::{progress_bar, ProgressReporter};
use crate::summary::summarize;
use crate::worker::Worker;
use indicatif::ProgressDrawTarget;
use loadgen_core::{RunConfig, RunSummary};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn, Instrument};

/// Splits the request budget across a fixed set of workers and waits for all of them.
pub struct WorkerPool {
    config: RunConfig,
    corpus: Arc<SampleCorpus>,
    stats: Arc<AggregateStats>,
    progress_target: ProgressDrawTarget,
}

impl WorkerPool {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            corpus: Arc::new(SampleCorpus::default()),
            stats: Arc::new(AggregateStats::new()),
            progress_target: ProgressDrawTarget::stderr(),
        }
    }

    pub fn corpus(mut self, corpus: SampleCorpus) -> Self {
        self.corpus = Arc::new(corpus);
        self
    }

    pub fn progress_target(mut self, target: ProgressDrawTarget) -> Self {
        self.progress_target = target;
        self
    }

    /// Handle to the live stats, readable while the pool runs.
    pub fn stats(&self) -> Arc<AggregateStats> {
        self.stats.clone()
    }

    /// Run every worker to completion and summarize.
    ///
    /// Only setup can fail. Once workers start, request failures end up in the stats and the
    /// join below always waits for every worker.
    #[instrument(name = "load_test", skip_all, fields(url = %self.config.url))]
    pub async fn run(self) -> Result<RunSummary, LoadError> {
        let WorkerPool {
            config,
            corpus,
            stats,
            progress_target,
        } = self;

        info!("Starting load test: {config}");
        let executor = Arc::new(Executor::new(&config)?);
        if config.preflight {
            executor.preflight().await?;
        }

        let quota = config.quota();
        if config.dropped_requests() > 0 {
            warn!(
                "{} requests do not split evenly across {} workers; {} will not be sent",
                config.total_requests,
                config.concurrency,
                config.dropped_requests()
            );
        }

        let start = Instant::now();

        let progress = config.progress.then(|| {
            let bar = progress_bar(config.total_requests, progress_target);
            let reporter = ProgressReporter::from_config(&config, stats.clone(), bar.clone());
            (bar, tokio::spawn(reporter.run().in_current_span()))
        });

        let workers: Vec<JoinHandle<u64>> = (0..config.concurrency.get())
            .map(|id| {
                let seed = config.seed.map(|seed| seed.wrapping_add(id as u64));
                let builder = RequestBuilder::seeded(corpus.clone(), seed);
                let worker = Worker::new(
                    id,
                    quota,
                    config.delay,
                    builder,
                    executor.clone(),
                    stats.clone(),
                );
                tokio::spawn(worker.run().in_current_span())
            })
            .collect();

        let mut sent = 0;
        for (id, handle) in workers.into_iter().enumerate() {
            match handle.await {
                Ok(count) => sent += count,
                Err(err) => error!("Worker {id} did not finish: {err}"),
            }
        }
        let elapsed = start.elapsed();

        if let Some((bar, handle)) = progress {
            handle.abort();
            bar.set_position(stats.snapshot().completed().min(config.total_requests));
            bar.abandon();
        }

        let summary = summarize(&stats.snapshot(), elapsed, config.dropped_requests());
        info!(
            "Load test complete: {sent} sent, {} succeeded, {} failed in {}",
            summary.successful,
            summary.failed,
            humantime::format_duration(elapsed)
        );

        Ok(summary)
    }
}
