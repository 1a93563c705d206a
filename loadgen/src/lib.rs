//! Concurrent HTTP load generator for model prediction endpoints.
//!
//! A fixed pool of workers splits a request budget evenly, each sending randomized predict
//! payloads with a pause between requests. Outcomes land in one mutex-guarded stats object
//! that a separate task polls for a live progress line. Once every worker has finished, the
//! settled stats are summarized.
//!
//! Requests that cannot be split evenly across workers (`total % concurrency`) are never sent.

mod aggregator;
mod corpus;
mod error;
mod executor;
mod pool;
mod progress;
mod summary;
mod worker;

pub use aggregator::AggregateStats;
pub use corpus::{RequestBuilder, SampleCorpus};
pub use error::LoadError;
pub use executor::{Executor, FailureReason, RequestOutcome};
pub use load_test::LoadTest;
pub use pool::WorkerPool;
pub use progress::{progress_bar, ProgressEnd};
pub use summary::{latency_summary, report, summarize};

pub use indicatif::ProgressDrawTarget;
pub use loadgen_core as core;

pub mod prelude {
    pub use crate::{LoadError, LoadTest, SampleCorpus};
    pub use loadgen_core::{predict_url, BasicAuth, RunConfig, RunSummary};
}
