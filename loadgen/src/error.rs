use loadgen_core::ConfigError;
use thiserror::Error;

/// Errors that stop a run before any worker starts.
///
/// Per-request problems never surface here; they are counted as failures by the aggregator.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("unable to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("target {url} is unreachable: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
