use clap::Parser;
use loadgen::core::{
    duration_from_secs, predict_url, BasicAuth, ConfigError, RunConfig, Url,
    DEFAULT_AUTH_PASSWORD, DEFAULT_AUTH_USERNAME, DEFAULT_CONCURRENCY, DEFAULT_DELAY,
    DEFAULT_MODEL_NAME, DEFAULT_PORT, DEFAULT_TIMEOUT, DEFAULT_TOTAL_REQUESTS,
};
use loadgen::SampleCorpus;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Generate load against a model prediction endpoint")]
pub struct Cli {
    /// Service hostname, optionally prefixed with http:// or https://
    #[arg(long, required_unless_present = "url")]
    pub hostname: Option<String>,

    /// Service port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Full predict URL; overrides --hostname, --port and --model
    #[arg(long, conflicts_with = "hostname")]
    pub url: Option<String>,

    /// Model name in /v1/models/<model>:predict
    #[arg(long, default_value = DEFAULT_MODEL_NAME)]
    pub model: String,

    /// Number of requests to send
    #[arg(short = 'n', long, default_value_t = DEFAULT_TOTAL_REQUESTS)]
    pub requests: u64,

    /// Number of concurrent workers
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Delay after each request in seconds
    #[arg(long, default_value_t = DEFAULT_DELAY.as_secs_f64())]
    pub delay: f64,

    /// Per-request timeout in seconds; 0 disables it
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs_f64())]
    pub timeout: f64,

    /// Send HTTP basic auth credentials
    #[arg(long)]
    pub auth: bool,

    #[arg(long, default_value = DEFAULT_AUTH_USERNAME)]
    pub username: String,

    #[arg(long, default_value = DEFAULT_AUTH_PASSWORD)]
    pub password: String,

    /// Seed for reproducible payloads
    #[arg(long)]
    pub seed: Option<u64>,

    /// File with one sample text per line
    #[arg(long)]
    pub corpus: Option<PathBuf>,

    /// Check that every response carries one prediction per instance
    #[arg(long)]
    pub verify: bool,

    /// Disable the live progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Skip the health check before starting
    #[arg(long)]
    pub skip_preflight: bool,

    /// Expose request metrics for Prometheus on this address
    #[arg(long)]
    pub prometheus: Option<SocketAddr>,
}

impl Cli {
    pub fn run_config(&self) -> Result<RunConfig, ConfigError> {
        let url = match (&self.url, &self.hostname) {
            (Some(url), _) => Url::parse(url)?,
            (None, Some(hostname)) => predict_url(hostname, Some(self.port), &self.model)?,
            (None, None) => return Err(ConfigError::MissingTarget),
        };

        let timeout = duration_from_secs("timeout", self.timeout)?;
        let auth = self
            .auth
            .then(|| BasicAuth::new(&self.username, &self.password));

        Ok(RunConfig::new(url, self.requests, self.concurrency)?
            .with_delay(duration_from_secs("delay", self.delay)?)
            .with_timeout((!timeout.is_zero()).then_some(timeout))
            .with_auth(auth)
            .with_seed(self.seed)
            .with_progress(!self.no_progress)
            .with_verify_predictions(self.verify)
            .with_preflight(!self.skip_preflight))
    }

    pub fn sample_corpus(&self) -> Result<Option<SampleCorpus>, ConfigError> {
        self.corpus
            .as_ref()
            .map(|path| SampleCorpus::from_file(path))
            .transpose()
    }
}
