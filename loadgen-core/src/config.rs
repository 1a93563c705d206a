use crate::{DEFAULT_DELAY, DEFAULT_TIMEOUT, PROGRESS_DEADLINE_FACTOR, PROGRESS_INTERVAL};
use std::fmt;
use std::num::NonZeroUsize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("no target given; provide a hostname or a URL")]
    MissingTarget,

    #[error("invalid target URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("unsupported URL scheme `{0}` (expected http or https)")]
    UnsupportedScheme(String),

    #[error("invalid {name}: {value} is not a valid number of seconds")]
    InvalidDuration { name: &'static str, value: f64 },

    #[error("sample corpus is empty")]
    EmptyCorpus,

    #[error("unable to read sample corpus: {0}")]
    Corpus(#[from] std::io::Error),
}

/// Credentials sent as `Authorization: Basic <base64(user:pass)>`.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Parameters for a single load test run.
///
/// Built once before any worker starts and shared read-only afterwards. `concurrency` is a
/// `NonZeroUsize`, so a config that exists always has at least one worker.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub url: Url,
    pub total_requests: u64,
    pub concurrency: NonZeroUsize,
    /// Pause after every request, including each worker's last one.
    pub delay: Duration,
    pub timeout: Option<Duration>,
    pub auth: Option<BasicAuth>,
    /// Base seed for per-worker random sources. Worker `n` uses `seed + n`.
    pub seed: Option<u64>,
    pub progress: bool,
    pub progress_interval: Duration,
    /// Decode every 2xx body and count a mismatched prediction list as a failure.
    pub verify_predictions: bool,
    /// Probe the health endpoint before starting any worker.
    pub preflight: bool,
}

impl RunConfig {
    pub fn new(url: Url, total_requests: u64, concurrency: usize) -> Result<Self, ConfigError> {
        check_scheme(&url)?;
        let concurrency = NonZeroUsize::new(concurrency).ok_or(ConfigError::ZeroConcurrency)?;

        Ok(Self {
            url,
            total_requests,
            concurrency,
            delay: DEFAULT_DELAY,
            timeout: Some(DEFAULT_TIMEOUT),
            auth: None,
            seed: None,
            progress: true,
            progress_interval: PROGRESS_INTERVAL,
            verify_predictions: false,
            preflight: true,
        })
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_auth(mut self, auth: Option<BasicAuth>) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn with_verify_predictions(mut self, verify: bool) -> Self {
        self.verify_predictions = verify;
        self
    }

    pub fn with_preflight(mut self, preflight: bool) -> Self {
        self.preflight = preflight;
        self
    }

    /// Requests each worker sends.
    ///
    /// Integer division: the remainder `total_requests % concurrency` is never sent.
    pub fn quota(&self) -> u64 {
        self.total_requests / self.concurrency.get() as u64
    }

    /// Requests the whole pool will attempt, `quota * concurrency`.
    pub fn attempted_requests(&self) -> u64 {
        self.quota() * self.concurrency.get() as u64
    }

    /// Requests dropped by the quota truncation.
    pub fn dropped_requests(&self) -> u64 {
        self.total_requests - self.attempted_requests()
    }

    /// Run length if every worker spent exactly `delay` per request and the network took no
    /// time at all.
    ///
    /// Saturates at `Duration::MAX`.
    pub fn expected_duration(&self) -> Duration {
        saturating_mul_f64(
            self.delay,
            self.total_requests as f64 / self.concurrency.get() as f64,
        )
    }

    /// Point after which the progress reporter stops polling.
    pub fn progress_deadline(&self) -> Duration {
        saturating_mul_f64(self.expected_duration(), PROGRESS_DEADLINE_FACTOR)
    }

    /// The model metadata endpoint, `/v1/models/<model>`, derived from the predict URL.
    pub fn health_url(&self) -> Url {
        let mut url = self.url.clone();
        let path = url.path().trim_end_matches(":predict").to_string();
        url.set_path(&path);
        url
    }
}

impl fmt::Display for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} requests to {} with {} workers, delay={}",
            self.total_requests,
            self.url,
            self.concurrency,
            humantime::format_duration(self.delay),
        )
    }
}

/// Build `http://<host>[:<port>]/v1/models/<model>:predict`.
///
/// `host` may carry its own `http://` or `https://` prefix.
pub fn predict_url(host: &str, port: Option<u16>, model: &str) -> Result<Url, ConfigError> {
    let (scheme, authority) = host.split_once("://").unwrap_or(("http", host));
    let authority = authority.trim_end_matches('/');

    let raw = match port {
        Some(port) => format!("{scheme}://{authority}:{port}/v1/models/{model}:predict"),
        None => format!("{scheme}://{authority}/v1/models/{model}:predict"),
    };

    let url = Url::parse(&raw)?;
    check_scheme(&url)?;
    Ok(url)
}

/// Convert a user-supplied number of seconds, rejecting negatives and non-finite values.
pub fn duration_from_secs(name: &'static str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value).map_err(|_| ConfigError::InvalidDuration { name, value })
}

fn saturating_mul_f64(duration: Duration, rhs: f64) -> Duration {
    Duration::try_from_secs_f64(duration.as_secs_f64() * rhs).unwrap_or(Duration::MAX)
}

fn check_scheme(url: &Url) -> Result<(), ConfigError> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}
