use std::time::Duration;

pub const DEFAULT_MODEL_NAME: &str = "sentiment-classifier";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_TOTAL_REQUESTS: u64 = 500;
pub const DEFAULT_CONCURRENCY: usize = 10;
pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_AUTH_USERNAME: &str = "admin";
pub const DEFAULT_AUTH_PASSWORD: &str = "kserve-demo";

/// Bounds (inclusive) on the number of instances in a single predict request.
pub const MIN_INSTANCES: usize = 1;
pub const MAX_INSTANCES: usize = 5;

/// How often the progress reporter polls the aggregate statistics.
pub const PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

/// The progress reporter gives up after this multiple of the expected run duration.
pub const PROGRESS_DEADLINE_FACTOR: f64 = 2.0;

/// Emit an `info` line every N successful requests.
pub const SUCCESS_LOG_EVERY: u64 = 20;
