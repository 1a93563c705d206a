mod config;
mod constants;
mod payload;
mod stats;

pub use config::*;
pub use constants::*;
pub use payload::*;
pub use stats::*;
pub use url::Url;
