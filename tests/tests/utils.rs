use loadgen::core::{predict_url, RunConfig, DEFAULT_MODEL_NAME};
use mock_service::{MockConfig, MockHandle};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::error;
use tracing_subscriber::FmtSubscriber;

#[allow(unused)]
pub fn init() {
    static ONCE_LOCK: OnceLock<()> = OnceLock::new();

    ONCE_LOCK.get_or_init(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            error!("Panic occurred: {info:?}");
            default_panic(info);
        }));

        let _ = FmtSubscriber::builder()
            .with_env_filter("loadgen=debug,mock_service=debug")
            .with_test_writer()
            .try_init();
    });
}

/// Start a mock and point a quiet, undelayed run at it.
#[allow(unused)]
pub async fn mock_run(
    mock: MockConfig,
    total: u64,
    concurrency: usize,
) -> (MockHandle, RunConfig) {
    init();
    let handle = mock_service::spawn(mock).await.unwrap();
    let config = config_for(handle.port(), total, concurrency);
    (handle, config)
}

#[allow(unused)]
pub fn config_for(port: u16, total: u64, concurrency: usize) -> RunConfig {
    let url = predict_url("127.0.0.1", Some(port), DEFAULT_MODEL_NAME).unwrap();
    RunConfig::new(url, total, concurrency)
        .unwrap()
        .with_delay(Duration::ZERO)
        .with_timeout(Some(Duration::from_secs(5)))
        .with_progress(false)
}

/// A local port with nothing listening on it.
#[allow(unused)]
pub fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}
