use clap::{Parser, ValueEnum};
use loadgen_core::DEFAULT_MODEL_NAME;
use mock_service::{router, tps_measure_task, Behavior, MockConfig};
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    Ok,
    Alternate,
    Status,
    Short,
}

/// Stand-in prediction server for exercising the load generator.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "0.0.0.0:8080")]
    addr: SocketAddr,

    #[arg(long, default_value = DEFAULT_MODEL_NAME)]
    model: String,

    #[arg(long, value_enum, default_value_t = Mode::Ok)]
    mode: Mode,

    /// Status code returned in `status` mode
    #[arg(long, default_value_t = 500)]
    status: u16,

    #[arg(long, default_value_t = 10)]
    latency_ms: u64,

    #[arg(long)]
    jitter_ms: Option<u64>,

    #[arg(long)]
    max_tps: Option<NonZeroU32>,

    /// Required `Authorization` header value
    #[arg(long)]
    auth_header: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter("mock_service=debug,tower_http=info")
        .init();

    let args = Args::parse();

    let behavior = match args.mode {
        Mode::Ok => Behavior::AlwaysOk,
        Mode::Alternate => Behavior::Alternate,
        Mode::Status => Behavior::AlwaysStatus(args.status),
        Mode::Short => Behavior::ShortPredictions,
    };

    let mut config = MockConfig {
        model: args.model,
        ..MockConfig::default()
    }
    .behavior(behavior)
    .latency(Duration::from_millis(args.latency_ms));
    if let Some(jitter) = args.jitter_ms {
        config = config.jitter(Duration::from_millis(jitter));
    }
    if let Some(max_tps) = args.max_tps {
        config = config.max_tps(max_tps);
    }
    if let Some(header) = args.auth_header {
        config = config.required_auth(header);
    }

    let (app, hits) = router(config);
    tokio::spawn(tps_measure_task(hits));

    let listener = TcpListener::bind(args.addr).await?;
    info!("Mock prediction service listening on {}", args.addr);
    axum::serve(listener, app).await?;

    Ok(())
}
