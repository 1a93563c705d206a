mod cli;

use clap::Parser;
use cli::Cli;
use loadgen::core::RunSummary;
use loadgen::LoadTest;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const DEFAULT_LOG_FILTER: &str = "loadgen=info,loadgen_cli=info";

#[tokio::main]
async fn main() -> ExitCode {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    FmtSubscriber::builder().with_env_filter(filter).init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(summary) => {
            loadgen::report(&summary);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("Load test aborted: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<RunSummary> {
    let config = cli.run_config()?;
    let corpus = cli.sample_corpus()?;

    if let Some(addr) = cli.prometheus {
        PrometheusBuilder::new().with_http_listener(addr).install()?;
        info!("Serving Prometheus metrics on {addr}");
    }

    println!("Starting load test against {}", config.url);
    println!(
        "Sending {} requests with {} concurrent workers",
        config.total_requests, config.concurrency
    );
    println!("Delay between requests: {}s", config.delay.as_secs_f64());

    let mut load_test = LoadTest::new(config);
    if let Some(corpus) = corpus {
        load_test = load_test.corpus(corpus);
    }

    Ok(load_test.await?)
}
