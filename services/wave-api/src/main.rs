//! Wave API Server
//!
//! Serves current significant wave height estimates for a latitude/longitude.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use marine_sampler::Credentials;
use wave_api::config::ServiceConfig;
use wave_api::state::AppState;

/// Wave API Server
#[derive(Parser, Debug)]
#[command(name = "wave-api")]
#[command(about = "HTTP server for significant wave height lookups")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "127.0.0.1:5000", env = "WAVE_API_LISTEN_ADDR")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Number of worker threads
    #[arg(long, env = "WAVE_API_WORKER_THREADS")]
    worker_threads: Option<usize>,

    /// Path to the YAML service config
    #[arg(short, long, default_value = "config/wave-api.yaml", env = "WAVE_API_CONFIG")]
    config: String,

    /// Provider username (falls back to MARINE_DATA_USERNAME, then stored credentials)
    #[arg(long)]
    username: Option<String>,

    /// Provider password (falls back to MARINE_DATA_PASSWORD, then stored credentials)
    #[arg(long)]
    password: Option<String>,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Build runtime with configured threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(run_server(args))
}

async fn run_server(args: Args) -> Result<()> {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    info!("Starting wave API server");

    let config = ServiceConfig::load(&args.config)?;
    let credentials = Credentials::resolve(args.username, args.password);
    if credentials.is_stored() {
        info!("Using locally stored provider credentials");
    }

    let state = Arc::new(AppState::new(config, credentials)?);

    // Routes are registered whatever the outcome
    state.authenticate().await;

    let app = wave_api::build_router(state, Some(prometheus_handle));

    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", args.listen))?;

    info!("Endpoints: GET /health, GET /wave-data?lat=<lat>&lon=<lon>, POST /wave-data");
    info!("Wave API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server failed")?;

    Ok(())
}
