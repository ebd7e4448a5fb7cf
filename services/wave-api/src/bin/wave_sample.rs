//! Sample the wave height at one point straight from the provider.
//!
//! Bypasses the calibrated override and the simulation fallback; prints the
//! response envelope on success, or a failure payload and exits 1.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use serde_json::json;
use tracing_subscriber::{fmt, EnvFilter};

use marine_sampler::{Credentials, OpenMeteoMarine, PointSampler, SampleRequest};
use wave_api::config::ServiceConfig;
use wave_api::lookup::LookupOutcome;
use wave_api::responses::WaveDataResponse;

#[derive(Parser, Debug)]
#[command(name = "wave-sample")]
#[command(about = "Fetch the current wave height for a point from the marine data provider")]
struct Args {
    /// Latitude
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Longitude
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,

    /// Provider username
    #[arg(long)]
    username: Option<String>,

    /// Provider password
    #[arg(long)]
    password: Option<String>,

    /// Path to the YAML service config
    #[arg(short, long, default_value = "config/wave-api.yaml", env = "WAVE_API_CONFIG")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let args = Args::parse();
    let config = ServiceConfig::load(&args.config)?;
    let credentials = Credentials::resolve(args.username, args.password);

    let dataset = OpenMeteoMarine::new(config.sampling.dataset_id.clone(), credentials)
        .with_base_url(config.sampling.provider_url.clone());
    let sampler = PointSampler::new(Arc::new(dataset), config.sampling.sampler_config());
    let window = config.sampling.window()?;

    let result = match SampleRequest::new(args.lat, args.lon, window) {
        Ok(request) => sampler.sample(&request).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(result) => {
            tracing::info!(
                wave_height = result.wave_height,
                timestamp = %result.timestamp,
                "Retrieved wave data"
            );
            let outcome = LookupOutcome::Success {
                result,
                source: config.policy.official_label.clone(),
            };
            let envelope = WaveDataResponse::from_outcome(
                &outcome,
                args.lat,
                args.lon,
                &window.end.format("%Y-%m-%d").to_string(),
                &config.policy,
                Utc::now(),
            );
            println!("{}", serde_json::to_string_pretty(&envelope)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to retrieve wave data");
            let failure = json!({
                "success": false,
                "error": e.to_string(),
                "coordinates": {"latitude": args.lat, "longitude": args.lon},
                "timestamp": Utc::now().to_rfc3339(),
            });
            println!("{}", serde_json::to_string_pretty(&failure)?);
            Ok(ExitCode::FAILURE)
        }
    }
}
