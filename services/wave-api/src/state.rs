//! Application state for the wave API.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

use marine_sampler::{Credentials, MarineDataset, OpenMeteoMarine, PointSampler};

use crate::config::ServiceConfig;
use crate::lookup::WaveLookupService;

/// Shared application state, read-only after construction.
pub struct AppState {
    /// Lookup service owning the provider client.
    pub service: WaveLookupService,

    /// Configuration the service was built from.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create state backed by the HTTP provider client.
    pub fn new(config: ServiceConfig, credentials: Credentials) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.sampling.request_timeout_secs))
            .build()
            .context("Failed to build provider HTTP client")?;

        let dataset = OpenMeteoMarine::new(config.sampling.dataset_id.clone(), credentials)
            .with_base_url(config.sampling.provider_url.clone())
            .with_client(client);

        Self::with_dataset(config, Arc::new(dataset))
    }

    /// Create state backed by any dataset.
    pub fn with_dataset(config: ServiceConfig, dataset: Arc<dyn MarineDataset>) -> Result<Self> {
        let window = config.sampling.window()?;
        let sampler = PointSampler::new(dataset, config.sampling.sampler_config());
        let service = WaveLookupService::new(sampler, window, config.policy.clone());

        Ok(Self { service, config })
    }

    /// Date descriptor reported as `requested_date` for real samples.
    pub fn requested_date(&self) -> String {
        self.service.window().end.format("%Y-%m-%d").to_string()
    }

    /// Probe the provider. Failure is logged, never fatal.
    pub async fn authenticate(&self) -> bool {
        match self.service.sampler().dataset().authenticate().await {
            Ok(()) => {
                tracing::info!("Marine data provider authentication successful");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Marine data provider authentication failed, lookups will fall back to simulation on error");
                false
            }
        }
    }
}
