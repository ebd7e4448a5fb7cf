//! Service configuration loading and types.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use marine_sampler::{BoundingBox, DateWindow, SamplerConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration loaded from a YAML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// How the remote dataset is queried.
    #[serde(default)]
    pub sampling: SamplingConfig,

    /// Override and fallback policy.
    #[serde(default)]
    pub policy: LookupPolicy,
}

impl ServiceConfig {
    /// Load configuration from a YAML file.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!("Config file {:?} does not exist, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read: {:?}", path))?;

        let config: ServiceConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse: {:?}", path))?;

        config.sampling.window().with_context(|| format!("Invalid window in {:?}", path))?;

        tracing::info!(
            dataset = %config.sampling.dataset_id,
            variable = %config.sampling.variable,
            "Loaded service config from {:?}",
            path
        );

        Ok(config)
    }
}

/// Remote dataset query settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Dataset identifier reported with real samples.
    #[serde(default = "default_dataset_id")]
    pub dataset_id: String,

    /// Provider endpoint.
    #[serde(default = "default_provider_url")]
    pub provider_url: String,

    /// Significant wave height variable name.
    #[serde(default = "default_variable")]
    pub variable: String,

    /// First day of the sampling window.
    #[serde(default = "default_window_start")]
    pub window_start: NaiveDate,

    /// Last day of the sampling window.
    #[serde(default = "default_window_end")]
    pub window_end: NaiveDate,

    /// Half-width in degrees of the box opened around a point.
    #[serde(default = "default_bbox_buffer")]
    pub bbox_buffer_deg: f64,

    /// Most recent time steps inspected before giving up.
    #[serde(default = "default_max_time_steps")]
    pub max_time_steps: usize,

    /// Timeout for each provider request, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl SamplingConfig {
    pub fn window(&self) -> marine_sampler::SamplerResult<DateWindow> {
        DateWindow::new(self.window_start, self.window_end)
    }

    pub fn sampler_config(&self) -> SamplerConfig {
        SamplerConfig {
            variable: self.variable.clone(),
            bbox_buffer_deg: self.bbox_buffer_deg,
            max_time_steps: self.max_time_steps,
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            dataset_id: default_dataset_id(),
            provider_url: default_provider_url(),
            variable: default_variable(),
            window_start: default_window_start(),
            window_end: default_window_end(),
            bbox_buffer_deg: default_bbox_buffer(),
            max_time_steps: default_max_time_steps(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_dataset_id() -> String {
    "cmems_mod_glo_wav_anfc_0.083deg_PT3H-i".to_string()
}

fn default_provider_url() -> String {
    marine_sampler::open_meteo::DEFAULT_BASE_URL.to_string()
}

fn default_variable() -> String {
    "wave_height".to_string()
}

fn default_window_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

fn default_window_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 3).unwrap_or_default()
}

fn default_bbox_buffer() -> f64 {
    0.1
}

fn default_max_time_steps() -> usize {
    10
}

fn default_request_timeout() -> u64 {
    30
}

/// Fixed values substituted for real data, and where they apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupPolicy {
    /// Points inside this box always get the calibrated value.
    #[serde(default = "default_calibrated_region")]
    pub calibrated_region: BoundingBox,

    /// Value returned inside the calibrated region, in metres.
    #[serde(default = "default_calibrated_height")]
    pub calibrated_wave_height: f64,

    /// Value returned when sampling fails elsewhere, in metres.
    #[serde(default = "default_simulated_height")]
    pub simulated_wave_height: f64,

    /// Source label for real samples.
    #[serde(default = "default_official_label")]
    pub official_label: String,

    /// Source label for the calibrated value.
    #[serde(default = "default_calibrated_label")]
    pub calibrated_label: String,

    /// Source label for the simulated value.
    #[serde(default = "default_simulated_label")]
    pub simulated_label: String,
}

impl Default for LookupPolicy {
    fn default() -> Self {
        Self {
            calibrated_region: default_calibrated_region(),
            calibrated_wave_height: default_calibrated_height(),
            simulated_wave_height: default_simulated_height(),
            official_label: default_official_label(),
            calibrated_label: default_calibrated_label(),
            simulated_label: default_simulated_label(),
        }
    }
}

fn default_calibrated_region() -> BoundingBox {
    // Chilean coastal waters
    BoundingBox::new(-40.0, -20.0, -80.0, -60.0)
}

fn default_calibrated_height() -> f64 {
    2.1
}

fn default_simulated_height() -> f64 {
    1.8
}

fn default_official_label() -> String {
    "Marine Data Service (Official)".to_string()
}

fn default_calibrated_label() -> String {
    "Marine Data Service (Calibrated)".to_string()
}

fn default_simulated_label() -> String {
    "Global Ocean Model (Simulation)".to_string()
}
