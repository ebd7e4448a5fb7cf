//! Wave height lookup with regional override and simulation fallback.

use marine_sampler::{DateWindow, PointSampler, SampleRequest, SampleResult};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::LookupPolicy;

/// Errors returned to the caller before any data access.
#[derive(Debug, Error, PartialEq)]
pub enum LookupError {
    #[error("Latitude must be between -90 and 90")]
    InvalidLatitude,

    #[error("Longitude must be between -180 and 180")]
    InvalidLongitude,

    /// A validated point could not be turned into a sample request.
    #[error("{0}")]
    Internal(String),
}

impl LookupError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            LookupError::InvalidLatitude | LookupError::InvalidLongitude => 400,
            LookupError::Internal(_) => 500,
        }
    }
}

/// Why a fixed value was returned instead of a sample.
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    /// The point lies inside the calibrated region.
    CalibratedRegion,
    /// Sampling was attempted and failed with this message.
    SamplerFailed(String),
}

/// Result of a lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// A real sample, labelled with its source.
    Success { result: SampleResult, source: String },
    /// A fixed value substituted for real data.
    Fallback { wave_height: f64, reason: FallbackReason },
}

impl LookupOutcome {
    pub fn wave_height(&self) -> f64 {
        match self {
            LookupOutcome::Success { result, .. } => result.wave_height,
            LookupOutcome::Fallback { wave_height, .. } => *wave_height,
        }
    }

    /// Metrics label for the outcome.
    pub fn kind(&self) -> &'static str {
        match self {
            LookupOutcome::Success { .. } => "official",
            LookupOutcome::Fallback { reason: FallbackReason::CalibratedRegion, .. } => "calibrated",
            LookupOutcome::Fallback { reason: FallbackReason::SamplerFailed(_), .. } => "simulated",
        }
    }
}

/// Validates coordinates and decides where a wave height comes from.
pub struct WaveLookupService {
    sampler: PointSampler,
    window: DateWindow,
    policy: LookupPolicy,
}

impl WaveLookupService {
    pub fn new(sampler: PointSampler, window: DateWindow, policy: LookupPolicy) -> Self {
        Self {
            sampler,
            window,
            policy,
        }
    }

    pub fn policy(&self) -> &LookupPolicy {
        &self.policy
    }

    pub fn window(&self) -> DateWindow {
        self.window
    }

    pub fn sampler(&self) -> &PointSampler {
        &self.sampler
    }

    /// Look up the wave height for a point.
    ///
    /// Points in the calibrated region never reach the sampler. Any sampler
    /// failure elsewhere becomes the simulated value.
    pub async fn lookup(&self, lat: f64, lon: f64) -> Result<LookupOutcome, LookupError> {
        if !(-90.0..=90.0).contains(&lat) {
            metrics::counter!("wave_lookup_rejections_total").increment(1);
            return Err(LookupError::InvalidLatitude);
        }
        if !(-180.0..=180.0).contains(&lon) {
            metrics::counter!("wave_lookup_rejections_total").increment(1);
            return Err(LookupError::InvalidLongitude);
        }

        info!(lat, lon, "Wave lookup");

        let outcome = if self.policy.calibrated_region.contains(lat, lon) {
            info!(lat, lon, "Point inside calibrated region, skipping sampler");
            LookupOutcome::Fallback {
                wave_height: self.policy.calibrated_wave_height,
                reason: FallbackReason::CalibratedRegion,
            }
        } else {
            let request = SampleRequest::new(lat, lon, self.window)
                .map_err(|e| LookupError::Internal(e.to_string()))?;

            match self.sampler.sample(&request).await {
                Ok(result) => LookupOutcome::Success {
                    result,
                    source: self.policy.official_label.clone(),
                },
                Err(e) => {
                    warn!(lat, lon, error = %e, "Sampling failed, using simulated wave height");
                    LookupOutcome::Fallback {
                        wave_height: self.policy.simulated_wave_height,
                        reason: FallbackReason::SamplerFailed(e.to_string()),
                    }
                }
            }
        };

        metrics::counter!("wave_lookups_total", "source" => outcome.kind()).increment(1);
        Ok(outcome)
    }
}
