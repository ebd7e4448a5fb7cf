//! Nearest-available-sample lookup.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::bbox::BoundingBox;
use crate::dataset::{MarineDataset, SubsetRequest};
use crate::error::{SamplerError, SamplerResult};
use crate::types::{GridPoint, SampleRequest, SampleResult};

/// Tuning for [`PointSampler`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Significant wave height variable served by the dataset.
    pub variable: String,
    /// Half-width in degrees of the box opened around the point.
    pub bbox_buffer_deg: f64,
    /// How many of the most recent time steps to inspect before giving up.
    pub max_time_steps: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            variable: "wave_height".to_string(),
            bbox_buffer_deg: 0.1,
            max_time_steps: 10,
        }
    }
}

/// Reads the most recent present value at the grid cell nearest a point.
///
/// Every call queries the dataset; nothing is cached between calls.
pub struct PointSampler {
    dataset: Arc<dyn MarineDataset>,
    config: SamplerConfig,
}

impl PointSampler {
    pub fn new(dataset: Arc<dyn MarineDataset>, config: SamplerConfig) -> Self {
        Self { dataset, config }
    }

    pub fn dataset(&self) -> &Arc<dyn MarineDataset> {
        &self.dataset
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Sample the wave height nearest to the requested point.
    ///
    /// Walks back from the latest time step, inspecting at most
    /// `max_time_steps` steps, and returns the first present value together
    /// with the grid cell and time step it was read from.
    pub async fn sample(&self, request: &SampleRequest) -> SamplerResult<SampleResult> {
        let (lat, lon) = (request.latitude(), request.longitude());

        let subset_request = SubsetRequest::new(
            self.config.variable.clone(),
            BoundingBox::around(lat, lon, self.config.bbox_buffer_deg),
            request.window(),
        );

        info!(
            dataset = %self.dataset.dataset_id(),
            lat, lon,
            start = %request.window().start,
            end = %request.window().end,
            "Sampling wave height"
        );

        let subset = self.dataset.open_subset(&subset_request).await?;

        if subset.times().is_empty() {
            return Err(SamplerError::NoTimeSteps);
        }

        let (lat_idx, lon_idx) = subset
            .nearest_index(lat, lon)
            .ok_or(SamplerError::EmptyGrid { lat, lon })?;

        let actual = GridPoint::new(subset.latitudes()[lat_idx], subset.longitudes()[lon_idx]);

        let steps = subset.times().len().min(self.config.max_time_steps);
        for (back, time_idx) in (0..subset.times().len()).rev().take(steps).enumerate() {
            match subset.value_at(time_idx, lat_idx, lon_idx) {
                Some(wave_height) => {
                    let timestamp = subset.times()[time_idx];
                    debug!(steps_back = back, %timestamp, wave_height, "Found wave sample");
                    return Ok(SampleResult {
                        requested: request.point(),
                        actual,
                        wave_height,
                        timestamp,
                        dataset_id: self.dataset.dataset_id().to_string(),
                    });
                }
                None => debug!(steps_back = back, "Missing sample, stepping back"),
            }
        }

        Err(SamplerError::Exhausted { steps })
    }
}
