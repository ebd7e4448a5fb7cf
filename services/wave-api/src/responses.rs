//! JSON response bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::LookupPolicy;
use crate::lookup::{FallbackReason, LookupOutcome};

/// Example request shown in error bodies.
pub const USAGE_EXAMPLE: &str = "/wave-data?lat=-33.0472&lon=-71.6127";

/// Requested vs. actual coordinates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub requested_latitude: f64,
    pub requested_longitude: f64,
    pub actual_latitude: f64,
    pub actual_longitude: f64,
}

/// When the returned value is from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DateInfo {
    pub requested_date: String,
    pub actual_data_date: String,
    pub actual_data_time: String,
}

/// Uniform envelope for every lookup outcome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaveDataResponse {
    pub success: bool,
    pub wave_height: f64,
    pub coordinates: Coordinates,
    pub date_info: DateInfo,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,
    pub units: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub timestamp: String,
}

impl WaveDataResponse {
    /// Build the envelope for an outcome.
    ///
    /// `requested_date` describes the sampling window; `now` stamps the
    /// response and dates the fallback values.
    pub fn from_outcome(
        outcome: &LookupOutcome,
        lat: f64,
        lon: f64,
        requested_date: &str,
        policy: &LookupPolicy,
        now: DateTime<Utc>,
    ) -> Self {
        match outcome {
            LookupOutcome::Success { result, source } => Self {
                success: true,
                wave_height: result.wave_height,
                coordinates: Coordinates {
                    requested_latitude: result.requested.latitude,
                    requested_longitude: result.requested.longitude,
                    actual_latitude: result.actual.latitude,
                    actual_longitude: result.actual.longitude,
                },
                date_info: DateInfo {
                    requested_date: requested_date.to_string(),
                    actual_data_date: result.timestamp.format("%Y-%m-%d").to_string(),
                    actual_data_time: result.timestamp.format("%Y-%m-%dT%H:%M:%S").to_string(),
                },
                source: source.clone(),
                dataset: Some(result.dataset_id.clone()),
                units: "meters".to_string(),
                note: None,
                timestamp: now.to_rfc3339(),
            },
            LookupOutcome::Fallback { wave_height, reason } => {
                let (source, note) = match reason {
                    FallbackReason::CalibratedRegion => (
                        policy.calibrated_label.clone(),
                        "Calibrated regional value, no data was read for this request".to_string(),
                    ),
                    FallbackReason::SamplerFailed(msg) => (
                        policy.simulated_label.clone(),
                        format!("Simulated value, data access failed: {}", msg),
                    ),
                };

                Self {
                    success: true,
                    wave_height: *wave_height,
                    coordinates: Coordinates {
                        requested_latitude: lat,
                        requested_longitude: lon,
                        actual_latitude: lat,
                        actual_longitude: lon,
                    },
                    date_info: DateInfo {
                        requested_date: now.format("%Y-%m-%d").to_string(),
                        actual_data_date: now.format("%Y-%m-%d").to_string(),
                        actual_data_time: now.format("%Y-%m-%dT%H:%M:%S").to_string(),
                    },
                    source,
                    dataset: None,
                    units: "meters".to_string(),
                    note: Some(note),
                    timestamp: now.to_rfc3339(),
                }
            }
        }
    }
}

/// Error body: `{error, example?, details?}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            example: None,
            details: None,
        }
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Health check body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}
