//! Request and result types for point sampling.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{SamplerError, SamplerResult};

/// Closed range of calendar dates to query, `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> SamplerResult<Self> {
        if start > end {
            return Err(SamplerError::InvalidWindow(format!(
                "start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse a window from two `YYYY-MM-DD` strings.
    pub fn parse(start: &str, end: &str) -> SamplerResult<Self> {
        let parse = |s: &str| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|e| SamplerError::InvalidWindow(format!("{}: {}", s, e)))
        };
        Self::new(parse(start)?, parse(end)?)
    }

    /// Check whether a timestamp falls on a day inside the window.
    pub fn contains(&self, time: &DateTime<Utc>) -> bool {
        let day = time.date_naive();
        day >= self.start && day <= self.end
    }
}

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GridPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A validated point query over a date window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRequest {
    point: GridPoint,
    window: DateWindow,
}

impl SampleRequest {
    /// Create a request, rejecting coordinates outside the geographic range.
    pub fn new(latitude: f64, longitude: f64, window: DateWindow) -> SamplerResult<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(SamplerError::InvalidCoordinate(format!(
                "latitude {} outside [-90, 90]",
                latitude
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(SamplerError::InvalidCoordinate(format!(
                "longitude {} outside [-180, 180]",
                longitude
            )));
        }
        Ok(Self {
            point: GridPoint::new(latitude, longitude),
            window,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.point.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.point.longitude
    }

    pub fn point(&self) -> GridPoint {
        self.point
    }

    pub fn window(&self) -> DateWindow {
        self.window
    }
}

/// A wave height read from a dataset, with the cell and time it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleResult {
    /// Coordinates that were asked for.
    pub requested: GridPoint,
    /// Nearest grid cell the value was read from.
    pub actual: GridPoint,
    /// Significant wave height in metres.
    pub wave_height: f64,
    /// Time step the value belongs to.
    pub timestamp: DateTime<Utc>,
    /// Dataset the value was read from.
    pub dataset_id: String,
}
