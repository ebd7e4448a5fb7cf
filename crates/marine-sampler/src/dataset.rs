//! Dataset access abstraction.
//!
//! A [`MarineDataset`] answers a [`SubsetRequest`] (variable, bounding box,
//! date window) with a [`GridSubset`]: the time, latitude and longitude axes
//! plus a dense `[time][lat][lon]` array of optional values. Missing samples
//! are `None`; backends normalise fill values and NaN at ingestion.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::bbox::BoundingBox;
use crate::error::{SamplerError, SamplerResult};
use crate::types::DateWindow;

/// Query describing the slice of a dataset to open.
#[derive(Debug, Clone, PartialEq)]
pub struct SubsetRequest {
    /// Variable name (e.g., "VHM0", "wave_height")
    pub variable: String,
    /// Spatial extent to open
    pub bbox: BoundingBox,
    /// Date range to open
    pub window: DateWindow,
}

impl SubsetRequest {
    pub fn new(variable: impl Into<String>, bbox: BoundingBox, window: DateWindow) -> Self {
        Self {
            variable: variable.into(),
            bbox,
            window,
        }
    }
}

/// A gridded slice of one variable.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSubset {
    times: Vec<DateTime<Utc>>,
    latitudes: Vec<f64>,
    longitudes: Vec<f64>,
    values: Vec<Option<f64>>,
}

impl GridSubset {
    /// Build a subset, checking that `values` matches the axis lengths.
    pub fn new(
        times: Vec<DateTime<Utc>>,
        latitudes: Vec<f64>,
        longitudes: Vec<f64>,
        values: Vec<Option<f64>>,
    ) -> SamplerResult<Self> {
        let expected = times.len() * latitudes.len() * longitudes.len();
        if values.len() != expected {
            return Err(SamplerError::InvalidFormat(format!(
                "expected {} values for {}x{}x{} grid, got {}",
                expected,
                times.len(),
                latitudes.len(),
                longitudes.len(),
                values.len()
            )));
        }

        // NaN is never a sample
        let values = values
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();

        Ok(Self {
            times,
            latitudes,
            longitudes,
            values,
        })
    }

    /// Single-cell subset holding a time series.
    pub fn single_cell(
        latitude: f64,
        longitude: f64,
        times: Vec<DateTime<Utc>>,
        values: Vec<Option<f64>>,
    ) -> SamplerResult<Self> {
        Self::new(times, vec![latitude], vec![longitude], values)
    }

    pub fn times(&self) -> &[DateTime<Utc>] {
        &self.times
    }

    pub fn latitudes(&self) -> &[f64] {
        &self.latitudes
    }

    pub fn longitudes(&self) -> &[f64] {
        &self.longitudes
    }

    pub fn has_cells(&self) -> bool {
        !self.latitudes.is_empty() && !self.longitudes.is_empty()
    }

    /// Value at `(time, lat, lon)` indices, `None` when missing or out of bounds.
    pub fn value_at(&self, time_idx: usize, lat_idx: usize, lon_idx: usize) -> Option<f64> {
        if lat_idx >= self.latitudes.len() || lon_idx >= self.longitudes.len() {
            return None;
        }
        let idx = (time_idx * self.latitudes.len() + lat_idx) * self.longitudes.len() + lon_idx;
        self.values.get(idx).copied().flatten()
    }

    /// Nearest `(lat_idx, lon_idx)` to a point, resolved on each axis independently.
    pub fn nearest_index(&self, lat: f64, lon: f64) -> Option<(usize, usize)> {
        Some((nearest(&self.latitudes, lat)?, nearest(&self.longitudes, lon)?))
    }

    /// Keep only the cells inside `bbox` and the time steps inside `window`.
    pub fn restrict(&self, bbox: &BoundingBox, window: &DateWindow) -> GridSubset {
        let time_idx: Vec<usize> = (0..self.times.len())
            .filter(|&t| window.contains(&self.times[t]))
            .collect();
        let lat_idx: Vec<usize> = (0..self.latitudes.len())
            .filter(|&i| bbox.contains_lat(self.latitudes[i]))
            .collect();
        let lon_idx: Vec<usize> = (0..self.longitudes.len())
            .filter(|&j| bbox.contains_lon(self.longitudes[j]))
            .collect();

        let mut values = Vec::with_capacity(time_idx.len() * lat_idx.len() * lon_idx.len());
        for &t in &time_idx {
            for &i in &lat_idx {
                for &j in &lon_idx {
                    values.push(self.value_at(t, i, j));
                }
            }
        }

        GridSubset {
            times: time_idx.iter().map(|&t| self.times[t]).collect(),
            latitudes: lat_idx.iter().map(|&i| self.latitudes[i]).collect(),
            longitudes: lon_idx.iter().map(|&j| self.longitudes[j]).collect(),
            values,
        }
    }
}

/// Index of the axis value closest to `target`; ties keep the lower index.
fn nearest(axis: &[f64], target: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, value) in axis.iter().enumerate() {
        let dist = (value - target).abs();
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((idx, dist)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// A remote (or local) gridded marine dataset.
#[async_trait]
pub trait MarineDataset: Send + Sync {
    /// Identifier of the dataset served by this backend.
    fn dataset_id(&self) -> &str;

    /// Check that the backend is reachable with the configured credentials.
    async fn authenticate(&self) -> SamplerResult<()>;

    /// Open a subset of one variable.
    async fn open_subset(&self, request: &SubsetRequest) -> SamplerResult<GridSubset>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn hours(n: u32) -> Vec<DateTime<Utc>> {
        (0..n)
            .map(|h| Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::hours(3 * h as i64))
            .collect()
    }

    #[test]
    fn test_shape_mismatch_is_rejected() {
        let result = GridSubset::new(hours(2), vec![0.0, 1.0], vec![0.0], vec![Some(1.0); 3]);
        assert!(matches!(result, Err(SamplerError::InvalidFormat(_))));
    }

    #[test]
    fn test_nan_becomes_missing() {
        let subset = GridSubset::single_cell(0.0, 0.0, hours(2), vec![Some(f64::NAN), Some(1.5)]).unwrap();
        assert_eq!(subset.value_at(0, 0, 0), None);
        assert_eq!(subset.value_at(1, 0, 0), Some(1.5));
    }

    #[test]
    fn test_value_layout_is_time_lat_lon() {
        // 2 times x 2 lats x 3 lons; value = t*100 + i*10 + j
        let mut values = Vec::new();
        for t in 0..2 {
            for i in 0..2 {
                for j in 0..3 {
                    values.push(Some((t * 100 + i * 10 + j) as f64));
                }
            }
        }
        let subset = GridSubset::new(hours(2), vec![-33.0, -32.9], vec![-71.7, -71.6, -71.5], values).unwrap();

        assert_eq!(subset.value_at(0, 0, 0), Some(0.0));
        assert_eq!(subset.value_at(0, 1, 2), Some(12.0));
        assert_eq!(subset.value_at(1, 1, 1), Some(111.0));
        assert_eq!(subset.value_at(2, 0, 0), None);
        assert_eq!(subset.value_at(0, 2, 0), None);
    }

    #[test]
    fn test_nearest_index_per_axis() {
        let subset = GridSubset::new(
            hours(1),
            vec![-33.083, -33.0, -32.917],
            vec![-71.667, -71.583, -71.5],
            vec![Some(1.0); 9],
        )
        .unwrap();

        assert_eq!(subset.nearest_index(-33.0472, -71.6127), Some((1, 1)));
        assert_eq!(subset.nearest_index(-40.0, -60.0), Some((0, 2)));
    }

    #[test]
    fn test_nearest_tie_keeps_lower_index() {
        assert_eq!(nearest(&[0.0, 1.0], 0.5), Some(0));
        assert_eq!(nearest(&[], 0.5), None);
    }

    #[test]
    fn test_restrict_to_bbox_and_window() {
        let times = vec![
            Utc.with_ymd_and_hms(2023, 12, 31, 21, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
        ];
        let mut values = Vec::new();
        for t in 0..3 {
            for i in 0..3 {
                for j in 0..3 {
                    values.push(Some((t * 100 + i * 10 + j) as f64));
                }
            }
        }
        let subset = GridSubset::new(times, vec![-34.0, -33.0, -32.0], vec![-72.0, -71.0, -70.0], values).unwrap();

        let bbox = BoundingBox::around(-33.0, -71.0, 0.1);
        let window = DateWindow::parse("2024-01-01", "2024-01-01").unwrap();
        let restricted = subset.restrict(&bbox, &window);

        assert_eq!(restricted.times().len(), 1);
        assert_eq!(restricted.latitudes(), &[-33.0]);
        assert_eq!(restricted.longitudes(), &[-71.0]);
        assert_eq!(restricted.value_at(0, 0, 0), Some(111.0));
    }
}
