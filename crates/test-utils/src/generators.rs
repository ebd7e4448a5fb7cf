//! Test data generators for synthetic wave-height grids.
//!
//! These generators create predictable, verifiable grids so tests can check
//! exactly which cell and time step a value was read from.

use chrono::{DateTime, Duration, TimeZone, Utc};
use marine_sampler::GridSubset;

use crate::fixtures::grid::GridSpec;

/// Hours between time steps of the reference dataset.
pub const STEP_HOURS: i64 = 3;

/// Creates `count` time steps, `STEP_HOURS` apart, starting 2024-01-01T00:00Z.
pub fn time_axis(count: usize) -> Vec<DateTime<Utc>> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (0..count)
        .map(|i| start + Duration::hours(STEP_HOURS * i as i64))
        .collect()
}

/// Encodes a cell's position in its value: `1.0 + t + lat_idx / 10 + lon_idx / 100`.
///
/// Every value is a plausible wave height in metres and identifies the cell.
pub fn encoded_height(time_idx: usize, lat_idx: usize, lon_idx: usize) -> f64 {
    1.0 + time_idx as f64 + lat_idx as f64 / 10.0 + lon_idx as f64 / 100.0
}

/// Creates a fully populated grid over `spec` with [`encoded_height`] values.
pub fn create_wave_grid(spec: &GridSpec, steps: usize) -> GridSubset {
    let latitudes = spec.latitudes();
    let longitudes = spec.longitudes();

    let mut values = Vec::with_capacity(steps * latitudes.len() * longitudes.len());
    for t in 0..steps {
        for i in 0..latitudes.len() {
            for j in 0..longitudes.len() {
                values.push(Some(encoded_height(t, i, j)));
            }
        }
    }

    GridSubset::new(time_axis(steps), latitudes, longitudes, values)
        .expect("generated grid has consistent shape")
}

/// Creates a single-cell series where the newest `missing_tail` steps are absent.
///
/// Present steps hold `height`.
pub fn create_series_with_gaps(
    lat: f64,
    lon: f64,
    steps: usize,
    missing_tail: usize,
    height: f64,
) -> GridSubset {
    let values = (0..steps)
        .map(|i| if i + missing_tail >= steps { None } else { Some(height) })
        .collect();

    GridSubset::single_cell(lat, lon, time_axis(steps), values)
        .expect("generated series has consistent shape")
}
