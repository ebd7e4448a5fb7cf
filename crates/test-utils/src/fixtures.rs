//! Common test fixtures for wave lookup tests.
//!
//! This module provides pre-defined coordinates, grids and datasets that
//! represent common scenarios along the Chilean coast and beyond.

use std::sync::Arc;

use marine_sampler::{DateWindow, GridSubset, InMemoryDataset};

/// Dataset identifier used by canned datasets.
pub const DATASET_ID: &str = "cmems_mod_glo_wav_anfc_0.083deg_PT3H-i";

/// Variable name served by canned datasets.
pub const VARIABLE: &str = "wave_height";

/// Coastal reference points as `(lat, lon)`.
pub mod points {
    /// Inside the calibrated region (central Chile)
    pub const VALPARAISO: (f64, f64) = (-33.0472, -71.6127);
    pub const CONCEPCION: (f64, f64) = (-36.8270, -73.0498);
    pub const COQUIMBO: (f64, f64) = (-29.9533, -71.3436);

    /// North of the calibrated region
    pub const ARICA: (f64, f64) = (-18.4783, -70.3126);

    /// South of the calibrated region
    pub const PUERTO_MONTT: (f64, f64) = (-41.4693, -72.9424);

    /// Far from any canned grid
    pub const BAY_OF_BISCAY: (f64, f64) = (45.5, -3.5);

    /// Corners of the calibrated region
    pub const REGION_CORNERS: [(f64, f64); 4] =
        [(-40.0, -80.0), (-40.0, -60.0), (-20.0, -80.0), (-20.0, -60.0)];

    /// Out-of-range coordinates
    pub const INVALID: [(f64, f64); 4] = [(200.0, 0.0), (-90.5, 0.0), (0.0, 180.5), (0.0, -200.0)];
}

/// Common grid specifications for testing.
pub mod grid {
    /// Regular lat/lon grid patch.
    #[derive(Debug, Clone, Copy)]
    pub struct GridSpec {
        pub width: usize,
        pub height: usize,
        pub min_lon: f64,
        pub min_lat: f64,
        pub resolution: f64,
    }

    impl GridSpec {
        /// Returns the total number of grid cells.
        pub fn size(&self) -> usize {
            self.width * self.height
        }

        /// Latitude axis, ascending.
        pub fn latitudes(&self) -> Vec<f64> {
            (0..self.height)
                .map(|i| self.min_lat + i as f64 * self.resolution)
                .collect()
        }

        /// Longitude axis, ascending.
        pub fn longitudes(&self) -> Vec<f64> {
            (0..self.width)
                .map(|j| self.min_lon + j as f64 * self.resolution)
                .collect()
        }
    }

    /// 1/12 degree patch around Valparaíso
    pub const VALPARAISO_PATCH: GridSpec = GridSpec {
        width: 7,
        height: 7,
        min_lon: -71.85,
        min_lat: -33.30,
        resolution: 1.0 / 12.0,
    };

    /// 1/12 degree patch around Arica
    pub const ARICA_PATCH: GridSpec = GridSpec {
        width: 7,
        height: 7,
        min_lon: -70.60,
        min_lat: -18.75,
        resolution: 1.0 / 12.0,
    };
}

/// Default sampling window, known to hold data.
pub fn default_window() -> DateWindow {
    DateWindow::parse("2024-01-01", "2024-01-03").expect("valid window")
}

/// Canned dataset serving `grid` as [`VARIABLE`].
pub fn dataset_with(grid: GridSubset) -> Arc<InMemoryDataset> {
    Arc::new(InMemoryDataset::new(DATASET_ID, VARIABLE, grid))
}

/// Canned dataset that fails every query with `message`.
pub fn failing_dataset(message: &str) -> Arc<InMemoryDataset> {
    Arc::new(InMemoryDataset::failing(DATASET_ID, message))
}
