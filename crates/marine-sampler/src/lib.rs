//! Nearest-available-sample lookup for gridded marine datasets.
//!
//! This crate provides the data-access half of the wave lookup service:
//!
//! - [`MarineDataset`]: the provider seam, returning a [`GridSubset`] for a
//!   bounding box and date window
//! - [`OpenMeteoMarine`]: an HTTP JSON backend for that seam
//! - [`InMemoryDataset`]: a fixed subset, used for tests and offline runs
//! - [`PointSampler`]: resolves the nearest grid cell and walks backward
//!   through recent time steps until it finds a present value
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use marine_sampler::{Credentials, DateWindow, OpenMeteoMarine, PointSampler, SampleRequest};
//!
//! let dataset = OpenMeteoMarine::new("cmems_mod_glo_wav_anfc_0.083deg_PT3H-i", Credentials::Stored);
//! let sampler = PointSampler::new(Arc::new(dataset), Default::default());
//! let window = DateWindow::parse("2024-01-01", "2024-01-03")?;
//! let result = sampler.sample(&SampleRequest::new(-36.8, -73.0, window)?).await?;
//! println!("{:.2} m at {}", result.wave_height, result.timestamp);
//! ```

pub mod bbox;
pub mod credentials;
pub mod dataset;
pub mod error;
pub mod memory;
pub mod open_meteo;
pub mod sampler;
pub mod types;

pub use bbox::BoundingBox;
pub use credentials::Credentials;
pub use dataset::{GridSubset, MarineDataset, SubsetRequest};
pub use error::{SamplerError, SamplerResult};
pub use memory::InMemoryDataset;
pub use open_meteo::OpenMeteoMarine;
pub use sampler::{PointSampler, SamplerConfig};
pub use types::{DateWindow, GridPoint, SampleRequest, SampleResult};
