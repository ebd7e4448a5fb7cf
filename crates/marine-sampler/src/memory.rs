//! In-memory dataset backend.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::dataset::{GridSubset, MarineDataset, SubsetRequest};
use crate::error::{SamplerError, SamplerResult};

#[derive(Debug)]
enum Contents {
    Grid(GridSubset),
    Failure(String),
}

/// Dataset serving a fixed grid, or failing every query with a fixed message.
///
/// Each call to [`MarineDataset::open_subset`] is counted so callers can check
/// whether the provider was consulted at all.
#[derive(Debug)]
pub struct InMemoryDataset {
    dataset_id: String,
    variable: String,
    contents: Contents,
    calls: AtomicUsize,
}

impl InMemoryDataset {
    /// Serve `grid` as `variable`.
    pub fn new(dataset_id: impl Into<String>, variable: impl Into<String>, grid: GridSubset) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            variable: variable.into(),
            contents: Contents::Grid(grid),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail every query with `message`.
    pub fn failing(dataset_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            variable: String::new(),
            contents: Contents::Failure(message.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of subset queries served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarineDataset for InMemoryDataset {
    fn dataset_id(&self) -> &str {
        &self.dataset_id
    }

    async fn authenticate(&self) -> SamplerResult<()> {
        match &self.contents {
            Contents::Grid(_) => Ok(()),
            Contents::Failure(message) => Err(SamplerError::Provider(message.clone())),
        }
    }

    async fn open_subset(&self, request: &SubsetRequest) -> SamplerResult<GridSubset> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.contents {
            Contents::Failure(message) => Err(SamplerError::Provider(message.clone())),
            Contents::Grid(_) if request.variable != self.variable => {
                Err(SamplerError::UnknownVariable(request.variable.clone()))
            }
            Contents::Grid(grid) => Ok(grid.restrict(&request.bbox, &request.window)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbox::BoundingBox;
    use crate::types::DateWindow;
    use chrono::{TimeZone, Utc};

    fn grid() -> GridSubset {
        GridSubset::single_cell(
            -33.0,
            -71.583,
            vec![Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()],
            vec![Some(2.4)],
        )
        .unwrap()
    }

    fn request(variable: &str) -> SubsetRequest {
        SubsetRequest::new(
            variable,
            BoundingBox::around(-33.0, -71.6, 0.1),
            DateWindow::parse("2024-01-01", "2024-01-03").unwrap(),
        )
    }

    #[tokio::test]
    async fn test_serves_grid_and_counts_calls() {
        let dataset = InMemoryDataset::new("test", "VHM0", grid());
        assert_eq!(dataset.calls(), 0);

        let subset = dataset.open_subset(&request("VHM0")).await.unwrap();
        assert_eq!(subset.value_at(0, 0, 0), Some(2.4));
        assert_eq!(dataset.calls(), 1);
    }

    #[tokio::test]
    async fn test_unknown_variable() {
        let dataset = InMemoryDataset::new("test", "VHM0", grid());
        let err = dataset.open_subset(&request("VTPK")).await.unwrap_err();
        assert!(matches!(err, SamplerError::UnknownVariable(ref v) if v == "VTPK"));
    }

    #[tokio::test]
    async fn test_failing_dataset() {
        let dataset = InMemoryDataset::failing("test", "connection refused");
        let err = dataset.open_subset(&request("VHM0")).await.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
        assert!(dataset.authenticate().await.is_err());
        assert_eq!(dataset.calls(), 1);
    }

    #[test]
    fn test_authenticate_healthy_dataset() {
        let dataset = InMemoryDataset::new("test", "VHM0", grid());
        assert!(tokio_test::block_on(dataset.authenticate()).is_ok());
        assert_eq!(dataset.calls(), 0);
    }
}
