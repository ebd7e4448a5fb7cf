//! HTTP JSON backend for the Open-Meteo marine API.
//!
//! The provider resolves the requested point to its nearest sea grid cell and
//! answers with that cell's coordinates and an hourly series for the window:
//!
//! ```json
//! {"latitude": -33.0, "longitude": -71.625,
//!  "hourly": {"time": ["2024-01-01T00:00", ...], "wave_height": [1.84, null, ...]}}
//! ```
//!
//! The series is returned as a single-cell [`GridSubset`]; `null` entries are
//! missing samples. The provider may snap to a cell well away from the
//! requested point, so the subset is restricted to the request's box and a
//! cell outside it yields an empty grid.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::credentials::Credentials;
use crate::dataset::{GridSubset, MarineDataset, SubsetRequest};
use crate::error::{SamplerError, SamplerResult};

/// Default endpoint of the marine API.
pub const DEFAULT_BASE_URL: &str = "https://marine-api.open-meteo.com/v1/marine";

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Successful response body.
#[derive(Debug, Deserialize)]
struct MarineResponse {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    hourly: Option<Map<String, Value>>,
}

/// Error response body, e.g. `{"error": true, "reason": "..."}`.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    reason: String,
}

/// Client for the marine API.
#[derive(Debug, Clone)]
pub struct OpenMeteoMarine {
    client: Client,
    base_url: String,
    dataset_id: String,
    credentials: Credentials,
}

impl OpenMeteoMarine {
    /// Create a client against the default endpoint.
    pub fn new(dataset_id: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            dataset_id: dataset_id.into(),
            credentials,
        }
    }

    /// Point the client at a different endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Use a preconfigured HTTP client.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Credentials::Explicit { username, password } => builder.basic_auth(username, Some(password)),
            Credentials::Stored => builder,
        }
    }
}

#[async_trait]
impl MarineDataset for OpenMeteoMarine {
    fn dataset_id(&self) -> &str {
        &self.dataset_id
    }

    async fn authenticate(&self) -> SamplerResult<()> {
        info!(username = %self.credentials.username(), url = %self.base_url, "Authenticating with marine data provider");

        let response = self.authorized(self.client.get(&self.base_url)).send().await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(SamplerError::Provider(format!(
                "authentication rejected ({})",
                response.status()
            ))),
            // Any other answer means the endpoint is reachable with these credentials
            _ => Ok(()),
        }
    }

    async fn open_subset(&self, request: &SubsetRequest) -> SamplerResult<GridSubset> {
        let (lat, lon) = request.bbox.center();
        let start = request.window.start.format("%Y-%m-%d").to_string();
        let end = request.window.end.format("%Y-%m-%d").to_string();

        debug!(
            dataset = %self.dataset_id,
            variable = %request.variable,
            lat, lon, %start, %end,
            "Opening marine subset"
        );

        let query = [
            ("latitude", lat.to_string()),
            ("longitude", lon.to_string()),
            ("hourly", request.variable.clone()),
            ("start_date", start),
            ("end_date", end),
            ("timezone", "GMT".to_string()),
            ("cell_selection", "sea".to_string()),
        ];

        let response = self
            .authorized(self.client.get(&self.base_url).query(&query))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let reason = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.reason)
                .unwrap_or(body);
            return Err(SamplerError::Provider(format!("{}: {}", status, reason)));
        }

        let subset = parse_marine_response(&body, &request.variable)?;
        let restricted = subset.restrict(&request.bbox, &request.window);
        if !restricted.has_cells() {
            debug!(
                cell_lat = ?subset.latitudes().first(),
                cell_lon = ?subset.longitudes().first(),
                "Provider cell lies outside the requested box"
            );
        }

        Ok(restricted)
    }
}

/// Parse a successful response body into a single-cell subset.
pub fn parse_marine_response(body: &str, variable: &str) -> SamplerResult<GridSubset> {
    let response: MarineResponse = serde_json::from_str(body)?;

    let hourly = response
        .hourly
        .ok_or_else(|| SamplerError::InvalidFormat("response has no hourly block".to_string()))?;

    let times = hourly
        .get("time")
        .and_then(Value::as_array)
        .ok_or_else(|| SamplerError::InvalidFormat("hourly block has no time axis".to_string()))?
        .iter()
        .map(parse_time)
        .collect::<SamplerResult<Vec<_>>>()?;

    let values = hourly
        .get(variable)
        .and_then(Value::as_array)
        .ok_or_else(|| SamplerError::UnknownVariable(variable.to_string()))?
        .iter()
        .map(parse_value)
        .collect::<SamplerResult<Vec<_>>>()?;

    GridSubset::single_cell(response.latitude, response.longitude, times, values)
}

fn parse_value(value: &Value) -> SamplerResult<Option<f64>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        other => Err(SamplerError::InvalidFormat(format!("sample is not a number: {}", other))),
    }
}

fn parse_time(value: &Value) -> SamplerResult<DateTime<Utc>> {
    let s = value
        .as_str()
        .ok_or_else(|| SamplerError::InvalidFormat(format!("time entry is not a string: {}", value)))?;
    NaiveDateTime::parse_from_str(s, TIME_FORMAT)
        .map(|t| t.and_utc())
        .map_err(|e| SamplerError::InvalidFormat(format!("invalid time '{}': {}", s, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbox::BoundingBox;
    use crate::types::DateWindow;
    use chrono::TimeZone;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answer a single request with `body`, returning the endpoint URL.
    async fn serve_once(body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
        });

        format!("http://{}/v1/marine", addr)
    }

    fn client_for(url: String) -> OpenMeteoMarine {
        let http = Client::builder().timeout(Duration::from_secs(5)).build().unwrap();
        OpenMeteoMarine::new("glo-wav", Credentials::Stored)
            .with_base_url(url)
            .with_client(http)
    }

    fn subset_request(lat: f64, lon: f64) -> SubsetRequest {
        SubsetRequest::new(
            "wave_height",
            BoundingBox::around(lat, lon, 0.1),
            DateWindow::parse("2024-01-01", "2024-01-03").unwrap(),
        )
    }

    const FAR_CELL: &str = r#"{"latitude": -30.0, "longitude": -75.0,
        "hourly": {"time": ["2024-01-01T00:00"], "wave_height": [1.5]}}"#;

    const NEAR_CELL: &str = r#"{"latitude": -33.04, "longitude": -71.625,
        "hourly": {"time": ["2024-01-01T00:00", "2024-01-01T01:00"], "wave_height": [1.5, 1.7]}}"#;

    const SAMPLE: &str = r#"{
        "latitude": -33.0,
        "longitude": -71.625,
        "generationtime_ms": 0.21,
        "utc_offset_seconds": 0,
        "timezone": "GMT",
        "hourly_units": {"time": "iso8601", "wave_height": "m"},
        "hourly": {
            "time": ["2024-01-01T00:00", "2024-01-01T01:00", "2024-01-01T02:00"],
            "wave_height": [1.84, 1.9, null]
        }
    }"#;

    #[test]
    fn test_parse_series() {
        let subset = parse_marine_response(SAMPLE, "wave_height").unwrap();

        assert_eq!(subset.latitudes(), &[-33.0]);
        assert_eq!(subset.longitudes(), &[-71.625]);
        assert_eq!(subset.times().len(), 3);
        assert_eq!(
            subset.times()[1],
            Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap()
        );
        assert_eq!(subset.value_at(0, 0, 0), Some(1.84));
        assert_eq!(subset.value_at(2, 0, 0), None);
    }

    #[test]
    fn test_missing_variable() {
        let err = parse_marine_response(SAMPLE, "swell_wave_height").unwrap_err();
        assert!(matches!(err, SamplerError::UnknownVariable(_)));
    }

    #[test]
    fn test_missing_hourly_block() {
        let err = parse_marine_response(r#"{"latitude": 0.0, "longitude": 0.0}"#, "wave_height").unwrap_err();
        assert!(matches!(err, SamplerError::InvalidFormat(_)));
    }

    #[test]
    fn test_length_mismatch() {
        let body = r#"{"latitude": 0.0, "longitude": 0.0,
            "hourly": {"time": ["2024-01-01T00:00"], "wave_height": [1.0, 2.0]}}"#;
        assert!(parse_marine_response(body, "wave_height").is_err());
    }

    #[test]
    fn test_bad_time() {
        let body = r#"{"latitude": 0.0, "longitude": 0.0,
            "hourly": {"time": ["yesterday"], "wave_height": [1.0]}}"#;
        let err = parse_marine_response(body, "wave_height").unwrap_err();
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn test_not_json() {
        let err = parse_marine_response("<html>", "wave_height").unwrap_err();
        assert!(matches!(err, SamplerError::Json(_)));
    }

    #[test]
    fn test_builder() {
        let client = OpenMeteoMarine::new("glo-wav", Credentials::Stored).with_base_url("http://localhost:9999/marine");
        assert_eq!(client.base_url(), "http://localhost:9999/marine");
        assert_eq!(client.dataset_id(), "glo-wav");
    }

    #[test]
    fn test_non_numeric_sample_is_rejected() {
        let body = r#"{"latitude": 0.0, "longitude": 0.0,
            "hourly": {"time": ["2024-01-01T00:00"], "wave_height": ["1.2"]}}"#;
        let err = parse_marine_response(body, "wave_height").unwrap_err();
        assert!(matches!(err, SamplerError::InvalidFormat(_)));
    }

    #[tokio::test]
    async fn test_cell_outside_box_is_dropped() {
        let client = client_for(serve_once(FAR_CELL).await);

        let subset = client.open_subset(&subset_request(-33.0, -71.6)).await.unwrap();

        assert!(!subset.has_cells());
        assert_eq!(subset.times().len(), 1);
    }

    #[tokio::test]
    async fn test_cell_outside_box_samples_as_empty_grid() {
        use crate::sampler::{PointSampler, SamplerConfig};
        use crate::types::SampleRequest;
        use std::sync::Arc;

        let client = client_for(serve_once(FAR_CELL).await);
        let sampler = PointSampler::new(Arc::new(client), SamplerConfig::default());
        let request = SampleRequest::new(
            -33.0,
            -71.6,
            DateWindow::parse("2024-01-01", "2024-01-03").unwrap(),
        )
        .unwrap();

        let err = sampler.sample(&request).await.unwrap_err();
        assert!(matches!(err, SamplerError::EmptyGrid { .. }));
    }

    #[tokio::test]
    async fn test_cell_inside_box_is_kept() {
        let client = client_for(serve_once(NEAR_CELL).await);

        let subset = client.open_subset(&subset_request(-33.0, -71.6)).await.unwrap();

        assert_eq!(subset.latitudes(), &[-33.04]);
        assert_eq!(subset.longitudes(), &[-71.625]);
        assert_eq!(subset.value_at(1, 0, 0), Some(1.7));
    }
}
