//! Wave data handlers.

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::lookup::LookupError;
use crate::responses::{ErrorResponse, WaveDataResponse, USAGE_EXAMPLE};
use crate::state::AppState;

/// Example POST body shown in error details.
const BODY_EXAMPLE: &str = r#"{"latitude": -33.0472, "longitude": -71.6127}"#;

/// Query parameters for GET /wave-data.
///
/// Kept as strings so that a non-numeric value reads as missing rather than
/// failing extraction.
#[derive(Debug, Deserialize)]
pub struct WaveDataParams {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

/// GET /wave-data?lat=&lon=
pub async fn get_wave_data_handler(
    Extension(state): Extension<Arc<AppState>>,
    query: Result<Query<WaveDataParams>, QueryRejection>,
) -> Response {
    let params = match query {
        Ok(Query(params)) => params,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable wave data query");
            return missing_parameters();
        }
    };

    let lat = params.lat.as_deref().and_then(parse_number);
    let lon = params.lon.as_deref().and_then(parse_number);

    let (Some(lat), Some(lon)) = (lat, lon) else {
        return missing_parameters();
    };

    wave_data(&state, lat, lon).await
}

fn missing_parameters() -> Response {
    error_response(
        StatusCode::BAD_REQUEST,
        ErrorResponse::new("Missing required parameters: lat and lon").with_example(USAGE_EXAMPLE),
    )
}

/// POST /wave-data with `{latitude|lat, longitude|lon}`
pub async fn post_wave_data_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Bytes,
) -> Response {
    let value: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("Invalid JSON data").with_details(e.to_string()),
            );
        }
    };

    let Some(fields) = value.as_object().filter(|m| !m.is_empty()) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("No JSON data provided")
                .with_details(format!("Expected a JSON object such as {}", BODY_EXAMPLE)),
        );
    };

    let lat = coordinate_field(fields, &["latitude", "lat"]);
    let lon = coordinate_field(fields, &["longitude", "lon"]);

    let (Some(lat), Some(lon)) = (lat, lon) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("Missing required fields: latitude/lat and longitude/lon")
                .with_details(format!("Expected a JSON object such as {}", BODY_EXAMPLE)),
        );
    };

    wave_data(&state, lat, lon).await
}

async fn wave_data(state: &AppState, lat: f64, lon: f64) -> Response {
    let outcome = match state.service.lookup(lat, lon).await {
        Ok(outcome) => outcome,
        Err(e) => return lookup_error_response(&e),
    };

    let body = WaveDataResponse::from_outcome(
        &outcome,
        lat,
        lon,
        &state.requested_date(),
        state.service.policy(),
        Utc::now(),
    );

    json_response(StatusCode::OK, &body)
}

fn lookup_error_response(e: &LookupError) -> Response {
    if e.status_code() == 400 {
        return error_response(StatusCode::BAD_REQUEST, ErrorResponse::new(e.to_string()));
    }

    tracing::error!(error = %e, "Error processing wave data request");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorResponse::new("Internal server error").with_details(e.to_string()),
    )
}

/// First of `keys` holding a number or numeric string.
fn coordinate_field(fields: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| match fields.get(*key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        _ => None,
    })
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_value(body) {
        Ok(json) => (status, Json(json)).into_response(),
        Err(e) => {
            tracing::error!("Failed to serialize response: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("Internal server error").with_details(e.to_string()),
            )
        }
    }
}

fn error_response(status: StatusCode, body: ErrorResponse) -> Response {
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_coordinate_field_prefers_long_name() {
        let fields = object(json!({"latitude": -33.0, "lat": 10.0}));
        assert_eq!(coordinate_field(&fields, &["latitude", "lat"]), Some(-33.0));
    }

    #[test]
    fn test_coordinate_field_alias() {
        let fields = object(json!({"lat": -18.4783}));
        assert_eq!(coordinate_field(&fields, &["latitude", "lat"]), Some(-18.4783));
    }

    #[test]
    fn test_coordinate_field_numeric_string() {
        let fields = object(json!({"longitude": " -71.6127 "}));
        assert_eq!(coordinate_field(&fields, &["longitude", "lon"]), Some(-71.6127));
    }

    #[test]
    fn test_coordinate_field_zero_is_present() {
        let fields = object(json!({"latitude": 0, "lat": 5}));
        assert_eq!(coordinate_field(&fields, &["latitude", "lat"]), Some(0.0));
    }

    #[test]
    fn test_coordinate_field_rejects_non_numbers() {
        let fields = object(json!({"latitude": null, "lat": true}));
        assert_eq!(coordinate_field(&fields, &["latitude", "lat"]), None);
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_internal_lookup_error_is_500_with_details() {
        let response = lookup_error_response(&LookupError::Internal("window closed".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["details"], "window closed");
    }

    #[tokio::test]
    async fn test_validation_lookup_error_is_400_without_details() {
        let response = lookup_error_response(&LookupError::InvalidLongitude);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Longitude must be between -180 and 180");
        assert!(body.get("details").is_none());
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("200"), Some(200.0));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("NaN"), None);
    }
}
