//! Error types for marine sampling operations.

use thiserror::Error;

/// Result type for sampler operations.
pub type SamplerResult<T> = Result<T, SamplerError>;

/// Error types for dataset access and point sampling.
#[derive(Error, Debug)]
pub enum SamplerError {
    /// Coordinate outside the valid geographic range
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Date window with start after end, or unparseable dates
    #[error("Invalid date window: {0}")]
    InvalidWindow(String),

    /// The subset has no time steps at all
    #[error("No wave data available for the specified time range")]
    NoTimeSteps,

    /// The subset has no grid cells around the requested point
    #[error("No grid cells found around ({lat}, {lon})")]
    EmptyGrid { lat: f64, lon: f64 },

    /// Every inspected time step was missing at the nearest grid cell
    #[error("No valid wave data found in the {steps} most recent time steps")]
    Exhausted { steps: usize },

    /// The provider does not serve the requested variable
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    /// Provider answered with an error
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider payload did not match the expected layout
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// HTTP transport error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON decoding error
    #[error("Failed to parse provider response: {0}")]
    Json(#[from] serde_json::Error),
}

impl SamplerError {
    /// True when the provider was reached but had nothing usable for the point.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SamplerError::NoTimeSteps | SamplerError::EmptyGrid { .. } | SamplerError::Exhausted { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhausted_display() {
        let err = SamplerError::Exhausted { steps: 10 };
        assert_eq!(
            err.to_string(),
            "No valid wave data found in the 10 most recent time steps"
        );
    }

    #[test]
    fn test_not_found_classification() {
        assert!(SamplerError::NoTimeSteps.is_not_found());
        assert!(SamplerError::Exhausted { steps: 3 }.is_not_found());
        assert!(SamplerError::EmptyGrid { lat: 0.0, lon: 0.0 }.is_not_found());
        assert!(!SamplerError::Provider("unauthorized".to_string()).is_not_found());
        assert!(!SamplerError::UnknownVariable("VHM0".to_string()).is_not_found());
    }

    #[test]
    fn test_provider_message_is_preserved() {
        let err = SamplerError::Provider("Invalid credentials".to_string());
        assert!(err.to_string().contains("Invalid credentials"));
    }
}
