//! Wave API Service Library
//!
//! This crate provides the HTTP server implementation of the wave height
//! lookup: coordinate validation, the calibrated regional override, the
//! simulation fallback and the JSON envelope shared by every outcome.

pub mod config;
pub mod handlers;
pub mod lookup;
pub mod responses;
pub mod state;

use std::sync::Arc;

use axum::{
    routing::get,
    Extension, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use state::AppState;

/// Build the service router.
///
/// `/metrics` is only mounted when a Prometheus handle is supplied.
pub fn build_router(state: Arc<AppState>, prometheus: Option<PrometheusHandle>) -> Router {
    let mut app = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route(
            "/wave-data",
            get(handlers::wave_data::get_wave_data_handler)
                .post(handlers::wave_data::post_wave_data_handler),
        );

    if let Some(handle) = prometheus {
        app = app
            .route("/metrics", get(handlers::health::metrics_handler))
            .layer(Extension(handle));
    }

    app.layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
