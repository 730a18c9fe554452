//! HTTP surface: router construction and shared handler state.

pub mod forecasts;
pub mod health;
pub mod predictions;
pub mod upload;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::application::ModelRegistry;

/// Shared application context passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ModelRegistry>,
}

impl AppState {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }
}

/// Every route the service exposes, for the startup log.
pub const ROUTES: &[&str] = &[
    "GET  /",
    "GET  /health",
    "GET  /healthz",
    "GET  /models/status",
    "POST /predict-soil",
    "POST /predict",
    "GET  /market-predictions",
    "GET  /weather-forecast",
    "GET  /weather-alerts",
    "GET  /graphs/{file}",
];

pub fn build_router(state: AppState) -> Router {
    let config = state.registry.config();
    let graph_dir = config.graph_dir.clone();
    let body_limit = config.max_upload_bytes;

    Router::new()
        // Health
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/healthz", get(health::healthz))
        .route("/models/status", get(health::models_status))
        // Image predictions
        .route("/predict-soil", post(predictions::predict_soil))
        .route("/predict", post(predictions::predict_disease))
        // Forecasts
        .route("/market-predictions", get(forecasts::market_predictions))
        .route("/weather-forecast", get(forecasts::weather_forecast))
        .route("/weather-alerts", get(forecasts::weather_alerts))
        // Rendered price charts
        .nest_service("/graphs", ServeDir::new(graph_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
