use axum::{Json, extract::State};
use serde::Serialize;

use super::AppState;
use crate::application::RegistryStatus;

const SERVICE_MESSAGE: &str = "AgriSync API is running";

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: SERVICE_MESSAGE,
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health
///
/// Liveness only; never touches the models.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "API is running",
    })
}

#[derive(Debug, Serialize)]
pub struct DetailedHealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub version: &'static str,
    pub models: RegistryStatus,
}

/// GET /healthz
pub async fn healthz(State(state): State<AppState>) -> Json<DetailedHealthResponse> {
    Json(DetailedHealthResponse {
        status: "healthy",
        message: SERVICE_MESSAGE,
        version: env!("CARGO_PKG_VERSION"),
        models: state.registry.status(),
    })
}

#[derive(Debug, Serialize)]
pub struct ModelStatusResponse {
    pub soil_model: &'static str,
    pub plant_disease_model: &'static str,
    pub price_prediction_model: &'static str,
    pub weather_model: &'static str,
    pub message: &'static str,
}

fn load_state(loaded: bool) -> &'static str {
    if loaded { "loaded" } else { "not_loaded" }
}

impl From<RegistryStatus> for ModelStatusResponse {
    fn from(status: RegistryStatus) -> Self {
        let all_loaded = status.soil_model
            && status.plantdoc_predictor
            && status.price_predictor
            && status.weather_predictor;
        Self {
            soil_model: load_state(status.soil_model),
            plant_disease_model: load_state(status.plantdoc_predictor),
            price_prediction_model: load_state(status.price_predictor),
            weather_model: load_state(status.weather_predictor),
            message: if all_loaded {
                "All models loaded"
            } else {
                "Models will be loaded on first use"
            },
        }
    }
}

/// GET /models/status
pub async fn models_status(State(state): State<AppState>) -> Json<ModelStatusResponse> {
    Json(state.registry.status().into())
}
