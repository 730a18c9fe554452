use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use std::sync::Arc;
use tracing::{error, warn};

use super::AppState;
use super::upload::read_upload;
use crate::application::disease_service::{self, DiseaseResponse};
use crate::application::soil_service::{self, SoilResponse};

/// POST /predict-soil
///
/// Always answers 200; degraded tiers are reported in the body.
pub async fn predict_soil(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Json<SoilResponse> {
    let bytes = match read_upload(multipart).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Soil prediction request rejected: {}", e);
            return Json(SoilResponse::analysis_error());
        }
    };

    let registry = Arc::clone(&state.registry);
    let result = tokio::task::spawn_blocking(move || {
        let classifier = registry.soil();
        soil_service::predict_soil(classifier.as_deref(), &bytes)
    })
    .await;

    match result {
        Ok(response) => Json(response),
        Err(e) => {
            error!("Soil prediction task failed: {}", e);
            Json(SoilResponse::analysis_error())
        }
    }
}

/// POST /predict
pub async fn predict_disease(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Json<DiseaseResponse> {
    let bytes = match read_upload(multipart).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Plant disease request rejected: {}", e);
            return Json(DiseaseResponse::failed(e));
        }
    };

    let registry = Arc::clone(&state.registry);
    let result = tokio::task::spawn_blocking(move || {
        let classifier = registry.disease();
        disease_service::predict_disease(classifier.as_deref(), &bytes)
    })
    .await;

    match result {
        Ok(response) => Json(response),
        Err(e) => {
            error!("Plant disease task failed: {}", e);
            Json(DiseaseResponse::failed(e))
        }
    }
}
