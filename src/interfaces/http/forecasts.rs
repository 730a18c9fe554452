use axum::{Json, extract::State};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::error;

use super::AppState;
use crate::application::weather_service;

/// GET /market-predictions
pub async fn market_predictions(State(state): State<AppState>) -> Json<Value> {
    let forecaster = state.registry.price();
    let result = tokio::task::spawn_blocking(move || forecaster.forecast_all()).await;

    match result {
        Ok(Ok(data)) => Json(json!({ "status": "success", "data": data })),
        Ok(Err(e)) => {
            error!("Market prediction error: {}", e);
            Json(json!({
                "status": "error",
                "message": format!("Market prediction failed: {}", e),
                "data": []
            }))
        }
        Err(e) => {
            error!("Market prediction task failed: {}", e);
            Json(json!({
                "status": "error",
                "message": format!("Market prediction failed: {}", e),
                "data": []
            }))
        }
    }
}

/// GET /weather-forecast
pub async fn weather_forecast(State(state): State<AppState>) -> Json<Value> {
    let registry = Arc::clone(&state.registry);
    let result = tokio::task::spawn_blocking(move || registry.weather()?.forecast()).await;

    let message = match result {
        Ok(Ok(data)) => {
            return Json(json!({ "status": "success", "unit": "°C", "data": data }));
        }
        Ok(Err(e)) => e.to_string(),
        Err(e) => e.to_string(),
    };
    error!("Weather forecast error: {}", message);
    Json(json!({
        "status": "error",
        "message": format!("Weather forecast failed: {}", message),
        "data": []
    }))
}

/// GET /weather-alerts
pub async fn weather_alerts(State(state): State<AppState>) -> Json<Value> {
    let path = state.registry.config().weather_data_path.clone();
    let result = tokio::task::spawn_blocking(move || weather_service::current_alerts(&path)).await;

    let message = match result {
        Ok(Ok(alerts)) => return Json(json!({ "status": "success", "alerts": alerts })),
        Ok(Err(e)) => e.to_string(),
        Err(e) => e.to_string(),
    };
    error!("Weather alert error: {}", message);
    Json(json!({
        "status": "error",
        "message": format!("Weather alerts failed: {}", message),
        "alerts": []
    }))
}
