//! Configuration module for AgriSync.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Server, Models and Forecasts.

mod forecast_config;
mod model_config;
mod server_config;

pub use forecast_config::ForecastEnvConfig;
pub use model_config::ModelEnvConfig;
pub use server_config::ServerEnvConfig;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Main application configuration.
///
/// This struct aggregates all configuration from sub-modules into flat fields
/// for the rest of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // Server (from ServerEnvConfig)
    pub host: String,
    pub port: u16,
    pub public_base_url: String,
    pub max_upload_bytes: usize,
    pub preload_models: bool,

    // Models (from ModelEnvConfig)
    pub models_dir: PathBuf,
    pub soil_synthesize_fallback: bool,

    // Forecasts (from ForecastEnvConfig)
    pub data_dir: PathBuf,
    pub graph_dir: PathBuf,
    pub weather_data_path: PathBuf,
    pub price_forecast_start: Option<NaiveDate>,
    pub price_forecast_days: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self::compose(
            ServerEnvConfig::default(),
            ModelEnvConfig::default(),
            ForecastEnvConfig::default(),
        )
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This orchestrates loading from all sub-config modules and composes
    /// them into a unified Config struct.
    pub fn from_env() -> Result<Self> {
        let server = ServerEnvConfig::from_env().context("Failed to load server config")?;
        let models = ModelEnvConfig::from_env();
        let forecast = ForecastEnvConfig::from_env().context("Failed to load forecast config")?;

        Ok(Self::compose(server, models, forecast))
    }

    fn compose(server: ServerEnvConfig, models: ModelEnvConfig, forecast: ForecastEnvConfig) -> Self {
        Self {
            // Server
            host: server.host,
            port: server.port,
            public_base_url: server.public_base_url,
            max_upload_bytes: server.max_upload_bytes,
            preload_models: server.preload_models,

            // Models
            models_dir: models.models_dir,
            soil_synthesize_fallback: models.soil_synthesize_fallback,

            // Forecasts
            data_dir: forecast.data_dir,
            graph_dir: forecast.graph_dir,
            weather_data_path: forecast.weather_data_path,
            price_forecast_start: forecast.price_forecast_start,
            price_forecast_days: forecast.price_forecast_days,
        }
    }

    /// Points every artifact directory below `root`, keeping the default layout.
    /// Used by deployments that ship a single bundle directory, and by tests.
    pub fn rooted_at(root: &Path) -> Self {
        Self {
            models_dir: root.join("models"),
            data_dir: root.join("processed_data"),
            graph_dir: root.join("predicted_graphs"),
            weather_data_path: root.join("data").join("historical_weather.csv"),
            ..Self::default()
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
