//! Forecast data locations and horizon parsing from environment variables.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::env;
use std::path::PathBuf;

/// Upper bound on `PRICE_FORECAST_DAYS` (ten years).
pub const MAX_FORECAST_DAYS: i64 = 3650;

/// Forecast environment configuration
#[derive(Debug, Clone)]
pub struct ForecastEnvConfig {
    /// Directory holding `{crop}_processed.csv`.
    pub data_dir: PathBuf,
    /// Where rendered price charts are written and served from.
    pub graph_dir: PathBuf,
    pub weather_data_path: PathBuf,
    /// Anchor date for price forecasts; `None` means today.
    pub price_forecast_start: Option<NaiveDate>,
    pub price_forecast_days: i64,
}

impl Default for ForecastEnvConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("processed_data"),
            graph_dir: PathBuf::from("predicted_graphs"),
            weather_data_path: PathBuf::from("data/historical_weather.csv"),
            price_forecast_start: None,
            price_forecast_days: 34,
        }
    }
}

impl ForecastEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let price_forecast_start = match env::var("PRICE_FORECAST_START") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                    .context(format!("Failed to parse PRICE_FORECAST_START '{}'", raw))?,
            ),
            _ => None,
        };

        let price_forecast_days = env::var("PRICE_FORECAST_DAYS")
            .unwrap_or_else(|_| defaults.price_forecast_days.to_string())
            .parse::<i64>()
            .context("Failed to parse PRICE_FORECAST_DAYS")?;
        if price_forecast_days < 0 {
            anyhow::bail!("PRICE_FORECAST_DAYS must not be negative");
        }
        if price_forecast_days > MAX_FORECAST_DAYS {
            anyhow::bail!(
                "PRICE_FORECAST_DAYS must be at most {} (got {})",
                MAX_FORECAST_DAYS,
                price_forecast_days
            );
        }

        Ok(Self {
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            graph_dir: env::var("GRAPH_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.graph_dir),
            weather_data_path: env::var("WEATHER_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.weather_data_path),
            price_forecast_start,
            price_forecast_days,
        })
    }
}
