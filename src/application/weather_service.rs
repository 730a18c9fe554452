//! Seven-day temperature outlook and rule-based weather alerts.

use chrono::{Duration, NaiveDate, Utc};
use statrs::statistics::{Data, Median};
use std::path::Path;
use tracing::info;

use crate::application::ml::ForestRegressor;
use crate::domain::errors::ForecastError;
use crate::domain::market::round_to;
use crate::domain::ml::feature_registry::{WeatherFeatures, weather_features_to_vector};
use crate::domain::weather::{TemperatureForecast, WeatherObservation, check_alerts};
use crate::infrastructure::datasets::load_weather_history;

pub const WEATHER_MODEL_FILE: &str = "weather_forecast.json";
pub const FORECAST_DAYS: i64 = 7;

pub struct WeatherForecaster {
    regressor: ForestRegressor,
    baseline: WeatherFeatures,
}

impl WeatherForecaster {
    pub fn load(models_dir: &Path, history_path: &Path) -> Result<Self, ForecastError> {
        let regressor = ForestRegressor::load(&models_dir.join(WEATHER_MODEL_FILE))?;
        let history = load_weather_history(history_path)?;
        let baseline = baseline_features(&history)?;

        info!(
            "Weather forecaster ready ({} observations, median {:.1}°C)",
            history.len(),
            baseline.temperature
        );
        Ok(Self {
            regressor,
            baseline,
        })
    }

    /// Predicted temperature for each of the next seven days after `today`.
    pub fn forecast_from(&self, today: NaiveDate) -> Result<Vec<TemperatureForecast>, ForecastError> {
        // Day offsets start at 1 so the first row is tomorrow, matching the dates below.
        let rows: Vec<Vec<f64>> = (1..=FORECAST_DAYS)
            .map(|day| {
                weather_features_to_vector(&WeatherFeatures {
                    days: day as f64,
                    ..self.baseline.clone()
                })
            })
            .collect();

        let temperatures = self.regressor.predict(&rows)?;

        Ok((1..=FORECAST_DAYS)
            .zip(temperatures)
            .map(|(day, temperature)| TemperatureForecast {
                date: (today + Duration::days(day)).format("%Y-%m-%d").to_string(),
                temperature: round_to(temperature, 2),
            })
            .collect())
    }

    pub fn forecast(&self) -> Result<Vec<TemperatureForecast>, ForecastError> {
        self.forecast_from(Utc::now().date_naive())
    }
}

fn median_of(values: Vec<f64>, column: &str) -> Result<f64, ForecastError> {
    if values.is_empty() {
        return Err(ForecastError::EmptyColumn {
            column: column.to_string(),
        });
    }
    Ok(Data::new(values).median())
}

fn baseline_features(history: &[WeatherObservation]) -> Result<WeatherFeatures, ForecastError> {
    Ok(WeatherFeatures {
        days: 0.0,
        temperature: median_of(history.iter().map(|o| o.temperature).collect(), "Temperature (°C)")?,
        humidity: median_of(history.iter().map(|o| o.humidity).collect(), "Humidity (%)")?,
        wind_speed: median_of(history.iter().map(|o| o.wind_speed).collect(), "Wind Speed (m/s)")?,
        pressure: median_of(history.iter().map(|o| o.pressure).collect(), "Pressure (hPa)")?,
    })
}

/// Alert messages for the most recent observation in the weather log.
pub fn current_alerts(history_path: &Path) -> Result<Vec<String>, ForecastError> {
    let history = load_weather_history(history_path)?;
    // Alerts describe current conditions: the newest row, not the first one in the file.
    let latest = history.last().ok_or_else(|| ForecastError::EmptyColumn {
        column: "Date".to_string(),
    })?;

    let alerts: Vec<String> = check_alerts(latest).iter().map(|a| a.to_string()).collect();
    info!("{} weather alerts for {} on {}", alerts.len(), latest.city, latest.date);
    Ok(alerts)
}
