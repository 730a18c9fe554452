use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of the historical weather log.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherObservation {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "City", default)]
    pub city: String,
    #[serde(rename = "Temperature (°C)")]
    pub temperature: f64,
    #[serde(rename = "Humidity (%)")]
    pub humidity: f64,
    #[serde(rename = "Wind Speed (m/s)")]
    pub wind_speed: f64,
    #[serde(rename = "Pressure (hPa)")]
    pub pressure: f64,
    #[serde(rename = "Weather Condition", default)]
    pub condition: String,
    #[serde(rename = "Description", default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureForecast {
    pub date: String,
    pub temperature: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherAlert {
    Storm,
    Drought,
    Flood,
    HighWind,
}

impl fmt::Display for WeatherAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            WeatherAlert::Storm => "Storm Alert! Take precautions.",
            WeatherAlert::Drought => "Drought Alert! Extremely hot and dry conditions.",
            WeatherAlert::Flood => "Flood Alert! Heavy rain detected. Stay safe.",
            WeatherAlert::HighWind => "High Wind Speed Alert! Secure loose objects.",
        };
        f.write_str(msg)
    }
}

const STORM_CONDITIONS: &[&str] = &["storm", "thunderstorm", "hurricane"];
const RAIN_CONDITIONS: &[&str] = &["rain", "heavy rain", "drizzle"];

/// Evaluates the alert rules against a single observation.
pub fn check_alerts(obs: &WeatherObservation) -> Vec<WeatherAlert> {
    let condition = obs.condition.trim().to_lowercase();
    let mut alerts = Vec::new();

    if STORM_CONDITIONS.contains(&condition.as_str()) {
        alerts.push(WeatherAlert::Storm);
    }
    if obs.temperature > 40.0 && obs.humidity < 25.0 {
        alerts.push(WeatherAlert::Drought);
    }
    if RAIN_CONDITIONS.contains(&condition.as_str()) && obs.humidity > 90.0 {
        alerts.push(WeatherAlert::Flood);
    }
    if obs.wind_speed > 15.0 {
        alerts.push(WeatherAlert::HighWind);
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(condition: &str, temperature: f64, humidity: f64, wind: f64) -> WeatherObservation {
        WeatherObservation {
            date: "2025-03-09".to_string(),
            city: "Cherrapunji".to_string(),
            temperature,
            humidity,
            wind_speed: wind,
            pressure: 1012.0,
            condition: condition.to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn test_calm_day_has_no_alerts() {
        assert!(check_alerts(&observation("Clouds", 24.0, 60.0, 3.0)).is_empty());
    }

    #[test]
    fn test_multiple_alerts() {
        let alerts = check_alerts(&observation("Thunderstorm", 30.0, 70.0, 22.0));
        assert_eq!(alerts, vec![WeatherAlert::Storm, WeatherAlert::HighWind]);
    }

    #[test]
    fn test_flood_needs_rain_and_humidity() {
        assert_eq!(
            check_alerts(&observation("Rain", 22.0, 95.0, 2.0)),
            vec![WeatherAlert::Flood]
        );
        assert!(check_alerts(&observation("Rain", 22.0, 80.0, 2.0)).is_empty());
    }

    #[test]
    fn test_drought() {
        assert_eq!(
            check_alerts(&observation("Clear", 43.0, 12.0, 4.0)),
            vec![WeatherAlert::Drought]
        );
    }
}
