//! CSV and JSON artifacts that sit next to the models.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::domain::errors::{ForecastError, ModelError};
use crate::domain::weather::WeatherObservation;

#[derive(Debug, Deserialize)]
struct ProcessedPriceRecord {
    #[serde(rename = "Reported Date")]
    reported_date: String,
    #[serde(rename = "Arrivals (Tonnes)", default)]
    arrivals: Option<f64>,
    #[serde(rename = "Min Price (Rs./Quintal)", default)]
    min_price: Option<f64>,
    #[serde(rename = "Max Price (Rs./Quintal)", default)]
    max_price: Option<f64>,
    #[serde(rename = "Rolling_Modal_Price", default)]
    rolling_modal_price: Option<f64>,
    #[serde(rename = "Lag_1_Month", default)]
    lag_1_month: Option<f64>,
    #[serde(rename = "Lag_2_Months", default)]
    lag_2_months: Option<f64>,
    #[serde(rename = "Price_Change_Rate", default)]
    price_change_rate: Option<f64>,
}

/// Column-wise view of a crop's processed market history.
/// Empty cells are dropped per column.
#[derive(Debug, Clone, Default)]
pub struct CropHistory {
    pub first_date: Option<NaiveDate>,
    pub arrivals: Vec<f64>,
    pub min_price: Vec<f64>,
    pub max_price: Vec<f64>,
    pub rolling_modal_price: Vec<f64>,
    pub lag_1_month: Vec<f64>,
    pub lag_2_months: Vec<f64>,
    pub price_change_rate: Vec<f64>,
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%m/%d/%Y", "%d %b %Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

pub fn parse_report_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

fn open_csv(path: &Path) -> Result<csv::Reader<BufReader<File>>, ForecastError> {
    let file = File::open(path).map_err(|e| ForecastError::Dataset {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(csv::Reader::from_reader(BufReader::new(file)))
}

pub fn load_crop_history(path: &Path) -> Result<CropHistory, ForecastError> {
    let mut rdr = open_csv(path)?;
    let mut history = CropHistory::default();

    for result in rdr.deserialize() {
        let record: ProcessedPriceRecord = result.map_err(|e| ForecastError::Dataset {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        if let Some(date) = parse_report_date(&record.reported_date) {
            history.first_date = Some(match history.first_date {
                Some(current) => current.min(date),
                None => date,
            });
        }

        history.arrivals.extend(record.arrivals);
        history.min_price.extend(record.min_price);
        history.max_price.extend(record.max_price);
        history.rolling_modal_price.extend(record.rolling_modal_price);
        history.lag_1_month.extend(record.lag_1_month);
        history.lag_2_months.extend(record.lag_2_months);
        history.price_change_rate.extend(record.price_change_rate);
    }

    Ok(history)
}

pub fn load_weather_history(path: &Path) -> Result<Vec<WeatherObservation>, ForecastError> {
    let mut rdr = open_csv(path)?;
    rdr.deserialize()
        .collect::<Result<Vec<WeatherObservation>, _>>()
        .map_err(|e| ForecastError::Dataset {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Reads a JSON array of class labels.
pub fn read_labels(path: &Path) -> Result<Vec<String>, ModelError> {
    if !path.exists() {
        return Err(ModelError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path).map_err(|e| ModelError::Labels {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let labels: Vec<String> =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| ModelError::Labels {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    if labels.is_empty() {
        return Err(ModelError::Labels {
            path: path.to_path_buf(),
            reason: "label list is empty".to_string(),
        });
    }
    Ok(labels)
}

pub fn write_labels(path: &Path, labels: &[String]) -> Result<(), ModelError> {
    let json = serde_json::to_string(labels).map_err(|e| ModelError::Labels {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    std::fs::write(path, json).map_err(|e| ModelError::Labels {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_parse_report_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_report_date("2024-01-15"), Some(expected));
        assert_eq!(parse_report_date("15-01-2024"), Some(expected));
        assert_eq!(parse_report_date("2024-01-15 00:00:00"), Some(expected));
        assert_eq!(parse_report_date("yesterday"), None);
    }

    #[test]
    fn test_load_crop_history_skips_blank_cells() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("onion_processed.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(
            file,
            "Reported Date,Arrivals (Tonnes),Min Price (Rs./Quintal),Max Price (Rs./Quintal),Modal Price (Rs./Quintal),Rolling_Modal_Price,Lag_1_Month,Lag_2_Months,Price_Change_Rate"
        )
        .unwrap();
        writeln!(file, "2024-02-01,10,1000,1400,1200,1180,1150,,0.01").unwrap();
        writeln!(file, "2024-01-01,12,1100,1500,1300,1210,1190,1100,").unwrap();

        let history = load_crop_history(&path).unwrap();
        assert_eq!(history.first_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(history.arrivals, vec![10.0, 12.0]);
        assert_eq!(history.lag_2_months, vec![1100.0]);
        assert_eq!(history.price_change_rate, vec![0.01]);
    }

    #[test]
    fn test_labels_round_trip_and_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("class_names.json");
        assert!(matches!(read_labels(&path), Err(ModelError::NotFound { .. })));

        let labels = vec!["Black Soil".to_string(), "Red soil".to_string()];
        write_labels(&path, &labels).unwrap();
        assert_eq!(read_labels(&path).unwrap(), labels);
    }
}
