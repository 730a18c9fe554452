//! Weekly market price forecasts for the tracked crops.

use chrono::{Datelike, Duration, Local, NaiveDate, Utc};
use statrs::statistics::{Data, Median};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};

use crate::application::ml::ForestRegressor;
use crate::config::Config;
use crate::domain::errors::{ForecastError, ModelError};
use crate::domain::market::{Crop, CropForecast, PricePoint, PricePrediction, round_to};
use crate::domain::ml::feature_registry::{PriceFeatures, linspace, price_features_to_vector};
use crate::infrastructure::charts::render_line_chart;
use crate::infrastructure::datasets::{CropHistory, load_crop_history};

/// Volume and price features are swept across this band over the horizon.
const DEMAND_SWEEP: (f64, f64) = (0.95, 1.05);
/// Added to the median price change rate over the horizon.
const CHANGE_RATE_SWEEP: (f64, f64) = (-0.02, 0.02);

pub struct PriceForecaster {
    models_dir: PathBuf,
    data_dir: PathBuf,
    graph_dir: PathBuf,
    public_base_url: String,
    start: Option<NaiveDate>,
    horizon_days: i64,
    regressors: Mutex<HashMap<Crop, Arc<ForestRegressor>>>,
}

impl PriceForecaster {
    pub fn new(config: &Config) -> Self {
        Self {
            models_dir: config.models_dir.clone(),
            data_dir: config.data_dir.clone(),
            graph_dir: config.graph_dir.clone(),
            public_base_url: config.public_base_url.clone(),
            start: config.price_forecast_start,
            horizon_days: config.price_forecast_days,
            regressors: Mutex::new(HashMap::new()),
        }
    }

    pub fn graph_dir(&self) -> &Path {
        &self.graph_dir
    }

    /// Weekly dates after the start date: `start + 7i` for `i = 1..=days/7`.
    pub fn forecast_dates(&self) -> Result<Vec<NaiveDate>, ForecastError> {
        let start = self.start.unwrap_or_else(|| Utc::now().date_naive());
        let weeks = self.horizon_days / 7;
        if weeks < 1 {
            return Err(ForecastError::EmptyHorizon {
                days: self.horizon_days,
            });
        }
        let out_of_range = ForecastError::HorizonOutOfRange {
            days: self.horizon_days,
        };
        // The last week bounds every other one.
        weeks
            .checked_mul(7)
            .and_then(Duration::try_days)
            .and_then(|offset| start.checked_add_signed(offset))
            .ok_or(out_of_range)?;
        Ok((1..=weeks).map(|i| start + Duration::days(7 * i)).collect())
    }

    /// Forecasts every crop. Per-crop failures are reported inline.
    pub fn forecast_all(&self) -> Result<Vec<CropForecast>, ForecastError> {
        let dates = self.forecast_dates()?;
        info!(
            "Forecasting {} crops over {} weeks from {}",
            Crop::ALL.len(),
            dates.len(),
            dates.first().map(|d| d.to_string()).unwrap_or_default()
        );

        let forecasts: Vec<CropForecast> = Crop::ALL
            .iter()
            .map(|crop| match self.forecast_crop(*crop, &dates) {
                Ok(prediction) => CropForecast::Predicted(prediction),
                Err(e) => {
                    warn!("Price forecast for {} failed: {}", crop, e);
                    CropForecast::Failed {
                        crop: crop.name().to_string(),
                        error: e.to_string(),
                    }
                }
            })
            .collect();

        let failed: Vec<&str> = forecasts
            .iter()
            .filter(|f| matches!(f, CropForecast::Failed { .. }))
            .map(CropForecast::crop)
            .collect();
        if !failed.is_empty() {
            warn!(
                "{} of {} crops without a forecast: {}",
                failed.len(),
                forecasts.len(),
                failed.join(", ")
            );
        }
        Ok(forecasts)
    }

    pub fn forecast_crop(&self, crop: Crop, dates: &[NaiveDate]) -> Result<PricePrediction, ForecastError> {
        let regressor = self.regressor(crop)?;
        let history = load_crop_history(&self.data_dir.join(crop.dataset_file()))?;

        let rows = build_feature_rows(&history, dates)?;
        let predicted = regressor.predict(&rows)?;

        let unit = crop.unit();
        let predictions = dates
            .iter()
            .zip(predicted.iter())
            .map(|(date, price)| PricePoint {
                date: date.format("%Y-%m-%d").to_string(),
                price: round_to(unit.from_quintal(*price), 2),
            })
            .collect();

        let filename = format!(
            "{}_prediction_{}.png",
            crop.name(),
            Local::now().format("%Y%m%d_%H%M%S")
        );
        render_line_chart(&predicted, &self.graph_dir.join(&filename))?;
        info!("Saved price chart for {} as {}", crop, filename);

        Ok(PricePrediction {
            crop: crop.name().to_string(),
            unit: unit.label().to_string(),
            predictions,
            graph_url: format!("{}/graphs/{}", self.public_base_url, filename),
        })
    }

    /// Regressors are cached after their first successful load.
    fn regressor(&self, crop: Crop) -> Result<Arc<ForestRegressor>, ModelError> {
        let mut cache = self
            .regressors
            .lock()
            .map_err(|e| ModelError::Unavailable(format!("Regressor cache poisoned: {}", e)))?;

        if let Some(regressor) = cache.get(&crop) {
            return Ok(Arc::clone(regressor));
        }

        let regressor = Arc::new(
            ForestRegressor::load(&self.models_dir.join(crop.model_file())).inspect_err(|e| {
                error!("Price model for {} unavailable: {}", crop, e);
            })?,
        );
        info!(
            "Loaded {} for {} from {:?}",
            regressor.name(),
            crop,
            regressor.model_path()
        );
        cache.insert(crop, Arc::clone(&regressor));
        Ok(regressor)
    }
}

fn median_of(values: &[f64], column: &str) -> Result<f64, ForecastError> {
    if values.is_empty() {
        return Err(ForecastError::EmptyColumn {
            column: column.to_string(),
        });
    }
    Ok(Data::new(values.to_vec()).median())
}

/// One feature row per forecast date, in the regressor's training column order.
pub fn build_feature_rows(history: &CropHistory, dates: &[NaiveDate]) -> Result<Vec<Vec<f64>>, ForecastError> {
    let first_date = history.first_date.ok_or_else(|| ForecastError::EmptyColumn {
        column: "Reported Date".to_string(),
    })?;

    let arrivals = median_of(&history.arrivals, "Arrivals (Tonnes)")?;
    let min_price = median_of(&history.min_price, "Min Price (Rs./Quintal)")?;
    let max_price = median_of(&history.max_price, "Max Price (Rs./Quintal)")?;
    let rolling = median_of(&history.rolling_modal_price, "Rolling_Modal_Price")?;
    let lag_1 = median_of(&history.lag_1_month, "Lag_1_Month")?;
    let lag_2 = median_of(&history.lag_2_months, "Lag_2_Months")?;
    let change_rate = median_of(&history.price_change_rate, "Price_Change_Rate")?;

    let price_range = max_price - min_price;
    let demand_indicator = arrivals / (min_price + 1.0);

    let demand = linspace(DEMAND_SWEEP.0, DEMAND_SWEEP.1, dates.len());
    let change = linspace(CHANGE_RATE_SWEEP.0, CHANGE_RATE_SWEEP.1, dates.len());

    Ok(dates
        .iter()
        .zip(demand.iter().zip(change.iter()))
        .map(|(date, (scale, delta))| {
            price_features_to_vector(&PriceFeatures {
                days: (*date - first_date).num_days() as f64,
                month: date.month() as f64,
                arrivals: arrivals * scale,
                min_price: min_price * scale,
                max_price: max_price * scale,
                price_range: price_range * scale,
                demand_indicator: demand_indicator * scale,
                rolling_modal_price: rolling * scale,
                lag_1_month: lag_1 * scale,
                lag_2_months: lag_2 * scale,
                price_change_rate: change_rate + delta,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::smartcore_predictor::ForestModel;
    use crate::domain::ml::feature_registry::PRICE_FEATURE_NAMES;
    use smartcore::ensemble::random_forest_regressor::{
        RandomForestRegressor, RandomForestRegressorParameters,
    };
    use smartcore::linalg::basic::matrix::DenseMatrix;
    use tempfile::{TempDir, tempdir};

    const HEADER: &str = "Reported Date,Arrivals (Tonnes),Min Price (Rs./Quintal),Max Price (Rs./Quintal),Modal Price (Rs./Quintal),Rolling_Modal_Price,Lag_1_Month,Lag_2_Months,Price_Change_Rate";

    fn history() -> CropHistory {
        CropHistory {
            first_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            arrivals: vec![10.0, 20.0, 30.0],
            min_price: vec![999.0, 1099.0, 1199.0],
            max_price: vec![1400.0, 1500.0, 1600.0],
            rolling_modal_price: vec![1200.0, 1250.0, 1300.0],
            lag_1_month: vec![1150.0, 1200.0, 1250.0],
            lag_2_months: vec![1100.0, 1150.0, 1200.0],
            price_change_rate: vec![-0.01, 0.0, 0.05],
        }
    }

    fn trained_model() -> ForestModel {
        let x: Vec<Vec<f64>> = (0..40)
            .map(|i| {
                let f = i as f64;
                vec![
                    400.0 + f,
                    (i % 12 + 1) as f64,
                    20.0 + f,
                    1000.0 + 5.0 * f,
                    1400.0 + 5.0 * f,
                    400.0,
                    0.02,
                    1200.0 + 5.0 * f,
                    1190.0 + 5.0 * f,
                    1180.0 + 5.0 * f,
                    0.01,
                ]
            })
            .collect();
        let y: Vec<f64> = (0..40).map(|i| 1200.0 + 5.0 * i as f64).collect();
        let x = DenseMatrix::from_2d_vec(&x).unwrap();
        let params = RandomForestRegressorParameters::default()
            .with_n_trees(5)
            .with_max_depth(4);
        RandomForestRegressor::fit(&x, &y, params).unwrap()
    }

    fn workspace(crops: &[Crop]) -> (TempDir, Config) {
        let dir = tempdir().unwrap();
        let mut config = Config::rooted_at(dir.path());
        config.price_forecast_start = NaiveDate::from_ymd_opt(2025, 3, 9);
        config.public_base_url = "http://agri.test".to_string();
        std::fs::create_dir_all(&config.data_dir).unwrap();

        for crop in crops {
            ForestRegressor::from_model(trained_model(), config.models_dir.join(crop.model_file()))
                .save()
                .unwrap();
            let csv = format!(
                "{HEADER}\n2024-01-01,20,1000,1400,1200,1200,1190,1180,0.01\n2024-02-01,30,1100,1500,1300,1250,1200,1190,0.02\n"
            );
            std::fs::write(config.data_dir.join(crop.dataset_file()), csv).unwrap();
        }
        (dir, config)
    }

    #[test]
    fn test_feature_rows_follow_registry_order() {
        let dates = [
            NaiveDate::from_ymd_opt(2024, 1, 11).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        ];
        let rows = build_feature_rows(&history(), &dates).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), PRICE_FEATURE_NAMES.len());
        // Days and Month are never scaled
        assert_eq!(rows[0][0], 10.0);
        assert_eq!(rows[1][0], 31.0);
        assert_eq!(rows[1][1], 2.0);
        // Arrivals median 20 swept from 0.95 to 1.05
        assert!((rows[0][2] - 19.0).abs() < 1e-9);
        assert!((rows[1][2] - 21.0).abs() < 1e-9);
        // Demand indicator is arrivals / (min price + 1)
        assert!((rows[0][6] - 0.95 * 20.0 / 1100.0).abs() < 1e-9);
        // Change rate is shifted, not scaled
        assert!((rows[0][10] - (0.0 - 0.02)).abs() < 1e-9);
        assert!((rows[1][10] - 0.02).abs() < 1e-9);
    }

    #[test]
    fn test_empty_column_is_reported() {
        let mut history = history();
        history.lag_2_months.clear();
        let dates = [NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()];
        let err = build_feature_rows(&history, &dates).unwrap_err();
        assert!(err.to_string().contains("Lag_2_Months"));
    }

    #[test]
    fn test_forecast_dates_are_weekly() {
        let (_dir, config) = workspace(&[]);
        let dates = PriceForecaster::new(&config).forecast_dates().unwrap();

        assert_eq!(dates.len(), 4);
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2025, 3, 16).unwrap());
        assert!(dates.windows(2).all(|w| (w[1] - w[0]).num_days() == 7));
    }

    #[test]
    fn test_short_horizon_is_an_error() {
        let (_dir, mut config) = workspace(&[]);
        config.price_forecast_days = 6;
        assert!(matches!(
            PriceForecaster::new(&config).forecast_all(),
            Err(ForecastError::EmptyHorizon { days: 6 })
        ));
    }

    #[test]
    fn test_horizon_past_the_calendar_is_an_error() {
        let (_dir, mut config) = workspace(&[]);
        config.price_forecast_days = 7_000_000_000_000;
        assert!(matches!(
            PriceForecaster::new(&config).forecast_dates(),
            Err(ForecastError::HorizonOutOfRange { .. })
        ));
    }

    #[test]
    fn test_forecast_all_reports_missing_crops_inline() {
        let (_dir, config) = workspace(&[Crop::Banana, Crop::Wheat]);
        let forecaster = PriceForecaster::new(&config);
        let results = forecaster.forecast_all().unwrap();

        let crops: Vec<&str> = results.iter().map(|r| r.crop()).collect();
        assert_eq!(crops, vec!["banana", "onion", "tomato", "wheat", "carrot"]);

        match &results[0] {
            CropForecast::Predicted(p) => {
                assert_eq!(p.unit, "Rs./Dozen");
                assert_eq!(p.predictions.len(), 4);
                assert_eq!(p.predictions[0].date, "2025-03-16");
                assert!(p.graph_url.starts_with("http://agri.test/graphs/banana_prediction_"));
                let file = p.graph_url.rsplit('/').next().unwrap();
                assert!(forecaster.graph_dir().join(file).exists());
            }
            other => panic!("banana should forecast, got {:?}", other),
        }
        match &results[3] {
            CropForecast::Predicted(p) => assert_eq!(p.unit, "Rs./Kg"),
            other => panic!("wheat should forecast, got {:?}", other),
        }
        assert!(matches!(results[1], CropForecast::Failed { .. }));
    }
}
