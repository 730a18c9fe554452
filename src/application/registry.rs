//! Process-wide holder for the loaded predictors.
//!
//! Each slot is filled at most once. Concurrent first requests block on the
//! same initialisation; a failed load leaves the slot empty so the next
//! request tries again.

use once_cell::sync::OnceCell;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::disease_service::load_disease_classifier;
use crate::application::ml::LoadedClassifier;
use crate::application::price_service::PriceForecaster;
use crate::application::soil_service::load_soil_classifier;
use crate::application::weather_service::WeatherForecaster;
use crate::config::Config;
use crate::domain::errors::{ForecastError, ModelError};

pub struct ModelRegistry {
    config: Config,
    soil: OnceCell<Arc<LoadedClassifier>>,
    disease: OnceCell<Arc<LoadedClassifier>>,
    price: OnceCell<Arc<PriceForecaster>>,
    weather: OnceCell<Arc<WeatherForecaster>>,
}

/// Which slots currently hold a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegistryStatus {
    pub soil_model: bool,
    pub plantdoc_predictor: bool,
    pub price_predictor: bool,
    pub weather_predictor: bool,
}

impl ModelRegistry {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            soil: OnceCell::new(),
            disease: OnceCell::new(),
            price: OnceCell::new(),
            weather: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Blocking: may read model files on first use.
    pub fn soil(&self) -> Result<Arc<LoadedClassifier>, ModelError> {
        self.soil
            .get_or_try_init(|| {
                load_soil_classifier(&self.config.models_dir, self.config.soil_synthesize_fallback)
                    .map(Arc::new)
            })
            .cloned()
    }

    /// Blocking: may read model files on first use.
    pub fn disease(&self) -> Result<Arc<LoadedClassifier>, ModelError> {
        self.disease
            .get_or_try_init(|| load_disease_classifier(&self.config.models_dir).map(Arc::new))
            .cloned()
    }

    pub fn price(&self) -> Arc<PriceForecaster> {
        Arc::clone(
            self.price
                .get_or_init(|| Arc::new(PriceForecaster::new(&self.config))),
        )
    }

    /// Blocking: may read the model and weather log on first use.
    pub fn weather(&self) -> Result<Arc<WeatherForecaster>, ForecastError> {
        self.weather
            .get_or_try_init(|| {
                WeatherForecaster::load(&self.config.models_dir, &self.config.weather_data_path)
                    .map(Arc::new)
            })
            .cloned()
    }

    pub fn status(&self) -> RegistryStatus {
        RegistryStatus {
            soil_model: self.soil.get().is_some(),
            plantdoc_predictor: self.disease.get().is_some(),
            price_predictor: self.price.get().is_some(),
            weather_predictor: self.weather.get().is_some(),
        }
    }

    /// Loads every model up front. Failures are logged and retried lazily.
    pub fn preload(&self) -> RegistryStatus {
        info!("Pre-loading models from {:?}", self.config.models_dir);

        if let Err(e) = self.soil() {
            warn!("Could not pre-load soil model: {}", e);
        }
        if let Err(e) = self.disease() {
            warn!("Could not pre-load plant disease predictor: {}", e);
        }
        self.price();
        if let Err(e) = self.weather() {
            warn!("Could not pre-load weather predictor: {}", e);
        }

        let status = self.status();
        info!("Model status after pre-load: {:?}", status);
        status
    }
}
