use serde::Serialize;
use std::fmt;

/// Crops with a trained price model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Crop {
    Banana,
    Onion,
    Tomato,
    Wheat,
    Carrot,
}

impl Crop {
    /// Forecast order of the market endpoint.
    pub const ALL: [Crop; 5] = [
        Crop::Banana,
        Crop::Onion,
        Crop::Tomato,
        Crop::Wheat,
        Crop::Carrot,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Crop::Banana => "banana",
            Crop::Onion => "onion",
            Crop::Tomato => "tomato",
            Crop::Wheat => "wheat",
            Crop::Carrot => "carrot",
        }
    }

    /// Bananas are sold by the dozen; every other crop by the kilogram.
    pub fn unit(&self) -> PriceUnit {
        match self {
            Crop::Banana => PriceUnit::RupeesPerDozen,
            _ => PriceUnit::RupeesPerKg,
        }
    }

    pub fn model_file(&self) -> String {
        format!("{}_model.json", self.name())
    }

    pub fn dataset_file(&self) -> String {
        format!("{}_processed.csv", self.name())
    }
}

impl fmt::Display for Crop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceUnit {
    RupeesPerKg,
    RupeesPerDozen,
}

impl PriceUnit {
    pub fn label(&self) -> &'static str {
        match self {
            PriceUnit::RupeesPerKg => "Rs./Kg",
            PriceUnit::RupeesPerDozen => "Rs./Dozen",
        }
    }

    /// Converts a modal price in Rs./Quintal into this retail unit.
    pub fn from_quintal(&self, price_per_quintal: f64) -> f64 {
        let per_kg = price_per_quintal / 100.0;
        match self {
            PriceUnit::RupeesPerKg => per_kg,
            PriceUnit::RupeesPerDozen => per_kg * 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePoint {
    pub date: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePrediction {
    pub crop: String,
    pub unit: String,
    pub predictions: Vec<PricePoint>,
    pub graph_url: String,
}

/// Outcome for a single crop; a failure never aborts the rest of the batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CropForecast {
    Predicted(PricePrediction),
    Failed { crop: String, error: String },
}

impl CropForecast {
    pub fn crop(&self) -> &str {
        match self {
            CropForecast::Predicted(p) => &p.crop,
            CropForecast::Failed { crop, .. } => crop,
        }
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
