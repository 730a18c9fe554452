use crate::domain::errors::ModelError;
use smartcore::ensemble::random_forest_regressor::RandomForestRegressor;
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub type ForestModel = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// SmartCore random forest regressor persisted as JSON.
pub struct ForestRegressor {
    model: ForestModel,
    model_path: PathBuf,
}

impl ForestRegressor {
    pub fn load(model_path: &Path) -> Result<Self, ModelError> {
        if !model_path.exists() {
            return Err(ModelError::NotFound {
                path: model_path.to_path_buf(),
            });
        }

        let file = File::open(model_path).map_err(|e| {
            error!("Failed to open model file: {}", e);
            ModelError::Load {
                path: model_path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;

        // Smartcore deserialization (serde_json)
        let model: ForestModel = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            error!("Failed to deserialize ML model: {}", e);
            ModelError::Load {
                path: model_path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;

        info!("Successfully loaded ML model from {:?}", model_path);
        Ok(Self {
            model,
            model_path: model_path.to_path_buf(),
        })
    }

    pub fn from_model(model: ForestModel, model_path: PathBuf) -> Self {
        Self { model, model_path }
    }

    pub fn save(&self) -> Result<(), ModelError> {
        let save_error = |reason: String| ModelError::Load {
            path: self.model_path.clone(),
            reason,
        };
        if let Some(parent) = self.model_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_error(e.to_string()))?;
        }
        let file = File::create(&self.model_path).map_err(|e| save_error(e.to_string()))?;
        serde_json::to_writer(BufWriter::new(file), &self.model).map_err(|e| save_error(e.to_string()))
    }

    /// Predicts one value per feature row.
    pub fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let input_matrix = DenseMatrix::from_2d_vec(&rows.to_vec()).map_err(|e| {
            ModelError::Inference {
                reason: format!("Matrix creation failed: {}", e),
            }
        })?;

        let predictions = self
            .model
            .predict(&input_matrix)
            .map_err(|e| ModelError::Inference {
                reason: format!("Prediction failed: {}", e),
            })?;

        if predictions.len() != rows.len() {
            return Err(ModelError::Inference {
                reason: format!(
                    "Expected {} predictions, got {}",
                    rows.len(),
                    predictions.len()
                ),
            });
        }
        Ok(predictions)
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn name(&self) -> &str {
        "SmartCore Random Forest"
    }
}
