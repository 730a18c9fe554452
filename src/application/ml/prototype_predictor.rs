//! Minimal colour-prototype classifier.
//!
//! Scores each class by the squared distance between the image's mean colour
//! and a per-class centroid, then turns the negated distances into a softmax.
//! It is what the soil service synthesizes when no trained model ships with
//! the deployment.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::info;

use super::predictor::ImageClassifier;
use crate::domain::errors::ModelError;
use crate::domain::ml::classification::softmax;
use crate::domain::soil::{SOIL_LABELS, reference_color};
use crate::infrastructure::ImageTensor;

const DEFAULT_TEMPERATURE: f32 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrototypeClassifier {
    labels: Vec<String>,
    /// Mean RGB per class, in `[0, 1]`.
    centroids: Vec<[f32; 3]>,
    temperature: f32,
}

impl PrototypeClassifier {
    pub fn new(labels: Vec<String>, centroids: Vec<[f32; 3]>, temperature: f32) -> Result<Self, ModelError> {
        if labels.is_empty() || labels.len() != centroids.len() {
            return Err(ModelError::Unavailable(format!(
                "Prototype classifier needs one centroid per label ({} labels, {} centroids)",
                labels.len(),
                centroids.len()
            )));
        }
        if temperature <= 0.0 || !temperature.is_finite() {
            return Err(ModelError::Unavailable(format!(
                "Invalid softmax temperature {}",
                temperature
            )));
        }
        Ok(Self {
            labels,
            centroids,
            temperature,
        })
    }

    /// Builds the default soil classifier from the reference colour of each soil label.
    pub fn synthesize_soil() -> Self {
        let (labels, centroids) = SOIL_LABELS
            .iter()
            .filter_map(|label| {
                reference_color(label).map(|c| {
                    (
                        label.to_string(),
                        [
                            (c.red / 255.0) as f32,
                            (c.green / 255.0) as f32,
                            (c.blue / 255.0) as f32,
                        ],
                    )
                })
            })
            .unzip();

        Self {
            labels,
            centroids,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        if !path.exists() {
            return Err(ModelError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let load_error = |reason: String| ModelError::Load {
            path: path.to_path_buf(),
            reason,
        };

        let file = File::open(path).map_err(|e| load_error(e.to_string()))?;
        let model: PrototypeClassifier =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| load_error(e.to_string()))?;

        // Re-run the constructor checks on whatever was on disk
        let model = Self::new(model.labels, model.centroids, model.temperature)
            .map_err(|e| load_error(e.to_string()))?;

        info!("Loaded prototype classifier from {:?}", path);
        Ok(model)
    }

    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let save_error = |reason: String| ModelError::Load {
            path: path.to_path_buf(),
            reason,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_error(e.to_string()))?;
        }
        let file = File::create(path).map_err(|e| save_error(e.to_string()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self).map_err(|e| save_error(e.to_string()))
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl ImageClassifier for PrototypeClassifier {
    fn classify(&self, input: &ImageTensor) -> Result<Vec<f32>, ModelError> {
        if input.data().is_empty() {
            return Err(ModelError::Inference {
                reason: "Empty input tensor".to_string(),
            });
        }

        let means = input.channel_means();
        let scores: Vec<f32> = self
            .centroids
            .iter()
            .map(|centroid| {
                let distance: f32 = centroid
                    .iter()
                    .zip(means.iter())
                    .map(|(c, m)| (c - m).powi(2))
                    .sum();
                -distance / self.temperature
            })
            .collect();

        Ok(softmax(&scores))
    }

    fn name(&self) -> &str {
        "Colour Prototype"
    }

    fn version(&self) -> &str {
        "v1.0"
    }
}
