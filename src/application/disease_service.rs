//! PlantDoc leaf disease classification.
//!
//! Unlike soil, there is no heuristic tier: without a model the endpoint
//! reports an error body.

use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

use crate::application::ml::{ImageClassifier, LoadedClassifier, OnnxClassifier};
use crate::domain::disease::{FALLBACK_CLASS_NAMES, HealthStatus};
use crate::domain::errors::ModelError;
use crate::domain::market::round_to;
use crate::domain::ml::classification::ClassificationResult;
use crate::infrastructure::datasets::read_labels;
use crate::infrastructure::image_preprocessing::{DISEASE_INPUT_SIZE, decode_image, to_tensor};

/// Tried in order; the first one that loads wins.
pub const CANDIDATE_MODEL_FILES: [&str; 5] = [
    "plantdoc_optimized_v2.onnx",
    "plantdoc_optimized_ema.onnx",
    "plantdoc_optimized.onnx",
    "plantdoc_best.onnx",
    "best_plantdoc_model.onnx",
];
pub const LABELS_FILE: &str = "plantdoc_class_names.json";

const UNABLE_TO_PREDICT: &str = "Unable to predict";

pub fn load_disease_classifier(models_dir: &Path) -> Result<LoadedClassifier, ModelError> {
    let mut last_error = None;
    let mut classifier = None;

    for file in CANDIDATE_MODEL_FILES {
        let path = models_dir.join(file);
        if !path.exists() {
            continue;
        }
        match OnnxClassifier::load(&path) {
            Ok(model) => {
                classifier = Some(model);
                break;
            }
            Err(e) => {
                warn!("Plant disease model {:?} failed to load: {}", path, e);
                last_error = Some(e);
            }
        }
    }

    let classifier = match classifier {
        Some(model) => model,
        None => {
            return Err(last_error.unwrap_or_else(|| {
                ModelError::Unavailable("No plant disease models found".to_string())
            }));
        }
    };

    let labels = disease_labels(models_dir);
    info!(
        "Plant disease classifier ready: {:?} ({} classes)",
        classifier.model_path(),
        labels.len()
    );
    Ok(LoadedClassifier {
        classifier: Box::new(classifier),
        labels,
    })
}

/// Labels from the label file, or the built-in PlantDoc list.
pub fn disease_labels(models_dir: &Path) -> Vec<String> {
    let path = models_dir.join(LABELS_FILE);
    match read_labels(&path) {
        Ok(labels) => labels,
        Err(e) => {
            warn!("Using built-in PlantDoc labels: {}", e);
            FALLBACK_CLASS_NAMES.iter().map(|s| s.to_string()).collect()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DiseaseResponse {
    Diagnosed {
        class: String,
        /// Probability in `[0, 1]`, 4 decimals.
        confidence: f64,
        status: HealthStatus,
    },
    Failed {
        error: String,
        prediction: String,
        confidence: f64,
    },
}

impl DiseaseResponse {
    pub fn failed(reason: impl std::fmt::Display) -> Self {
        DiseaseResponse::Failed {
            error: format!("Plant disease prediction failed: {}", reason),
            prediction: UNABLE_TO_PREDICT.to_string(),
            confidence: 0.0,
        }
    }
}

pub fn predict_disease(classifier: Result<&LoadedClassifier, &ModelError>, bytes: &[u8]) -> DiseaseResponse {
    let loaded = match classifier {
        Ok(loaded) => loaded,
        Err(e) => return DiseaseResponse::failed(e),
    };

    let image = match decode_image(bytes) {
        Ok(image) => image,
        Err(e) => return DiseaseResponse::failed(e),
    };

    let tensor = to_tensor(&image, DISEASE_INPUT_SIZE);
    let result = loaded
        .classifier
        .classify(&tensor)
        .and_then(|scores| ClassificationResult::from_scores(&scores, &loaded.labels));

    match result {
        Ok(result) => {
            let status = HealthStatus::for_label(&result.label);
            info!(
                "Plant disease prediction: {} ({:.4}) {}",
                result.label,
                result.probability(),
                status
            );
            DiseaseResponse::Diagnosed {
                confidence: round_to(result.probability(), 4),
                class: result.label,
                status,
            }
        }
        Err(e) => DiseaseResponse::failed(e),
    }
}
