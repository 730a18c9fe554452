//! Soil classification with a tiered fallback chain.
//!
//! Tiers, best first:
//! 1. trained classifier (ONNX primary, ONNX fallback, or colour prototype)
//! 2. colour heuristic over the mean RGB of the upload
//! 3. generic "Mixed Soil" advice when the image cannot be decoded
//!
//! A request that carries no image at all gets the "Analysis Error" response.

use rand::Rng;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, error, info, warn};

use crate::application::ml::{ImageClassifier, LoadedClassifier, OnnxClassifier, PrototypeClassifier};
use crate::domain::errors::ModelError;
use crate::domain::ml::classification::ClassificationResult;
use crate::domain::soil::{
    ANALYSIS_ERROR, ANALYSIS_ERROR_PROFILE, MIXED, MIXED_PROFILE, SOIL_LABELS, SoilProfile,
    classify_by_color, profile_for,
};
use crate::infrastructure::datasets::{read_labels, write_labels};
use crate::infrastructure::image_preprocessing::{SOIL_INPUT_SIZE, decode_image, mean_color, to_tensor};

pub const PRIMARY_MODEL_FILE: &str = "soil_classifier.onnx";
pub const FALLBACK_MODEL_FILE: &str = "soil_classifier_fallback.onnx";
pub const PROTOTYPE_MODEL_FILE: &str = "soil_classifier_fallback.json";
pub const LABELS_FILE: &str = "class_names.json";

const HEURISTIC_NOTES_PREFIX: &str = "Basic Visual Analysis: ";
const HEURISTIC_WARNING: &str = "AI model unavailable - using basic visual analysis";
const UNAVAILABLE_WARNING: &str = "Service temporarily unavailable";
const ERROR_WARNING: &str = "Image processing failed";

/// Loads the best available soil classifier from `models_dir`.
///
/// The prototype is only synthesized when neither fallback artifact exists;
/// a fallback file that is present but broken is reported, not overwritten.
pub fn load_soil_classifier(models_dir: &Path, synthesize: bool) -> Result<LoadedClassifier, ModelError> {
    let labels_path = models_dir.join(LABELS_FILE);

    let mut last_error = None;
    for file in [PRIMARY_MODEL_FILE, FALLBACK_MODEL_FILE] {
        let path = models_dir.join(file);
        if !path.exists() {
            debug!("Soil model {:?} not present", path);
            continue;
        }
        match load_onnx_with_labels(&path, &labels_path) {
            Ok(loaded) => {
                info!("Soil classifier ready: {:?}", path);
                return Ok(loaded);
            }
            Err(e) => {
                warn!("Soil model {:?} failed to load: {}", path, e);
                last_error = Some(e);
            }
        }
    }

    let prototype_path = models_dir.join(PROTOTYPE_MODEL_FILE);
    if prototype_path.exists() {
        let model = PrototypeClassifier::load(&prototype_path)?;
        let labels = model.labels().to_vec();
        info!("Soil classifier ready: {:?}", prototype_path);
        return Ok(LoadedClassifier {
            classifier: Box::new(model),
            labels,
        });
    }

    let fallback_onnx_present = models_dir.join(FALLBACK_MODEL_FILE).exists();
    if !synthesize || fallback_onnx_present {
        return Err(last_error.unwrap_or_else(|| {
            ModelError::Unavailable(format!("No soil classifier found in {:?}", models_dir))
        }));
    }

    warn!(
        "No trained soil classifier in {:?}, synthesizing colour prototype",
        models_dir
    );
    let model = PrototypeClassifier::synthesize_soil();
    model.save(&prototype_path)?;
    if !labels_path.exists() {
        write_labels(&labels_path, model.labels())?;
    }
    info!("Persisted synthesized soil classifier to {:?}", prototype_path);

    let labels = model.labels().to_vec();
    Ok(LoadedClassifier {
        classifier: Box::new(model),
        labels,
    })
}

fn load_onnx_with_labels(model_path: &Path, labels_path: &Path) -> Result<LoadedClassifier, ModelError> {
    let labels = read_labels(labels_path)?;
    for unknown in labels.iter().filter(|l| !is_known_soil(l)) {
        warn!("Soil label {:?} in {:?} has no agronomic profile", unknown, labels_path);
    }
    let classifier = OnnxClassifier::load(model_path)?;
    Ok(LoadedClassifier {
        classifier: Box::new(classifier),
        labels,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SoilStatus {
    Success,
    FallbackAnalysis,
    ServiceUnavailable,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoilResponse {
    pub prediction: String,
    pub confidence: f64,
    pub notes: String,
    pub crops: Vec<String>,
    pub care: Vec<String>,
    pub status: SoilStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl SoilResponse {
    fn new(label: &str, confidence: f64, profile: SoilProfile, status: SoilStatus) -> Self {
        Self {
            prediction: label.to_string(),
            confidence,
            notes: profile.notes.to_string(),
            crops: profile.crops.iter().map(|c| c.to_string()).collect(),
            care: profile.care.iter().map(|c| c.to_string()).collect(),
            status,
            warning: None,
        }
    }

    fn with_warning(mut self, warning: &str) -> Self {
        self.warning = Some(warning.to_string());
        self
    }

    /// Undecodable upload.
    pub fn unavailable() -> Self {
        Self::new(MIXED, 50.0, MIXED_PROFILE, SoilStatus::ServiceUnavailable)
            .with_warning(UNAVAILABLE_WARNING)
    }

    /// No image in the request.
    pub fn analysis_error() -> Self {
        Self::new(ANALYSIS_ERROR, 0.0, ANALYSIS_ERROR_PROFILE, SoilStatus::Error)
            .with_warning(ERROR_WARNING)
    }
}

/// Classifies one uploaded soil image. Never fails; degrades through the tiers.
///
/// `classifier` is `Err` when no model could be loaded for this request.
pub fn predict_soil(classifier: Result<&LoadedClassifier, &ModelError>, bytes: &[u8]) -> SoilResponse {
    let image = match decode_image(bytes) {
        Ok(image) => image,
        Err(e) => {
            error!("Soil image could not be decoded: {}", e);
            return SoilResponse::unavailable();
        }
    };

    let model_error = match classifier {
        Ok(loaded) => {
            let tensor = to_tensor(&image, SOIL_INPUT_SIZE);
            let result = loaded
                .classifier
                .classify(&tensor)
                .and_then(|scores| ClassificationResult::from_scores(&scores, &loaded.labels));
            match result {
                Ok(result) => {
                    info!(
                        "Soil prediction: {} ({:.2}%) via {}",
                        result.label,
                        result.confidence,
                        loaded.classifier.name()
                    );
                    return SoilResponse::new(
                        &result.label,
                        result.confidence,
                        profile_for(&result.label),
                        SoilStatus::Success,
                    );
                }
                Err(e) => e.to_string(),
            }
        }
        Err(e) => e.to_string(),
    };

    warn!("Soil classifier unavailable ({}), using colour heuristic", model_error);
    match mean_color(&image) {
        Ok(stats) => {
            let label = classify_by_color(stats);
            let confidence = rand::rng().random_range(60.0..80.0);
            let mut response =
                SoilResponse::new(label, confidence, profile_for(label), SoilStatus::FallbackAnalysis)
                    .with_warning(HEURISTIC_WARNING);
            response.notes = format!("{}{}", HEURISTIC_NOTES_PREFIX, response.notes);
            response
        }
        Err(e) => {
            error!("Colour analysis failed: {}", e);
            SoilResponse::unavailable()
        }
    }
}

/// True when `label` is one of the four trained soil classes.
pub fn is_known_soil(label: &str) -> bool {
    SOIL_LABELS.contains(&label)
}
