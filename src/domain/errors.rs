use std::path::PathBuf;
use thiserror::Error;

/// Errors related to loading and running prediction models
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Model artifact not found: {path:?}")]
    NotFound { path: PathBuf },

    #[error("Failed to load model from {path:?}: {reason}")]
    Load { path: PathBuf, reason: String },

    #[error("Invalid label file {path:?}: {reason}")]
    Labels { path: PathBuf, reason: String },

    #[error("Inference failed: {reason}")]
    Inference { reason: String },

    #[error("{0}")]
    Unavailable(String),
}

/// Errors related to decoding and preprocessing uploaded images
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Failed to decode image: {reason}")]
    Decode { reason: String },

    #[error("Image has no pixels")]
    Empty,
}

/// Errors related to building a price or weather forecast
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Failed to read dataset {path:?}: {reason}")]
    Dataset { path: PathBuf, reason: String },

    #[error("Column '{column}' has no usable values")]
    EmptyColumn { column: String },

    #[error("Forecast horizon of {days} days is shorter than one week")]
    EmptyHorizon { days: i64 },

    #[error("Forecast horizon of {days} days runs past the supported calendar")]
    HorizonOutOfRange { days: i64 },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Failed to render chart {path:?}: {reason}")]
    Chart { path: PathBuf, reason: String },
}

/// Errors related to reading multipart uploads
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file uploaded")]
    MissingFile,

    #[error("Failed to read upload: {reason}")]
    Read { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_error_formatting() {
        let error = ModelError::Load {
            path: PathBuf::from("models/soil_classifier.onnx"),
            reason: "bad graph".to_string(),
        };

        let msg = error.to_string();
        assert!(msg.contains("soil_classifier.onnx"));
        assert!(msg.contains("bad graph"));
    }

    #[test]
    fn test_forecast_error_wraps_model_error() {
        let error: ForecastError = ModelError::NotFound {
            path: PathBuf::from("models/onion_model.json"),
        }
        .into();

        assert!(error.to_string().contains("onion_model.json"));
    }
}
