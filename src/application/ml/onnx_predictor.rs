use super::predictor::ImageClassifier;
use crate::domain::errors::ModelError;
use crate::infrastructure::ImageTensor;
use ort::session::Session;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{error, info};

/// Keras image classifier exported to ONNX.
pub struct OnnxClassifier {
    session: Mutex<Session>,
    model_path: PathBuf,
}

impl OnnxClassifier {
    pub fn load(model_path: &Path) -> Result<Self, ModelError> {
        if !model_path.exists() {
            return Err(ModelError::NotFound {
                path: model_path.to_path_buf(),
            });
        }

        let load_error = |reason: String| ModelError::Load {
            path: model_path.to_path_buf(),
            reason,
        };

        let builder = Session::builder().map_err(|e| {
            error!("Failed to create ONNX session builder: {}", e);
            load_error(e.to_string())
        })?;
        let session = builder.commit_from_file(model_path).map_err(|e| {
            error!("Failed to load ONNX model {:?}: {}", model_path, e);
            load_error(e.to_string())
        })?;

        info!("Successfully loaded ONNX model from {:?}", model_path);
        Ok(Self {
            session: Mutex::new(session),
            model_path: model_path.to_path_buf(),
        })
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl ImageClassifier for OnnxClassifier {
    fn classify(&self, input: &ImageTensor) -> Result<Vec<f32>, ModelError> {
        let inference_error = |reason: String| ModelError::Inference { reason };

        let mut session = self
            .session
            .lock()
            .map_err(|e| inference_error(format!("Mutex lock failed: {}", e)))?;

        let shape = input.shape();
        let input_value = ort::value::Value::from_array((shape.as_slice(), input.data().to_vec()))
            .map_err(|e| inference_error(format!("Input value creation failed: {}", e)))?;

        let inputs = ort::inputs![input_value];

        let outputs = session
            .run(inputs)
            .map_err(|e| inference_error(e.to_string()))?;
        let output_value = outputs
            .iter()
            .next()
            .map(|(_, v)| v)
            .ok_or_else(|| inference_error("No output found".to_string()))?;
        let data = output_value
            .try_extract_tensor::<f32>()
            .map_err(|e| inference_error(e.to_string()))?;

        Ok(data.1.to_vec())
    }

    fn name(&self) -> &str {
        "ONNX Runtime (Keras CNN)"
    }

    fn version(&self) -> &str {
        self.model_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
    }
}
