// Model wrappers behind the prediction services
pub mod onnx_predictor;
pub mod predictor;
pub mod prototype_predictor;
pub mod smartcore_predictor;

pub use onnx_predictor::OnnxClassifier;
pub use predictor::{ImageClassifier, LoadedClassifier};
pub use prototype_predictor::PrototypeClassifier;
pub use smartcore_predictor::ForestRegressor;
