use crate::domain::errors::ModelError;
use crate::infrastructure::ImageTensor;

/// Interface for image classification models
pub trait ImageClassifier: Send + Sync {
    /// Score every class for a single normalized image.
    /// Output order matches the label list the model was trained with.
    fn classify(&self, input: &ImageTensor) -> Result<Vec<f32>, ModelError>;

    /// Get model name/type
    fn name(&self) -> &str;

    /// Get model version/id
    fn version(&self) -> &str;
}

/// A classifier together with the labels its outputs index into.
pub struct LoadedClassifier {
    pub classifier: Box<dyn ImageClassifier>,
    pub labels: Vec<String>,
}

impl std::fmt::Debug for LoadedClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedClassifier")
            .field("classifier", &self.classifier.name())
            .field("version", &self.classifier.version())
            .field("labels", &self.labels.len())
            .finish()
    }
}
