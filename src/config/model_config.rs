//! Model artifact locations.

use std::env;
use std::path::PathBuf;

/// Model environment configuration
#[derive(Debug, Clone)]
pub struct ModelEnvConfig {
    pub models_dir: PathBuf,
    /// Build and persist a prototype soil classifier when no trained one exists.
    pub soil_synthesize_fallback: bool,
}

impl Default for ModelEnvConfig {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("models"),
            soil_synthesize_fallback: true,
        }
    }
}

impl ModelEnvConfig {
    pub fn from_env() -> Self {
        Self {
            models_dir: env::var("MODELS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("models")),
            soil_synthesize_fallback: env::var("SOIL_SYNTHESIZE_FALLBACK")
                .unwrap_or_else(|_| "true".to_string())
                .parse::<bool>()
                .unwrap_or(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_config_defaults() {
        let config = ModelEnvConfig::default();
        assert_eq!(config.models_dir, PathBuf::from("models"));
        assert!(config.soil_synthesize_fallback);
    }
}
