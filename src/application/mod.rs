// Model wrappers (ONNX, SmartCore, colour prototype)
pub mod ml;

// Shared, lazily filled model slots
pub mod registry;

// Prediction services
pub mod disease_service;
pub mod price_service;
pub mod soil_service;
pub mod weather_service;

pub use registry::{ModelRegistry, RegistryStatus};
