// Soil reference data and colour heuristic
pub mod soil;

// Plant disease labels
pub mod disease;

// Crop market price types
pub mod market;

// Weather observations and alerts
pub mod weather;

// Model input/output shapes
pub mod ml;

// Domain-specific error types
pub mod errors;
