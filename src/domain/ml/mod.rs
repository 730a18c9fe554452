pub mod classification;
pub mod feature_registry;
