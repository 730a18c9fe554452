pub mod charts;
pub mod datasets;
pub mod image_preprocessing;

pub use image_preprocessing::ImageTensor;
