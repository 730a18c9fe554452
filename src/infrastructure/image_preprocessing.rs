//! Image decoding and tensor preparation for the image classifiers.
//!
//! Classifiers were exported from Keras, so tensors are laid out NHWC
//! (`[1, height, width, 3]`) with pixel values scaled to `[0, 1]`.

use image::{DynamicImage, imageops::FilterType};
use ndarray::Array4;

use crate::domain::errors::ImageError;
use crate::domain::soil::ColorStats;

/// Input resolution of the soil classifiers.
pub const SOIL_INPUT_SIZE: u32 = 180;
/// Input resolution of the plant disease classifiers.
pub const DISEASE_INPUT_SIZE: u32 = 224;

const CHANNELS: usize = 3;

/// A normalized single-image batch ready for inference.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    data: Vec<f32>,
    height: usize,
    width: usize,
}

impl ImageTensor {
    pub fn shape(&self) -> Vec<usize> {
        vec![1, self.height, self.width, CHANNELS]
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mean value per RGB channel, in `[0, 1]`.
    pub fn channel_means(&self) -> [f32; 3] {
        let mut sums = [0f64; CHANNELS];
        for pixel in self.data.chunks_exact(CHANNELS) {
            for (sum, value) in sums.iter_mut().zip(pixel) {
                *sum += f64::from(*value);
            }
        }
        let count = (self.height * self.width).max(1) as f64;
        [
            (sums[0] / count) as f32,
            (sums[1] / count) as f32,
            (sums[2] / count) as f32,
        ]
    }
}

pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::Empty);
    }

    let image = image::load_from_memory(bytes).map_err(|e| ImageError::Decode {
        reason: e.to_string(),
    })?;

    if image.width() == 0 || image.height() == 0 {
        return Err(ImageError::Empty);
    }
    Ok(image)
}

/// Resizes to `size`×`size` and scales pixels to `[0, 1]`.
pub fn to_tensor(image: &DynamicImage, size: u32) -> ImageTensor {
    let resized = image.resize_exact(size, size, FilterType::Triangle).to_rgb8();
    let side = size as usize;

    let mut tensor = Array4::<f32>::zeros((1, side, side, CHANNELS));
    for (x, y, pixel) in resized.enumerate_pixels() {
        for c in 0..CHANNELS {
            tensor[[0, y as usize, x as usize, c]] = f32::from(pixel[c]) / 255.0;
        }
    }

    ImageTensor {
        data: tensor.into_raw_vec(),
        height: side,
        width: side,
    }
}

/// Average colour of the image at its original resolution, on the 0-255 scale.
pub fn mean_color(image: &DynamicImage) -> Result<ColorStats, ImageError> {
    let rgb = image.to_rgb8();
    let count = u64::from(rgb.width()) * u64::from(rgb.height());
    if count == 0 {
        return Err(ImageError::Empty);
    }

    let mut sums = [0u64; CHANNELS];
    for pixel in rgb.pixels() {
        for (sum, value) in sums.iter_mut().zip(pixel.0) {
            *sum += u64::from(value);
        }
    }

    let count = count as f64;
    Ok(ColorStats {
        red: sums[0] as f64 / count,
        green: sums[1] as f64 / count,
        blue: sums[2] as f64 / count,
    })
}
