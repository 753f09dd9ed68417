//! Size and sharpness checks applied to generated images before they count.

use image::{DynamicImage, GenericImageView, imageops};

use crate::domain::GenerationFailure;
use crate::domain::configuration::GenerationSettings;

/// Quarter-scale 4-neighbour Laplacian, so responses on `[0, 1]` luma fit in `[-1, 1]`.
const LAPLACIAN: [f32; 9] = [0.0, 0.25, 0.0, 0.25, -1.0, 0.25, 0.0, 0.25, 0.0];
const NEGATED_LAPLACIAN: [f32; 9] = [0.0, -0.25, 0.0, -0.25, 1.0, -0.25, 0.0, -0.25, 0.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityGate {
    pub min_side: u32,
    pub min_sharpness: f64,
}

impl QualityGate {
    pub fn from_settings(settings: &GenerationSettings) -> Self {
        Self { min_side: settings.min_image_side, min_sharpness: settings.min_sharpness }
    }

    pub fn check(&self, image: &DynamicImage) -> Result<(), GenerationFailure> {
        let (width, height) = image.dimensions();
        if width < self.min_side || height < self.min_side {
            return Err(GenerationFailure::QualityCheck(format!(
                "image too small: {}x{} (minimum {} px per side)",
                width, height, self.min_side
            )));
        }
        if self.min_sharpness > 0.0 {
            let variance = sharpness(image);
            if variance < self.min_sharpness {
                return Err(GenerationFailure::QualityCheck(format!(
                    "image looks blurry: sharpness {:.2} below {}",
                    variance, self.min_sharpness
                )));
            }
        }
        Ok(())
    }
}

/// Variance of the Laplacian of the grayscale image, on a 0-255 intensity scale.
///
/// `filter3x3` clamps its output to the pixel range, so the positive and
/// negative responses are filtered separately and recombined. Border pixels
/// are left out.
pub fn sharpness(image: &DynamicImage) -> f64 {
    let gray = image.to_luma32f();
    let (width, height) = gray.dimensions();
    if width < 3 || height < 3 {
        return 0.0;
    }
    let rising = imageops::filter3x3(&gray, &LAPLACIAN);
    let falling = imageops::filter3x3(&gray, &NEGATED_LAPLACIAN);

    let (mut count, mut sum, mut sum_sq) = (0f64, 0f64, 0f64);
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let response = f64::from(rising.get_pixel(x, y)[0]) - f64::from(falling.get_pixel(x, y)[0]);
            let value = response * 4.0 * 255.0;
            count += 1.0;
            sum += value;
            sum_sq += value * value;
        }
    }
    let mean = sum / count;
    (sum_sq / count - mean * mean).max(0.0)
}
