//! Local stand-in for the generation API.

use std::collections::BTreeSet;
use std::io::Cursor;
use std::thread;
use std::time::Duration;

use image::{ImageFormat, Rgb, RgbImage};

use crate::domain::GenerationFailure;
use crate::domain::configuration::MockSettings;
use crate::ports::{GeneratedImage, ImageCall, ImageClient};

const BASE_COLOR: [u8; 3] = [100, 150, 200];

/// Produces a solid-colour JPEG of the requested size after an optional delay.
#[derive(Debug, Clone, Default)]
pub struct MockImageClient {
    delay: Duration,
    fail_indices: BTreeSet<usize>,
}

impl MockImageClient {
    pub fn new(settings: &MockSettings) -> Self {
        Self {
            delay: Duration::from_millis(settings.delay_ms),
            fail_indices: settings.fail_indices.iter().copied().collect(),
        }
    }
}

impl ImageClient for MockImageClient {
    fn generate(&self, call: &ImageCall<'_>) -> Result<GeneratedImage, GenerationFailure> {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        if self.fail_indices.contains(&call.index) {
            return Err(GenerationFailure::NetworkFailure(format!(
                "mock failure forced for image {}",
                call.index + 1
            )));
        }

        // Shift the blue channel per index so outputs are distinguishable.
        let shade = (call.index as u8).wrapping_mul(16);
        let [r, g, b] = BASE_COLOR;
        let pixels = RgbImage::from_pixel(
            call.size.width,
            call.size.height,
            Rgb([r, g, b.wrapping_add(shade)]),
        );
        let mut bytes = Vec::new();
        pixels
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
            .map_err(|e| GenerationFailure::MalformedResponse(e.to_string()))?;
        Ok(GeneratedImage { bytes })
    }

    fn produces_placeholders(&self) -> bool {
        true
    }
}
