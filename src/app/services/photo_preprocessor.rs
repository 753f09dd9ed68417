//! Reference photo validation and normalization.

use std::fs;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::adapters::persist::write_atomically;
use crate::domain::{AppError, PhotoBounds};

const JPEG_QUALITY: u8 = 95;

/// Validates reference photos and writes normalized JPEG copies.
#[derive(Debug, Clone)]
pub struct PhotoPreprocessor {
    temp_dir: PathBuf,
    max_dimension: u32,
}

impl PhotoPreprocessor {
    pub fn new(temp_dir: impl Into<PathBuf>, max_dimension: u32) -> Self {
        Self { temp_dir: temp_dir.into(), max_dimension }
    }

    /// Normalize `photo_paths` in order, failing on the first invalid photo.
    ///
    /// The count is checked against `bounds` before any file is read.
    pub fn prepare(
        &self,
        scenario: &str,
        bounds: PhotoBounds,
        photo_paths: &[PathBuf],
    ) -> Result<Vec<PathBuf>, AppError> {
        bounds.check(scenario, photo_paths.len())?;
        photo_paths
            .iter()
            .enumerate()
            .map(|(position, path)| self.normalize(position, path))
            .collect()
    }

    fn normalize(&self, position: usize, path: &Path) -> Result<PathBuf, AppError> {
        let invalid = |reason: String| AppError::InvalidPhoto { path: path.to_path_buf(), reason };

        if !path.is_file() {
            return Err(invalid("file not found".into()));
        }
        let bytes = fs::read(path).map_err(|e| invalid(e.to_string()))?;
        let image = image::load_from_memory(&bytes).map_err(|e| invalid(e.to_string()))?;

        let image = if image.width().max(image.height()) > self.max_dimension {
            debug!(
                path = %path.display(),
                width = image.width(),
                height = image.height(),
                max = self.max_dimension,
                "downscaling reference photo"
            );
            image.resize(self.max_dimension, self.max_dimension, FilterType::Lanczos3)
        } else {
            image
        };

        let encoded = encode_jpeg(&image).map_err(|e| invalid(e.to_string()))?;
        let target = self.temp_dir.join(normalized_name(position, &bytes));
        write_atomically(&target, &encoded)?;
        Ok(target)
    }
}

/// `photo_<NN>_<hash8>.jpg`; unique per input position, independent of the source name.
fn normalized_name(position: usize, source: &[u8]) -> String {
    let digest = Sha256::digest(source);
    let hash: String = digest.iter().take(4).map(|byte| format!("{:02x}", byte)).collect();
    format!("photo_{:02}_{}.jpg", position + 1, hash)
}

fn encode_jpeg(image: &DynamicImage) -> image::ImageResult<Vec<u8>> {
    let rgb = image.to_rgb8();
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY).encode_image(&rgb)?;
    Ok(bytes)
}
