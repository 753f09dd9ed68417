use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};

/// Write a solid-colour image; the format follows the file extension.
pub fn write_test_photo(path: &Path, width: u32, height: u32, color: [u8; 3]) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    RgbImage::from_pixel(width, height, Rgb(color)).save(path).unwrap();
    path.to_path_buf()
}
