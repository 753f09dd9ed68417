//! Shared testing utilities for photo-studio CLI tests.

use assert_cmd::Command;
use image::{Rgb, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Small images keep mock generation fast.
const SMALL_CONFIG: &str = "[generation]\nwidth = 64\nheight = 64\nmax_photo_dimension = 256\n";

/// Testing harness providing an isolated studio home for CLI exercises.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
}

#[allow(dead_code)]
impl TestContext {
    /// Create a new isolated studio home with a small-image configuration.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let ctx = Self { root };
        ctx.write_config(SMALL_CONFIG);
        ctx
    }

    /// Absolute path to the studio home.
    pub fn home(&self) -> &Path {
        self.root.path()
    }

    pub fn output_dir(&self) -> PathBuf {
        self.home().join("output").join("images")
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.home().join("temp")
    }

    /// Replace `studio.toml`.
    pub fn write_config(&self, content: &str) {
        fs::write(self.home().join("studio.toml"), content).expect("Failed to write studio.toml");
    }

    /// Build a command for the compiled binary bound to this studio home.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("photo-studio").expect("Failed to locate photo-studio binary");
        cmd.current_dir(self.home())
            .env("PHOTO_STUDIO_HOME", self.home())
            .env_remove("ARK_API_KEY")
            .env_remove("MOCK_API")
            .env_remove("PHOTO_STUDIO_LOG");
        cmd
    }

    /// Write a solid-colour photo under `photos/<relative>`.
    pub fn write_photo(&self, relative: &str, width: u32, height: u32) -> PathBuf {
        let path = self.home().join("photos").join(relative);
        fs::create_dir_all(path.parent().expect("photo path has a parent"))
            .expect("Failed to create photo directory");
        RgbImage::from_pixel(width, height, Rgb([180, 140, 110]))
            .save(&path)
            .expect("Failed to write test photo");
        path
    }

    /// Files directly inside `dir`, sorted.
    pub fn files_in(&self, dir: &Path) -> Vec<PathBuf> {
        if !dir.exists() {
            return Vec::new();
        }
        let mut files: Vec<PathBuf> = fs::read_dir(dir)
            .expect("Failed to read directory")
            .map(|entry| entry.expect("Failed to read entry").path())
            .filter(|path| path.is_file())
            .collect();
        files.sort();
        files
    }
}
