use std::path::{Path, PathBuf};

use super::studio_config::PathSettings;

/// Environment variable pointing at the studio home directory.
pub const HOME_ENV: &str = "PHOTO_STUDIO_HOME";

/// Root directory holding configuration, custom templates and outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudioHome {
    root: PathBuf,
}

impl StudioHome {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("studio.toml")
    }

    pub fn custom_templates_file(&self) -> PathBuf {
        self.root.join("data").join("custom_templates.yml")
    }

    /// Resolve a configured directory against the home unless absolute.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() { path.to_path_buf() } else { self.root.join(path) }
    }

    pub fn dirs(&self, paths: &PathSettings) -> StudioDirs {
        StudioDirs {
            output: self.resolve(&paths.output_dir),
            temp: self.resolve(&paths.temp_dir),
            logs: self.resolve(&paths.logs_dir),
        }
    }
}

/// Resolved working directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudioDirs {
    pub output: PathBuf,
    pub temp: PathBuf,
    pub logs: PathBuf,
}
