//! Studio configuration loaded from `studio.toml`.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::AppError;
use crate::domain::generation::Dimensions;

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StudioConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub generation: GenerationSettings,
    #[serde(default)]
    pub paths: PathSettings,
    #[serde(default)]
    pub mock: MockSettings,
}

impl StudioConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.api.timeout_secs == 0 {
            return Err(AppError::InvalidConfig("api.timeout_secs must be greater than 0".into()));
        }
        let generation = &self.generation;
        if generation.max_count == 0 {
            return Err(AppError::InvalidConfig("generation.max_count must be at least 1".into()));
        }
        if generation.default_count == 0 || generation.default_count > generation.max_count {
            return Err(AppError::InvalidConfig(format!(
                "generation.default_count must be between 1 and {}",
                generation.max_count
            )));
        }
        if generation.concurrency == 0 {
            return Err(AppError::InvalidConfig(
                "generation.concurrency must be at least 1".into(),
            ));
        }
        if generation.width < 64 || generation.height < 64 {
            return Err(AppError::InvalidConfig(
                "generation.width and generation.height must be at least 64".into(),
            ));
        }
        if generation.max_photo_dimension < 64 {
            return Err(AppError::InvalidConfig(
                "generation.max_photo_dimension must be at least 64".into(),
            ));
        }
        if !generation.min_sharpness.is_finite() || generation.min_sharpness < 0.0 {
            return Err(AppError::InvalidConfig(
                "generation.min_sharpness must be a non-negative number".into(),
            ));
        }
        if generation.model.trim().is_empty() {
            return Err(AppError::InvalidConfig("generation.model must not be empty".into()));
        }
        for (key, value) in [
            ("paths.output_dir", &self.paths.output_dir),
            ("paths.temp_dir", &self.paths.temp_dir),
            ("paths.logs_dir", &self.paths.logs_dir),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::InvalidConfig(format!("{} must not be empty", key)));
            }
        }
        Ok(())
    }
}

/// Image generation API endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub url: Url,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { url: default_api_url(), timeout_secs: default_timeout() }
    }
}

fn default_api_url() -> Url {
    Url::parse("https://ark.cn-beijing.volces.com/api/v3/images/generations")
        .expect("Default API URL must be valid")
}

fn default_timeout() -> u64 {
    120
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationSettings {
    #[serde(default = "default_count")]
    pub default_count: u32,
    #[serde(default = "default_max_count")]
    pub max_count: u32,
    #[serde(default = "default_side")]
    pub width: u32,
    #[serde(default = "default_side")]
    pub height: u32,
    #[serde(default = "default_model")]
    pub model: String,
    /// Upper bound on in-flight API calls.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Reference photos are downscaled so their longer edge fits this.
    #[serde(default = "default_side")]
    pub max_photo_dimension: u32,
    /// Generated images narrower or shorter than this are rejected.
    #[serde(default = "default_min_image_side")]
    pub min_image_side: u32,
    /// Minimum Laplacian variance of a generated image; `0` disables the blur check.
    #[serde(default = "default_min_sharpness")]
    pub min_sharpness: f64,
}

impl GenerationSettings {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions { width: self.width, height: self.height }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            default_count: default_count(),
            max_count: default_max_count(),
            width: default_side(),
            height: default_side(),
            model: default_model(),
            concurrency: default_concurrency(),
            max_photo_dimension: default_side(),
            min_image_side: default_min_image_side(),
            min_sharpness: default_min_sharpness(),
        }
    }
}

fn default_count() -> u32 {
    1
}

fn default_max_count() -> u32 {
    10
}

fn default_side() -> u32 {
    2048
}

fn default_model() -> String {
    "doubao-seedream-4-5-251128".to_string()
}

fn default_concurrency() -> usize {
    3
}

fn default_min_image_side() -> u32 {
    512
}

fn default_min_sharpness() -> f64 {
    30.0
}

/// Directories relative to the studio home unless absolute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathSettings {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_temp_dir")]
    pub temp_dir: String,
    #[serde(default = "default_logs_dir")]
    pub logs_dir: String,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            temp_dir: default_temp_dir(),
            logs_dir: default_logs_dir(),
        }
    }
}

fn default_output_dir() -> String {
    "output/images".to_string()
}

fn default_temp_dir() -> String {
    "temp".to_string()
}

fn default_logs_dir() -> String {
    "logs".to_string()
}

/// Local stand-in for the generation API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MockSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub delay_ms: u64,
    /// Zero-based request indices that fail with a network error.
    #[serde(default)]
    pub fail_indices: Vec<usize>,
}
