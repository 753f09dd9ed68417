use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::AppError;
use super::prompt::ComposedPrompt;

/// Output image size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// `"WxH"` as the generation API expects it.
    pub fn size_param(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

/// Classified reason a single image could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationFailure {
    #[error("network failure: {0}")]
    NetworkFailure(String),

    #[error("rate limited by the API: {0}")]
    RateLimited(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("request timed out")]
    Timeout,

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("quality check failed: {0}")]
    QualityCheck(String),

    #[error("failed to save image: {0}")]
    Persist(String),

    #[error("task aborted: {0}")]
    Aborted(String),
}

/// Everything the pipeline needs for one invocation.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    reference_photos: Vec<PathBuf>,
    prompts: Vec<ComposedPrompt>,
    output_count: usize,
    dimensions: Dimensions,
    model: String,
    file_stem: String,
}

impl GenerationRequest {
    pub fn new(
        reference_photos: Vec<PathBuf>,
        prompts: Vec<ComposedPrompt>,
        output_count: usize,
        dimensions: Dimensions,
        model: impl Into<String>,
        file_stem: impl Into<String>,
    ) -> Result<Self, AppError> {
        if prompts.is_empty() {
            return Err(AppError::InvalidArgument("at least one prompt is required".into()));
        }
        if output_count == 0 {
            return Err(AppError::InvalidOutputCount { max: u32::MAX, actual: 0 });
        }
        Ok(Self {
            reference_photos,
            prompts,
            output_count,
            dimensions,
            model: model.into(),
            file_stem: file_stem.into(),
        })
    }

    pub fn reference_photos(&self) -> &[PathBuf] {
        &self.reference_photos
    }

    pub fn prompts(&self) -> &[ComposedPrompt] {
        &self.prompts
    }

    /// Prompt for output `index`; prompts are cycled when there are fewer than outputs.
    pub fn prompt_for(&self, index: usize) -> &ComposedPrompt {
        &self.prompts[index % self.prompts.len()]
    }

    pub fn output_count(&self) -> usize {
        self.output_count
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn file_stem(&self) -> &str {
        &self.file_stem
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Success { path: PathBuf },
    Failure { reason: GenerationFailure },
}

/// Outcome of one requested output, identified by its request index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub index: usize,
    pub outcome: GenerationOutcome,
}

impl GenerationResult {
    pub fn success(index: usize, path: PathBuf) -> Self {
        Self { index, outcome: GenerationOutcome::Success { path } }
    }

    pub fn failure(index: usize, reason: GenerationFailure) -> Self {
        Self { index, outcome: GenerationOutcome::Failure { reason } }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, GenerationOutcome::Success { .. })
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.outcome {
            GenerationOutcome::Success { path } => Some(path),
            GenerationOutcome::Failure { .. } => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&GenerationFailure> {
        match &self.outcome {
            GenerationOutcome::Success { .. } => None,
            GenerationOutcome::Failure { reason } => Some(reason),
        }
    }
}

/// Success/failure tally over a set of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationSummary {
    pub requested: usize,
    pub succeeded: usize,
}

impl GenerationSummary {
    pub fn from_results(results: &[GenerationResult]) -> Self {
        Self {
            requested: results.len(),
            succeeded: results.iter().filter(|r| r.is_success()).count(),
        }
    }

    pub fn failed(&self) -> usize {
        self.requested - self.succeeded
    }

    pub fn is_complete(&self) -> bool {
        self.succeeded == self.requested
    }
}
