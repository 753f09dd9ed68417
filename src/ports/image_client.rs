//! Image generation client port definition.

use crate::domain::{Dimensions, GenerationFailure};

/// One image-to-image generation call.
#[derive(Debug, Clone)]
pub struct ImageCall<'a> {
    /// Request index this call fills.
    pub index: usize,
    pub model: &'a str,
    pub prompt: &'a str,
    pub negative_prompt: &'a str,
    /// Reference photos as `data:` URLs, in person order.
    pub reference_images: &'a [String],
    pub size: Dimensions,
    pub seed: u64,
}

/// Raw encoded image returned by the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
}

/// Client for the image generation API.
///
/// Implementations are shared by pipeline workers, so they must be `Sync`.
/// Each call blocks until the image arrives or a classified failure occurs.
pub trait ImageClient: Send + Sync {
    fn generate(&self, call: &ImageCall<'_>) -> Result<GeneratedImage, GenerationFailure>;

    /// True when images are local placeholders that skip the quality gate.
    fn produces_placeholders(&self) -> bool {
        false
    }
}
