pub mod catalog;
pub mod configuration;
pub mod error;
pub mod generation;
pub mod identifiers;
pub mod prompt;
pub mod review;

pub use catalog::{Background, Layout, PhotoBounds, Scenario, ScenarioTemplate, TemplateCatalog};
pub use configuration::{Credentials, StudioConfig, StudioHome};
pub use error::AppError;
pub use generation::{
    Dimensions, GenerationFailure, GenerationOutcome, GenerationRequest, GenerationResult,
    GenerationSummary,
};
pub use identifiers::TemplateId;
pub use prompt::{ComposedPrompt, Overrides, PromptComposer};
pub use review::{ReviewAction, ReviewDecision, ReviewSession, SlotState};
