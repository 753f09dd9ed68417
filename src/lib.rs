//! photo-studio: compose scenario prompts and generate photos from reference images.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use app::api::{
    AddTemplateOptions, AddTemplateOutcome, CleanupOutcome, GenerateOptions, GenerateOutcome,
    ReviewStatus, add_template_at, cleanup_at, compose_prompts_at, current_home, generate,
    generate_at, list_backgrounds_at, list_scenarios_at, list_templates_at, set_config_at,
    show_config_at,
};
pub use domain::{AppError, GenerationFailure, GenerationResult, GenerationSummary, StudioHome};
