//! API Facade for the application.
//!
//! This module exposes high-level functions that glue together context creation
//! and command execution. Every operation has an `_at` variant taking an
//! explicit studio home.

use std::path::PathBuf;

use crate::adapters::embedded_template_store::EmbeddedTemplateStore;
use crate::app::{
    AppContext,
    commands::{add_template, catalog, cleanup, config, generate},
};
use crate::domain::configuration::HOME_ENV;
use crate::domain::{Background, Scenario, ScenarioTemplate, StudioConfig, StudioHome};
use crate::ports::ReviewPrompter;

pub use crate::app::commands::add_template::{AddTemplateOptions, AddTemplateOutcome};
pub use crate::app::commands::cleanup::CleanupOutcome;
pub use crate::app::commands::generate::{GenerateOptions, GenerateOutcome, ReviewStatus};
pub use crate::domain::AppError;

/// Studio home from `PHOTO_STUDIO_HOME`, falling back to the current directory.
pub fn current_home() -> Result<StudioHome, AppError> {
    match std::env::var_os(HOME_ENV) {
        Some(root) if !root.is_empty() => Ok(StudioHome::new(PathBuf::from(root))),
        _ => Ok(StudioHome::new(std::env::current_dir()?)),
    }
}

fn open_context(home: &StudioHome) -> Result<AppContext<EmbeddedTemplateStore>, AppError> {
    AppContext::open(home.clone())
}

// =============================================================================
// Generate Command API
// =============================================================================

/// Generate images in the current studio home.
///
/// When `reviewer` is `None` or `options.non_interactive` is set, results are
/// returned without a review step.
pub fn generate(
    options: &GenerateOptions,
    reviewer: Option<&mut dyn ReviewPrompter>,
) -> Result<GenerateOutcome, AppError> {
    generate_at(&current_home()?, options, reviewer)
}

pub fn generate_at(
    home: &StudioHome,
    options: &GenerateOptions,
    reviewer: Option<&mut dyn ReviewPrompter>,
) -> Result<GenerateOutcome, AppError> {
    let ctx = open_context(home)?;
    generate::execute(&ctx, options, reviewer)
}

/// Compose prompts only; no photo is read and no request is sent.
pub fn compose_prompts_at(
    home: &StudioHome,
    options: &GenerateOptions,
) -> Result<GenerateOutcome, AppError> {
    let options = GenerateOptions { prompt_preview: true, ..options.clone() };
    generate_at(home, &options, None)
}

// =============================================================================
// Catalog API
// =============================================================================

pub fn list_scenarios_at(home: &StudioHome) -> Result<Vec<Scenario>, AppError> {
    catalog::list_scenarios(&open_context(home)?)
}

pub fn list_templates_at(
    home: &StudioHome,
    scenario: &str,
) -> Result<(Scenario, Vec<ScenarioTemplate>), AppError> {
    catalog::list_templates(&open_context(home)?, scenario)
}

pub fn list_backgrounds_at(
    home: &StudioHome,
    scenario: &str,
) -> Result<(Scenario, Vec<Background>), AppError> {
    catalog::list_backgrounds(&open_context(home)?, scenario)
}

/// Append a custom template to `<home>/data/custom_templates.yml`.
pub fn add_template_at(
    home: &StudioHome,
    options: &AddTemplateOptions,
) -> Result<AddTemplateOutcome, AppError> {
    add_template::execute(&open_context(home)?, options)
}

// =============================================================================
// Config and Maintenance API
// =============================================================================

pub fn show_config_at(home: &StudioHome) -> Result<String, AppError> {
    config::show(&open_context(home)?)
}

pub fn set_config_at(home: &StudioHome, assignment: &str) -> Result<StudioConfig, AppError> {
    config::set(home, assignment)
}

pub fn cleanup_at(home: &StudioHome) -> Result<CleanupOutcome, AppError> {
    cleanup::execute(&open_context(home)?)
}
