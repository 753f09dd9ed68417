use crate::app::AppContext;
use crate::app::config::{render_config, set_config_value};
use crate::domain::{AppError, StudioConfig, StudioHome};
use crate::ports::TemplateStore;

/// Effective configuration rendered as TOML.
pub fn show<S: TemplateStore>(ctx: &AppContext<S>) -> Result<String, AppError> {
    render_config(ctx.config())
}

/// Apply one `section.key=value` assignment and save the file.
///
/// Works from the raw file so a broken configuration can still be repaired.
pub fn set(home: &StudioHome, assignment: &str) -> Result<StudioConfig, AppError> {
    set_config_value(home, assignment)
}
