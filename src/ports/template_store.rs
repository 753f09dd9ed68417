use crate::domain::{AppError, ScenarioTemplate, TemplateCatalog};

/// Source of scenarios, templates and background presets.
pub trait TemplateStore {
    /// Load the full catalog, custom templates included.
    fn load_catalog(&self) -> Result<TemplateCatalog, AppError>;

    /// Persist a custom template; visible from the next `load_catalog`.
    fn append_custom(&self, scenario_id: &str, template: ScenarioTemplate) -> Result<(), AppError>;
}
