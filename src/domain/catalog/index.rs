use super::{Background, Scenario, ScenarioTemplate};
use crate::domain::AppError;

/// A scenario together with its templates and background presets.
#[derive(Debug, Clone)]
pub struct ScenarioEntry {
    pub scenario: Scenario,
    pub templates: Vec<ScenarioTemplate>,
    pub backgrounds: Vec<Background>,
}

impl ScenarioEntry {
    pub fn template(&self, key: &str) -> Result<&ScenarioTemplate, AppError> {
        self.templates.iter().find(|t| t.matches(key)).ok_or_else(|| {
            AppError::UnknownTemplate {
                scenario: self.scenario.id.clone(),
                template: key.to_string(),
            }
        })
    }

    /// First template in listing order; used when the caller names none.
    pub fn default_template(&self) -> Result<&ScenarioTemplate, AppError> {
        self.templates.first().ok_or_else(|| AppError::UnknownTemplate {
            scenario: self.scenario.id.clone(),
            template: "<default>".to_string(),
        })
    }

    pub fn background(&self, key: &str) -> Option<&Background> {
        self.backgrounds.iter().find(|b| b.matches(key))
    }
}

/// Loaded, immutable view of every scenario.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    entries: Vec<ScenarioEntry>,
}

impl TemplateCatalog {
    pub fn new(entries: Vec<ScenarioEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ScenarioEntry] {
        &self.entries
    }

    pub fn scenarios(&self) -> impl Iterator<Item = &Scenario> {
        self.entries.iter().map(|e| &e.scenario)
    }

    /// Look up a scenario by id (case-insensitive) or display name.
    pub fn entry(&self, key: &str) -> Result<&ScenarioEntry, AppError> {
        self.entries.iter().find(|e| e.scenario.matches(key)).ok_or_else(|| {
            AppError::UnknownScenario {
                name: key.to_string(),
                available: self.scenarios().map(|s| s.id.as_str()).collect::<Vec<_>>().join(", "),
            }
        })
    }

    pub(crate) fn entry_mut(&mut self, key: &str) -> Option<&mut ScenarioEntry> {
        self.entries.iter_mut().find(|e| e.scenario.matches(key))
    }

    pub fn template(&self, scenario: &str, template: &str) -> Result<&ScenarioTemplate, AppError> {
        self.entry(scenario)?.template(template)
    }
}
