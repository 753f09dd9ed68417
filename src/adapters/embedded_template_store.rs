use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::catalogs::read_catalog_asset;
use super::persist::write_atomically;
use crate::domain::catalog::{ScenarioData, ScenarioEntry, TemplateSource};
use crate::domain::{AppError, Scenario, ScenarioTemplate, TemplateCatalog};
use crate::ports::TemplateStore;

const SCENARIO_INDEX: &str = "scenarios.yml";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioIndex {
    scenarios: Vec<Scenario>,
}

/// On-disk custom template file, keyed by scenario id.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct CustomTemplateFile {
    #[serde(default)]
    scenarios: BTreeMap<String, Vec<ScenarioTemplate>>,
}

/// Built-in catalog embedded in the binary plus a custom template file.
#[derive(Debug, Clone)]
pub struct EmbeddedTemplateStore {
    custom_path: PathBuf,
}

impl EmbeddedTemplateStore {
    pub fn new(custom_path: impl Into<PathBuf>) -> Self {
        Self { custom_path: custom_path.into() }
    }

    fn load_builtin(&self) -> Result<Vec<ScenarioEntry>, AppError> {
        let index: ScenarioIndex = parse_asset(SCENARIO_INDEX)?;
        index
            .scenarios
            .into_iter()
            .map(|scenario| {
                let data: ScenarioData = parse_asset(&scenario.data_file)?;
                Ok(ScenarioEntry { scenario, templates: data.templates, backgrounds: data.backgrounds })
            })
            .collect()
    }

    fn load_custom(&self) -> Result<CustomTemplateFile, AppError> {
        if !self.custom_path.exists() {
            return Ok(CustomTemplateFile::default());
        }
        let content = fs::read_to_string(&self.custom_path)?;
        if content.trim().is_empty() {
            return Ok(CustomTemplateFile::default());
        }
        serde_yaml::from_str(&content).map_err(|e| AppError::Catalog {
            file: self.custom_path.display().to_string(),
            details: e.to_string(),
        })
    }
}

fn parse_asset<T: for<'de> Deserialize<'de>>(name: &str) -> Result<T, AppError> {
    let content = read_catalog_asset(name).ok_or_else(|| AppError::Catalog {
        file: name.to_string(),
        details: "embedded asset not found".into(),
    })?;
    serde_yaml::from_str(&content)
        .map_err(|e| AppError::Catalog { file: name.to_string(), details: e.to_string() })
}

impl TemplateStore for EmbeddedTemplateStore {
    fn load_catalog(&self) -> Result<TemplateCatalog, AppError> {
        let mut catalog = TemplateCatalog::new(self.load_builtin()?);
        let custom = self.load_custom()?;

        for (scenario_id, templates) in custom.scenarios {
            let entry = catalog.entry_mut(&scenario_id).ok_or_else(|| AppError::Catalog {
                file: self.custom_path.display().to_string(),
                details: format!("unknown scenario '{}'", scenario_id),
            })?;
            // Custom templates are listed ahead of the built-ins.
            let customs = templates.into_iter().map(|mut template| {
                template.source = TemplateSource::Custom;
                template
            });
            let builtins = std::mem::take(&mut entry.templates);
            entry.templates = customs.chain(builtins).collect();
        }
        Ok(catalog)
    }

    fn append_custom(&self, scenario_id: &str, template: ScenarioTemplate) -> Result<(), AppError> {
        let catalog = self.load_catalog()?;
        let entry = catalog.entry(scenario_id)?;
        if entry.templates.iter().any(|t| t.matches(&template.id) || t.matches(&template.name)) {
            return Err(AppError::TemplateExists {
                scenario: entry.scenario.id.clone(),
                template: template.id,
            });
        }

        let mut custom = self.load_custom()?;
        custom.scenarios.entry(entry.scenario.id.clone()).or_default().push(template);
        let content = serde_yaml::to_string(&custom).map_err(|e| AppError::Catalog {
            file: self.custom_path.display().to_string(),
            details: e.to_string(),
        })?;
        write_atomically(&self.custom_path, content.as_bytes())?;
        Ok(())
    }
}
