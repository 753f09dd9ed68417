use tracing::info;

use crate::app::AppContext;
use crate::domain::catalog::{ParameterSpec, TemplateSource};
use crate::domain::prompt::template_variables;
use crate::domain::{AppError, ScenarioTemplate, TemplateId};
use crate::ports::TemplateStore;

/// Inputs for a custom template.
#[derive(Debug, Clone, Default)]
pub struct AddTemplateOptions {
    pub scenario: String,
    pub name: String,
    /// Explicit id; derived from `name` when absent.
    pub id: Option<String>,
    pub prompt: String,
    pub negative_prompt: Option<String>,
    /// `(name, value)` pairs; an empty value marks the parameter required.
    pub parameters: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct AddTemplateOutcome {
    pub scenario_id: String,
    pub template: ScenarioTemplate,
}

pub fn execute<S: TemplateStore>(
    ctx: &AppContext<S>,
    options: &AddTemplateOptions,
) -> Result<AddTemplateOutcome, AppError> {
    let name = options.name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidArgument("template name must not be empty".into()));
    }
    let prompt = options.prompt.trim();
    if prompt.is_empty() {
        return Err(AppError::InvalidArgument("template prompt must not be empty".into()));
    }

    let catalog = ctx.templates().load_catalog()?;
    let scenario_id = catalog.entry(&options.scenario)?.scenario.id.clone();
    let id = TemplateId::resolve(options.id.as_deref(), name)?;
    let referenced = template_variables(id.as_str(), prompt)?;

    let parameters = options
        .parameters
        .iter()
        .map(|(key, value)| {
            let key = key.trim();
            if key.is_empty() {
                return Err(AppError::InvalidArgument("parameter name must not be empty".into()));
            }
            let value = value.trim();
            Ok(if value.is_empty() {
                ParameterSpec { name: key.to_string(), default: None, required: true, multiselect: false }
            } else {
                ParameterSpec::with_default(key, value)
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let undeclared: Vec<&str> = referenced
        .iter()
        .filter(|name| !parameters.iter().any(|p| &p.name == *name))
        .map(String::as_str)
        .collect();
    if !undeclared.is_empty() {
        return Err(AppError::InvalidArgument(format!(
            "prompt uses undeclared parameter(s): {}; declare them with --param name=default",
            undeclared.join(", ")
        )));
    }

    let template = ScenarioTemplate {
        id: id.to_string(),
        name: name.to_string(),
        category: None,
        prompt: prompt.to_string(),
        negative_prompt: options
            .negative_prompt
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string),
        parameters,
        source: TemplateSource::Custom,
    };

    ctx.templates().append_custom(&scenario_id, template.clone())?;
    info!(scenario = %scenario_id, template = %template.id, "custom template added");
    Ok(AddTemplateOutcome { scenario_id, template })
}
