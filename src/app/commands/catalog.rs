use crate::app::AppContext;
use crate::domain::{AppError, Background, Scenario, ScenarioTemplate};
use crate::ports::TemplateStore;

pub fn list_scenarios<S: TemplateStore>(ctx: &AppContext<S>) -> Result<Vec<Scenario>, AppError> {
    let catalog = ctx.templates().load_catalog()?;
    Ok(catalog.scenarios().cloned().collect())
}

/// Templates of a scenario, custom entries first.
pub fn list_templates<S: TemplateStore>(
    ctx: &AppContext<S>,
    scenario: &str,
) -> Result<(Scenario, Vec<ScenarioTemplate>), AppError> {
    let catalog = ctx.templates().load_catalog()?;
    let entry = catalog.entry(scenario)?;
    Ok((entry.scenario.clone(), entry.templates.clone()))
}

pub fn list_backgrounds<S: TemplateStore>(
    ctx: &AppContext<S>,
    scenario: &str,
) -> Result<(Scenario, Vec<Background>), AppError> {
    let catalog = ctx.templates().load_catalog()?;
    let entry = catalog.entry(scenario)?;
    Ok((entry.scenario.clone(), entry.backgrounds.clone()))
}
