use std::collections::{BTreeMap, BTreeSet};

use minijinja::{Environment, UndefinedBehavior, Value};

use crate::domain::AppError;
use crate::domain::catalog::{Layout, ScenarioTemplate};

/// Reads an embedded layout template by file name.
pub type LayoutReader = fn(&str) -> Option<String>;

fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.add_function("line", |label: String, value: String| -> String {
        let value = trim_sentence(&value);
        if value.is_empty() { String::new() } else { format!("{}: {}.", label, value) }
    });
    env
}

/// Render a template's base prompt with its resolved parameter values.
pub(crate) fn render_base(
    template: &ScenarioTemplate,
    values: &BTreeMap<String, String>,
) -> Result<String, AppError> {
    environment().render_str(&template.prompt, values).map_err(|err| AppError::TemplateRender {
        template: format!("template '{}'", template.id),
        reason: err.to_string(),
    })
}

/// Parse `source` and return the context names it reads, without rendering it.
///
/// Registered functions such as `line` are not reported.
pub fn template_variables(id: &str, source: &str) -> Result<BTreeSet<String>, AppError> {
    let env = environment();
    let template = env.template_from_str(source).map_err(|err| AppError::TemplateRender {
        template: format!("template '{}'", id),
        reason: err.to_string(),
    })?;
    let mut names: BTreeSet<String> = template.undeclared_variables(false).into_iter().collect();
    for (global, _) in env.globals() {
        names.remove(global);
    }
    Ok(names)
}

/// Render the scenario layout around an already rendered base prompt.
pub(crate) fn render_layout(
    reader: LayoutReader,
    layout: Layout,
    context: &BTreeMap<String, Value>,
) -> Result<String, AppError> {
    let name = layout.asset_name();
    let source = reader(name).ok_or_else(|| AppError::TemplateRender {
        template: format!("layout '{}'", name),
        reason: "layout asset not found".into(),
    })?;
    environment().render_str(&source, context).map_err(|err| AppError::TemplateRender {
        template: format!("layout '{}'", name),
        reason: err.to_string(),
    })
}

/// Strip surrounding whitespace and trailing sentence punctuation.
pub(crate) fn trim_sentence(text: &str) -> String {
    text.trim().trim_end_matches(['.', '。', ',', '，']).trim_end().to_string()
}

pub(crate) fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
