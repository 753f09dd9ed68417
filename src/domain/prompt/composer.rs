use std::collections::BTreeMap;

use minijinja::Value;
use serde::Serialize;

use super::layout::{
    LayoutReader, normalize_whitespace, render_base, render_layout, trim_sentence,
};
use crate::domain::AppError;
use crate::domain::catalog::{ScenarioEntry, ScenarioTemplate, TemplateCatalog};

/// Negative prompt used when neither the caller, the template nor the scenario supply one.
pub const DEFAULT_NEGATIVE_PROMPT: &str = "blurry, distorted faces, unnatural pose, bad proportions, \
     extra limbs, extra fingers, deformed hands, watermark, text, low quality, artifacts";

/// Override key replacing the negative prompt wholesale.
pub const NEGATIVE_PROMPT_KEY: &str = "negative_prompt";

/// Override key whose value may name a background preset.
pub const BACKGROUND_KEY: &str = "background";

/// Slots every layout may reference; undeclared ones render empty.
const LAYOUT_SLOTS: [&str; 7] =
    ["pose", "attire", "lighting", "background", "mood", "scene", "atmosphere"];

/// Caller-supplied parameter values keyed by parameter name.
pub type Overrides = BTreeMap<String, String>;

/// Final prompt text for one generated image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposedPrompt {
    pub template_id: String,
    pub template_name: String,
    pub prompt: String,
    pub negative_prompt: String,
}

/// Turns a scenario, a template and overrides into prompt text.
///
/// Composition is pure: the same inputs always give the same prompt.
pub struct PromptComposer<'a> {
    catalog: &'a TemplateCatalog,
    layouts: LayoutReader,
}

impl<'a> PromptComposer<'a> {
    pub fn new(catalog: &'a TemplateCatalog, layouts: LayoutReader) -> Self {
        Self { catalog, layouts }
    }

    pub fn compose(
        &self,
        scenario_id: &str,
        template_id: &str,
        overrides: &Overrides,
        photo_count: usize,
    ) -> Result<ComposedPrompt, AppError> {
        let entry = self.catalog.entry(scenario_id)?;
        let template = entry.template(template_id)?;
        let values = resolve_parameters(entry, template, overrides)?;
        let base = render_base(template, &values)?;

        let mut context: BTreeMap<String, Value> =
            LAYOUT_SLOTS.iter().map(|slot| (slot.to_string(), Value::from(""))).collect();
        for (name, value) in &values {
            context.insert(name.clone(), Value::from(value.as_str()));
        }
        context.insert("base".into(), Value::from(trim_sentence(&base)));
        context.insert("name".into(), Value::from(template.name.as_str()));
        context.insert("scenario".into(), Value::from(entry.scenario.name.as_str()));
        context.insert("photo_count".into(), Value::from(photo_count));
        context.insert(
            "positions".into(),
            Value::from_serialize(position_instructions(photo_count)),
        );

        let rendered = render_layout(self.layouts, entry.scenario.layout, &context)?;

        let negative_prompt = overrides
            .get(NEGATIVE_PROMPT_KEY)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .or(template.negative_prompt.as_deref())
            .or(entry.scenario.negative_prompt.as_deref())
            .unwrap_or(DEFAULT_NEGATIVE_PROMPT);

        Ok(ComposedPrompt {
            template_id: template.id.clone(),
            template_name: template.name.clone(),
            prompt: normalize_whitespace(&rendered),
            negative_prompt: normalize_whitespace(negative_prompt),
        })
    }
}

/// Resolve each declared parameter: non-empty override, then default, then empty.
fn resolve_parameters(
    entry: &ScenarioEntry,
    template: &ScenarioTemplate,
    overrides: &Overrides,
) -> Result<BTreeMap<String, String>, AppError> {
    let mut values = BTreeMap::new();
    for spec in &template.parameters {
        let supplied = overrides.get(&spec.name).map(|v| v.trim()).filter(|v| !v.is_empty());
        let value = match supplied {
            Some(value) if spec.name == BACKGROUND_KEY => match entry.background(value) {
                Some(preset) => format!("{} ({})", preset.name, preset.prompt),
                None => value.to_string(),
            },
            Some(value) if spec.multiselect => format_multiselect(value),
            Some(value) => value.to_string(),
            None => match &spec.default {
                Some(default) => default.clone(),
                None if spec.required => {
                    return Err(AppError::MissingParameter {
                        template: template.id.clone(),
                        parameter: spec.name.clone(),
                    });
                }
                None => String::new(),
            },
        };
        values.insert(spec.name.clone(), value);
    }
    Ok(values)
}

fn format_multiselect(value: &str) -> String {
    value
        .split([',', '，'])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// One identity instruction per reference photo, in photo order.
fn position_instructions(photo_count: usize) -> Vec<String> {
    if photo_count < 2 {
        return Vec::new();
    }
    (1..=photo_count)
        .map(|n| {
            format!(
                "Person {n}: use the facial features and gender from reference image {n} ONLY, \
                 do not mix features from other images."
            )
        })
        .collect()
}
