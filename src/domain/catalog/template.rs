use serde::{Deserialize, Serialize};

/// Where a template was loaded from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TemplateSource {
    #[default]
    Builtin,
    Custom,
}

/// A named slot a template accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    /// Comma-separated values render as a ", " joined list.
    #[serde(default, skip_serializing_if = "is_false")]
    pub multiselect: bool,
}

impl ParameterSpec {
    pub fn with_default(name: &str, default: &str) -> Self {
        Self {
            name: name.to_string(),
            default: Some(default.to_string()),
            required: false,
            multiselect: false,
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A prompt building block: style, pose, character or free-form template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioTemplate {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Base prompt; may reference parameters as `{{ name }}`.
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterSpec>,
    #[serde(skip)]
    pub source: TemplateSource,
}

impl ScenarioTemplate {
    pub fn matches(&self, key: &str) -> bool {
        let key = key.trim();
        self.id.eq_ignore_ascii_case(key) || self.name == key
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn is_custom(&self) -> bool {
        self.source == TemplateSource::Custom
    }
}

/// Named background preset for group scenarios.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Background {
    pub id: String,
    pub name: String,
    pub prompt: String,
}

impl Background {
    pub fn matches(&self, key: &str) -> bool {
        let key = key.trim();
        self.id.eq_ignore_ascii_case(key) || self.name == key
    }
}

/// Contents of one scenario data file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioData {
    #[serde(default)]
    pub templates: Vec<ScenarioTemplate>,
    #[serde(default)]
    pub backgrounds: Vec<Background>,
}
