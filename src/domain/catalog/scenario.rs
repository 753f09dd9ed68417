use serde::{Deserialize, Serialize};

use crate::domain::AppError;

/// Prompt layout a scenario renders through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    Portrait,
    Couple,
    Family,
    Celebrity,
    Fusion,
    Edit,
    Series,
    Poster,
    Free,
}

impl Layout {
    /// File name of the embedded layout template.
    pub fn asset_name(self) -> &'static str {
        match self {
            Layout::Portrait => "portrait.j2",
            Layout::Couple => "couple.j2",
            Layout::Family => "family.j2",
            Layout::Celebrity => "celebrity.j2",
            Layout::Fusion => "fusion.j2",
            Layout::Edit => "edit.j2",
            Layout::Series => "series.j2",
            Layout::Poster => "poster.j2",
            Layout::Free => "free.j2",
        }
    }

    /// What a template of this layout is called in listings.
    pub fn item_label(self) -> &'static str {
        match self {
            Layout::Portrait => "style",
            Layout::Couple | Layout::Family => "pose",
            Layout::Celebrity => "character",
            _ => "template",
        }
    }
}

/// Inclusive bounds on the number of reference photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhotoBounds {
    pub min: usize,
    pub max: usize,
}

impl PhotoBounds {
    pub fn contains(&self, count: usize) -> bool {
        (self.min..=self.max).contains(&count)
    }

    /// Fail with `PhotoCountOutOfRange` when `count` is outside the bounds.
    pub fn check(&self, scenario: &str, count: usize) -> Result<(), AppError> {
        if self.contains(count) {
            Ok(())
        } else {
            Err(AppError::PhotoCountOutOfRange {
                scenario: scenario.to_string(),
                min: self.min,
                max: self.max,
                actual: count,
            })
        }
    }
}

impl std::fmt::Display for PhotoBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}-{}", self.min, self.max)
        }
    }
}

/// A named kind of shot with its own photo bounds and layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub id: String,
    pub name: String,
    pub description: String,
    pub layout: Layout,
    pub photos: PhotoBounds,
    /// Catalog file holding this scenario's templates.
    pub data_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
}

impl Scenario {
    pub fn matches(&self, key: &str) -> bool {
        let key = key.trim();
        self.id.eq_ignore_ascii_case(key) || self.name == key
    }
}
