use serde::{Deserialize, Serialize};

use crate::domain::AppError;
use crate::impl_validated_id;

/// Validated identifier of a scenario template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TemplateId(String);

impl_validated_id!(TemplateId, false, AppError::InvalidTemplateId);

impl TemplateId {
    /// Use `explicit` when given, otherwise derive an id from the display name.
    pub fn resolve(explicit: Option<&str>, name: &str) -> Result<Self, AppError> {
        match explicit {
            Some(id) => Self::new(id.trim()),
            None => {
                let slug = super::validation::slugify(name);
                Self::new(&slug).map_err(|_| AppError::InvalidTemplateId(name.to_string()))
            }
        }
    }
}

impl TryFrom<String> for TemplateId {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<TemplateId> for String {
    fn from(value: TemplateId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_id_is_validated() {
        assert!(TemplateId::resolve(Some("bad/id"), "Whatever").is_err());
        assert_eq!(TemplateId::resolve(Some(" ok-id "), "x").unwrap().as_str(), "ok-id");
    }

    #[test]
    fn derives_id_from_name() {
        assert_eq!(TemplateId::resolve(None, "Jack Sparrow").unwrap().as_str(), "jack-sparrow");
        assert!(matches!(
            TemplateId::resolve(None, "???"),
            Err(AppError::InvalidTemplateId(name)) if name == "???"
        ));
    }
}
