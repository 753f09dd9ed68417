mod index;
mod scenario;
mod template;

pub use index::{ScenarioEntry, TemplateCatalog};
pub use scenario::{Layout, PhotoBounds, Scenario};
pub use template::{Background, ParameterSpec, ScenarioData, ScenarioTemplate, TemplateSource};
