use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Library-wide error type for photo-studio operations.
///
/// Every variant is fatal for the invocation and is raised before any
/// network call is made. Per-image failures during generation are carried
/// by [`crate::domain::GenerationFailure`] inside the result slot instead.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration value is missing or out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    /// Embedded or custom template catalog could not be read.
    #[error("Template catalog error in {file}: {details}")]
    Catalog { file: String, details: String },

    /// Scenario id or name is not in the catalog.
    #[error("Unknown scenario '{name}'. Available: {available}")]
    UnknownScenario { name: String, available: String },

    /// Template id or name is not defined for the scenario.
    #[error("Unknown template '{template}' for scenario '{scenario}'")]
    UnknownTemplate { scenario: String, template: String },

    /// A required template parameter has no value and no default.
    #[error("Template '{template}' requires parameter '{parameter}'")]
    MissingParameter { template: String, parameter: String },

    /// Template id already present in the scenario.
    #[error("Template '{template}' already exists in scenario '{scenario}'")]
    TemplateExists { scenario: String, template: String },

    /// Template identifier is invalid.
    #[error("Invalid template identifier '{0}': must be alphanumeric with hyphens or underscores")]
    InvalidTemplateId(String),

    /// Prompt or layout rendering failed.
    #[error("Failed to render {template}: {reason}")]
    TemplateRender { template: String, reason: String },

    /// Photo count outside the scenario bounds.
    #[error("Scenario '{scenario}' accepts {min}-{max} photo(s), got {actual}")]
    PhotoCountOutOfRange { scenario: String, min: usize, max: usize, actual: usize },

    /// Reference photo missing or not decodable.
    #[error("Invalid photo {}: {reason}", path.display())]
    InvalidPhoto { path: PathBuf, reason: String },

    /// API credential not present in the environment.
    #[error("API credential missing: set the {0} environment variable or use --mock")]
    MissingCredential(String),

    /// Requested image count outside 1..=max.
    #[error("Image count must be between 1 and {max}, got {actual}")]
    InvalidOutputCount { max: u32, actual: u32 },

    /// Malformed command argument or review command.
    #[error("{0}")]
    InvalidArgument(String),

    /// Interactive session aborted by the user.
    #[error("Operation cancelled")]
    Cancelled,
}

impl AppError {
    /// Provide an `io::ErrorKind`-like view for callers mapping errors to exit codes.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            AppError::Io(err) => err.kind(),
            AppError::InvalidConfig(_)
            | AppError::TomlParseError(_)
            | AppError::Catalog { .. }
            | AppError::MissingParameter { .. }
            | AppError::InvalidTemplateId(_)
            | AppError::TemplateRender { .. }
            | AppError::PhotoCountOutOfRange { .. }
            | AppError::InvalidPhoto { .. }
            | AppError::InvalidOutputCount { .. }
            | AppError::InvalidArgument(_) => io::ErrorKind::InvalidInput,
            AppError::UnknownScenario { .. }
            | AppError::UnknownTemplate { .. }
            | AppError::MissingCredential(_) => io::ErrorKind::NotFound,
            AppError::TemplateExists { .. } => io::ErrorKind::AlreadyExists,
            AppError::Cancelled => io::ErrorKind::Interrupted,
        }
    }
}
