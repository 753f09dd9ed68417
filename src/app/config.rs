//! Loading and editing `studio.toml`.

use std::fs;

use crate::adapters::persist::write_atomically;
use crate::domain::{AppError, StudioConfig, StudioHome};

/// Load the configuration, falling back to defaults when the file is absent.
pub fn load_config(home: &StudioHome) -> Result<StudioConfig, AppError> {
    let path = home.config_file();
    if !path.exists() {
        return Ok(StudioConfig::default());
    }
    let content = fs::read_to_string(&path)?;
    parse_config_content(&content)
}

/// Parse configuration from string content.
pub fn parse_config_content(content: &str) -> Result<StudioConfig, AppError> {
    let config: StudioConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Render the effective configuration as TOML.
pub fn render_config(config: &StudioConfig) -> Result<String, AppError> {
    toml::to_string_pretty(config)
        .map_err(|e| AppError::InvalidConfig(format!("Failed to render configuration: {}", e)))
}

/// Apply `section.key=value`, validate the result and save it.
///
/// Only the edited key is written back; other keys in the file are preserved.
pub fn set_config_value(home: &StudioHome, assignment: &str) -> Result<StudioConfig, AppError> {
    let (key, raw_value) = assignment.split_once('=').ok_or_else(|| {
        AppError::InvalidArgument(format!("Expected section.key=value, got '{}'", assignment))
    })?;
    let (section, field) = key.trim().split_once('.').ok_or_else(|| {
        AppError::InvalidArgument(format!("Expected section.key, got '{}'", key.trim()))
    })?;

    let path = home.config_file();
    let mut table: toml::Table = if path.exists() {
        toml::from_str(&fs::read_to_string(&path)?)?
    } else {
        toml::Table::new()
    };

    let section_table = table
        .entry(section.to_string())
        .or_insert_with(|| toml::Value::Table(toml::Table::new()))
        .as_table_mut()
        .ok_or_else(|| AppError::InvalidConfig(format!("'{}' is not a table", section)))?;
    section_table.insert(field.trim().to_string(), parse_value(raw_value.trim()));

    let content = toml::to_string_pretty(&table)
        .map_err(|e| AppError::InvalidConfig(format!("Failed to render configuration: {}", e)))?;
    let config = parse_config_content(&content)?;
    write_atomically(&path, content.as_bytes())?;
    Ok(config)
}

/// Interpret a command-line value as the TOML literal it looks like.
fn parse_value(raw: &str) -> toml::Value {
    if let Ok(parsed) = toml::from_str::<toml::Table>(&format!("v = {}", raw))
        && let Some(value) = parsed.get("v")
    {
        return value.clone();
    }
    toml::Value::String(raw.trim_matches('"').to_string())
}
