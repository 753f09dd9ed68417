//! Config and cleanup commands.

use crate::app::api;
use crate::domain::{AppError, StudioHome};

pub fn run_config(home: &StudioHome, show: bool, set: Option<String>) -> Result<(), AppError> {
    match (show, set) {
        (false, Some(assignment)) => {
            api::set_config_at(home, &assignment)?;
            println!("✅ Updated {} in {}", assignment.trim(), home.config_file().display());
        }
        (true, None) => print!("{}", api::show_config_at(home)?),
        _ => {
            return Err(AppError::InvalidArgument(
                "config takes exactly one of --show or --set".into(),
            ));
        }
    }
    Ok(())
}

pub fn run_cleanup(home: &StudioHome) -> Result<(), AppError> {
    let outcome = api::cleanup_at(home)?;
    println!("✅ Removed {} temporary file(s)", outcome.removed_files);
    Ok(())
}
