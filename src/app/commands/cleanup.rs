use std::fs;

use tracing::info;

use crate::app::AppContext;
use crate::domain::AppError;
use crate::ports::TemplateStore;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CleanupOutcome {
    pub removed_files: usize,
}

/// Remove normalized photos left in the temp directory.
pub fn execute<S: TemplateStore>(ctx: &AppContext<S>) -> Result<CleanupOutcome, AppError> {
    let temp = ctx.dirs().temp;
    if !temp.exists() {
        return Ok(CleanupOutcome::default());
    }

    let mut removed_files = 0;
    for entry in fs::read_dir(&temp)? {
        let path = entry?.path();
        if path.is_file() {
            fs::remove_file(&path)?;
            removed_files += 1;
        }
    }
    info!(removed_files, dir = %temp.display(), "temp directory cleaned");
    Ok(CleanupOutcome { removed_files })
}
