//! Terminal review prompts.

use std::fmt::Write as _;
use std::fs;

use dialoguer::Select;

use crate::domain::{AppError, ReviewAction, ReviewDecision, ReviewSession, SlotState};
use crate::ports::{ReviewCommand, ReviewPrompter};

const MENU: [&str; 6] = [
    "Accept an image",
    "Regenerate an image",
    "Move an image",
    "View image details",
    "Confirm and finish",
    "Cancel",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct DialoguerReviewPrompter;

impl DialoguerReviewPrompter {
    pub fn new() -> Self {
        Self
    }
}

fn slot_label(session: &ReviewSession, index: usize) -> String {
    let Some(slot) = session.slot(index) else {
        return format!("#{} (missing)", index + 1);
    };
    let state = match slot.state {
        SlotState::Pending => "pending",
        SlotState::Accepted => "accepted",
        SlotState::Regenerating => "regenerating",
        SlotState::Final => "final",
    };
    match (slot.result.path(), slot.result.failure_reason()) {
        (Some(path), _) => format!("#{} [{}] {}", index + 1, state, path.display()),
        (None, Some(reason)) => format!("#{} [{}] failed: {}", index + 1, state, reason),
        (None, None) => format!("#{} [{}]", index + 1, state),
    }
}

/// Path, file size and pixel dimensions of every image in display order.
fn image_details(session: &ReviewSession) -> String {
    let mut out = String::new();
    for (position, &index) in session.display_order().iter().enumerate() {
        let _ = writeln!(out, "--- Image {} ---", position + 1);
        let Some(slot) = session.slot(index) else { continue };
        match (slot.result.path(), slot.result.failure_reason()) {
            (Some(path), _) => {
                let _ = writeln!(out, "Path: {}", path.display());
                match fs::metadata(path) {
                    Ok(meta) => {
                        let _ = writeln!(out, "Size: {:.1} KB", meta.len() as f64 / 1024.0);
                    }
                    Err(err) => {
                        let _ = writeln!(out, "Size: unavailable ({})", err);
                    }
                }
                if let Ok((width, height)) = image::image_dimensions(path) {
                    let _ = writeln!(out, "Dimensions: {}x{}", width, height);
                }
            }
            (None, Some(reason)) => {
                let _ = writeln!(out, "Failed: {}", reason);
            }
            (None, None) => {}
        }
    }
    out
}

fn select(prompt: &str, items: &[String]) -> Result<Option<usize>, AppError> {
    Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact_opt()
        .map_err(|err| AppError::InvalidArgument(format!("Failed to read selection: {}", err)))
}

impl ReviewPrompter for DialoguerReviewPrompter {
    fn next_command(&mut self, session: &ReviewSession) -> Result<ReviewCommand, AppError> {
        println!();
        println!("📋 Review ({} images):", session.slots().len());
        for (position, &index) in session.display_order().iter().enumerate() {
            println!("  {}. {}", position + 1, slot_label(session, index));
        }

        let menu: Vec<String> = MENU.iter().map(|s| s.to_string()).collect();
        let action = loop {
            let Some(choice) = select("What next?", &menu)? else {
                return Ok(ReviewCommand::Cancel);
            };
            match choice {
                0 => break ReviewAction::Accept,
                1 => break ReviewAction::Regenerate,
                2 => break ReviewAction::Reorder(0),
                3 => print!("{}", image_details(session)),
                4 => return Ok(ReviewCommand::Confirm),
                _ => return Ok(ReviewCommand::Cancel),
            }
        };

        let order = session.display_order();
        let images: Vec<String> = order.iter().map(|&i| slot_label(session, i)).collect();
        let Some(picked) = select("Which image?", &images)? else {
            return Ok(ReviewCommand::Cancel);
        };
        let target_index = order[picked];

        let action = match action {
            ReviewAction::Reorder(_) => {
                let positions: Vec<String> =
                    (1..=order.len()).map(|p| format!("Position {}", p)).collect();
                let Some(position) = select("Move to", &positions)? else {
                    return Ok(ReviewCommand::Cancel);
                };
                ReviewAction::Reorder(position)
            }
            other => other,
        };
        Ok(ReviewCommand::Decide(ReviewDecision { target_index, action }))
    }

    fn notify(&mut self, message: &str) {
        println!("⚠️  {}", message);
    }
}
