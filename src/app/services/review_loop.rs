use tracing::info;

use crate::domain::review::ReviewEffect;
use crate::domain::{AppError, GenerationResult, ReviewSession};
use crate::ports::{ReviewCommand, ReviewPrompter};

/// How a review session ended; results are in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    Confirmed(Vec<GenerationResult>),
    Cancelled(Vec<GenerationResult>),
}

impl ReviewOutcome {
    pub fn results(&self) -> &[GenerationResult] {
        match self {
            ReviewOutcome::Confirmed(results) | ReviewOutcome::Cancelled(results) => results,
        }
    }
}

/// Drive a review session until the prompter confirms or cancels.
///
/// `regenerate` is called with `(index, attempt)` and must return the new result
/// for that slot. Invalid commands are reported through the prompter and the
/// loop continues.
pub fn run_review<P, F>(
    results: Vec<GenerationResult>,
    prompter: &mut P,
    mut regenerate: F,
) -> Result<ReviewOutcome, AppError>
where
    P: ReviewPrompter + ?Sized,
    F: FnMut(usize, u32) -> Result<GenerationResult, AppError>,
{
    let mut session = ReviewSession::new(results);
    loop {
        match prompter.next_command(&session)? {
            ReviewCommand::Decide(decision) => match session.apply(decision) {
                Ok(ReviewEffect::RegenerationRequested { index, attempt }) => {
                    info!(index, attempt, "regenerating image on review request");
                    let result = regenerate(index, attempt)?;
                    session.complete_regeneration(index, result)?;
                }
                Ok(ReviewEffect::Updated) => {}
                Err(AppError::InvalidArgument(message)) => prompter.notify(&message),
                Err(err) => return Err(err),
            },
            ReviewCommand::Confirm => match session.confirm() {
                Ok(results) => return Ok(ReviewOutcome::Confirmed(results)),
                Err(AppError::InvalidArgument(message)) => prompter.notify(&message),
                Err(err) => return Err(err),
            },
            ReviewCommand::Cancel => return Ok(ReviewOutcome::Cancelled(session.ordered_results())),
        }
    }
}
