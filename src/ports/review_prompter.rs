use crate::domain::{AppError, ReviewDecision, ReviewSession};

/// Next step chosen by the reviewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewCommand {
    Decide(ReviewDecision),
    Confirm,
    Cancel,
}

/// Source of review commands (terminal prompts or a script in tests).
pub trait ReviewPrompter {
    fn next_command(&mut self, session: &ReviewSession) -> Result<ReviewCommand, AppError>;

    /// Report a rejected command without ending the review.
    fn notify(&mut self, message: &str);
}
