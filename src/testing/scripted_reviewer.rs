use std::collections::VecDeque;

use crate::domain::{AppError, ReviewSession};
use crate::ports::{ReviewCommand, ReviewPrompter};

/// Replays a fixed list of review commands, then cancels.
#[derive(Debug, Default)]
pub struct ScriptedReviewer {
    commands: VecDeque<ReviewCommand>,
    pub notices: Vec<String>,
    pub seen_orders: Vec<Vec<usize>>,
}

impl ScriptedReviewer {
    pub fn new(commands: impl IntoIterator<Item = ReviewCommand>) -> Self {
        Self { commands: commands.into_iter().collect(), ..Self::default() }
    }
}

impl ReviewPrompter for ScriptedReviewer {
    fn next_command(&mut self, session: &ReviewSession) -> Result<ReviewCommand, AppError> {
        self.seen_orders.push(session.display_order().to_vec());
        Ok(self.commands.pop_front().unwrap_or(ReviewCommand::Cancel))
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}
