//! Review session state machine.
//!
//! Each slot moves `Pending -> Accepted | Regenerating`, `Regenerating ->
//! Pending` once its replacement arrives, and every slot becomes `Final` on
//! confirm. Reordering only permutes the display order.

use super::AppError;
use super::generation::GenerationResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Accept,
    Regenerate,
    /// Move the image to this zero-based display position.
    Reorder(usize),
}

/// A user decision about one output, addressed by request index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewDecision {
    pub target_index: usize,
    pub action: ReviewAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Pending,
    Accepted,
    Regenerating,
    Final,
}

#[derive(Debug, Clone)]
pub struct ReviewSlot {
    pub result: GenerationResult,
    pub state: SlotState,
    /// Number of regenerations requested so far.
    pub attempts: u32,
}

/// What the caller must do after a decision is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewEffect {
    Updated,
    RegenerationRequested { index: usize, attempt: u32 },
}

#[derive(Debug, Clone)]
pub struct ReviewSession {
    slots: Vec<ReviewSlot>,
    order: Vec<usize>,
    finalized: bool,
}

impl ReviewSession {
    /// Start a session; `results` must be ordered by request index.
    pub fn new(results: Vec<GenerationResult>) -> Self {
        let order = (0..results.len()).collect();
        let slots = results
            .into_iter()
            .map(|result| ReviewSlot { result, state: SlotState::Pending, attempts: 0 })
            .collect();
        Self { slots, order, finalized: false }
    }

    pub fn slots(&self) -> &[ReviewSlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&ReviewSlot> {
        self.slots.get(index)
    }

    /// Request indices in display order.
    pub fn display_order(&self) -> &[usize] {
        &self.order
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn ordered_results(&self) -> Vec<GenerationResult> {
        self.order.iter().map(|&i| self.slots[i].result.clone()).collect()
    }

    pub fn apply(&mut self, decision: ReviewDecision) -> Result<ReviewEffect, AppError> {
        if self.finalized {
            return Err(AppError::InvalidArgument("review is already finalized".into()));
        }
        let index = decision.target_index;
        let len = self.slots.len();
        let slot = self.slots.get_mut(index).ok_or_else(|| {
            AppError::InvalidArgument(format!("image {} does not exist (1-{})", index + 1, len))
        })?;

        match decision.action {
            ReviewAction::Accept => {
                if slot.state == SlotState::Regenerating {
                    return Err(AppError::InvalidArgument(format!(
                        "image {} is still being regenerated",
                        index + 1
                    )));
                }
                if !slot.result.is_success() {
                    return Err(AppError::InvalidArgument(format!(
                        "image {} failed to generate; regenerate it instead",
                        index + 1
                    )));
                }
                slot.state = SlotState::Accepted;
                Ok(ReviewEffect::Updated)
            }
            ReviewAction::Regenerate => {
                if slot.state == SlotState::Regenerating {
                    return Err(AppError::InvalidArgument(format!(
                        "image {} is already being regenerated",
                        index + 1
                    )));
                }
                slot.state = SlotState::Regenerating;
                slot.attempts += 1;
                Ok(ReviewEffect::RegenerationRequested { index, attempt: slot.attempts })
            }
            ReviewAction::Reorder(position) => {
                if position >= len {
                    return Err(AppError::InvalidArgument(format!(
                        "position {} is out of range (1-{})",
                        position + 1,
                        len
                    )));
                }
                let current = self.order.iter().position(|&i| i == index).ok_or_else(|| {
                    AppError::InvalidArgument(format!("image {} is not displayed", index + 1))
                })?;
                let moved = self.order.remove(current);
                self.order.insert(position, moved);
                Ok(ReviewEffect::Updated)
            }
        }
    }

    /// Replace a regenerating slot with its new result.
    pub fn complete_regeneration(
        &mut self,
        index: usize,
        result: GenerationResult,
    ) -> Result<(), AppError> {
        let slot = self
            .slots
            .get_mut(index)
            .filter(|slot| slot.state == SlotState::Regenerating)
            .ok_or_else(|| {
                AppError::InvalidArgument(format!("image {} is not awaiting regeneration", index + 1))
            })?;
        slot.result = GenerationResult { index, outcome: result.outcome };
        slot.state = SlotState::Pending;
        Ok(())
    }

    /// Finalize every slot and return results in display order.
    pub fn confirm(&mut self) -> Result<Vec<GenerationResult>, AppError> {
        if let Some(slot) = self.slots.iter().find(|s| s.state == SlotState::Regenerating) {
            return Err(AppError::InvalidArgument(format!(
                "image {} is still being regenerated",
                slot.result.index + 1
            )));
        }
        for slot in &mut self.slots {
            slot.state = SlotState::Final;
        }
        self.finalized = true;
        Ok(self.ordered_results())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::domain::GenerationFailure;

    fn session() -> ReviewSession {
        ReviewSession::new(vec![
            GenerationResult::success(0, PathBuf::from("a.jpg")),
            GenerationResult::failure(1, GenerationFailure::Timeout),
            GenerationResult::success(2, PathBuf::from("c.jpg")),
        ])
    }

    fn decide(index: usize, action: ReviewAction) -> ReviewDecision {
        ReviewDecision { target_index: index, action }
    }

    #[test]
    fn regenerate_round_trip() {
        let mut session = session();
        let effect = session.apply(decide(1, ReviewAction::Regenerate)).unwrap();
        assert_eq!(effect, ReviewEffect::RegenerationRequested { index: 1, attempt: 1 });
        assert_eq!(session.slot(1).unwrap().state, SlotState::Regenerating);
        assert!(session.confirm().is_err());

        session
            .complete_regeneration(1, GenerationResult::success(7, PathBuf::from("b_r1.jpg")))
            .unwrap();
        let slot = session.slot(1).unwrap();
        assert_eq!(slot.state, SlotState::Pending);
        assert_eq!(slot.result.index, 1);
        assert_eq!(slot.result.path(), Some(PathBuf::from("b_r1.jpg").as_path()));
    }

    #[test]
    fn accept_rejects_failed_slot() {
        let mut session = session();
        assert!(session.apply(decide(1, ReviewAction::Accept)).is_err());
        assert_eq!(session.apply(decide(0, ReviewAction::Accept)).unwrap(), ReviewEffect::Updated);
        assert_eq!(session.slot(0).unwrap().state, SlotState::Accepted);
    }

    #[test]
    fn reorder_only_changes_display_order() {
        let mut session = session();
        session.apply(decide(2, ReviewAction::Reorder(0))).unwrap();
        assert_eq!(session.display_order(), &[2, 0, 1]);
        let results = session.confirm().unwrap();
        let indices: Vec<_> = results.iter().map(|r| r.index).collect();
        assert_eq!(indices, [2, 0, 1]);
        assert!(session.slots().iter().all(|s| s.state == SlotState::Final));
    }

    #[test]
    fn out_of_range_and_finalized_are_rejected() {
        let mut session = session();
        assert!(session.apply(decide(3, ReviewAction::Accept)).is_err());
        assert!(session.apply(decide(0, ReviewAction::Reorder(3))).is_err());
        session.confirm().unwrap();
        assert!(session.apply(decide(0, ReviewAction::Regenerate)).is_err());
    }
}
