//! Runtime unlock state for one playthrough.

use std::collections::BTreeSet;

use story_model::{ClueId, ObjectId};

/// Which clues are unlocked or eligible and which objects are visible.
///
/// Only ever grows between resets; nothing is removed from `unlocked` or
/// `revealed`.
#[derive(Debug, Clone, Default)]
pub struct UnlockState {
    unlocked: BTreeSet<ClueId>,
    revealed: BTreeSet<ObjectId>,
    /// Cached eligible set, kept equal to the eligibility predicate.
    eligible: BTreeSet<ClueId>,
    /// Unlock order, for history views.
    history: Vec<ClueId>,
}

impl UnlockState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all progress.
    pub fn clear(&mut self) {
        self.unlocked.clear();
        self.revealed.clear();
        self.eligible.clear();
        self.history.clear();
    }

    /// Whether the clue is unlocked.
    pub fn is_unlocked(&self, clue_id: &str) -> bool {
        self.unlocked.contains(clue_id)
    }

    /// Whether the object is revealed.
    pub fn is_revealed(&self, object_id: &str) -> bool {
        self.revealed.contains(object_id)
    }

    /// Whether the clue is in the cached eligible set.
    pub fn is_marked_eligible(&self, clue_id: &str) -> bool {
        self.eligible.contains(clue_id)
    }

    /// Record an unlock. Returns false if the clue was already unlocked.
    pub fn unlock(&mut self, clue_id: ClueId) -> bool {
        if self.unlocked.contains(&clue_id) {
            return false;
        }
        self.eligible.remove(&clue_id);
        self.history.push(clue_id.clone());
        self.unlocked.insert(clue_id)
    }

    /// Mark an object visible. Returns false if it already was.
    pub fn reveal(&mut self, object_id: ObjectId) -> bool {
        self.revealed.insert(object_id)
    }

    /// Add a clue to the cached eligible set.
    pub fn mark_eligible(&mut self, clue_id: ClueId) {
        self.eligible.insert(clue_id);
    }

    /// Unlocked clue ids.
    pub fn unlocked(&self) -> &BTreeSet<ClueId> {
        &self.unlocked
    }

    /// Revealed object ids.
    pub fn revealed(&self) -> &BTreeSet<ObjectId> {
        &self.revealed
    }

    /// Cached eligible clue ids.
    pub fn eligible(&self) -> &BTreeSet<ClueId> {
        &self.eligible
    }

    /// Unlocked clues in unlock order.
    pub fn history(&self) -> &[ClueId] {
        &self.history
    }

    /// Number of unlocked clues.
    pub fn unlocked_count(&self) -> usize {
        self.unlocked.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlock_is_idempotent() {
        let mut state = UnlockState::new();
        state.mark_eligible(ClueId::from("C1"));

        assert!(state.unlock(ClueId::from("C1")));
        assert!(!state.unlock(ClueId::from("C1")));

        assert!(state.is_unlocked("C1"));
        assert!(!state.is_marked_eligible("C1"));
        assert_eq!(state.history(), &[ClueId::from("C1")]);
        assert_eq!(state.unlocked_count(), 1);
    }

    #[test]
    fn test_reveal_and_clear() {
        let mut state = UnlockState::new();
        assert!(state.reveal(ObjectId::from("vial")));
        assert!(!state.reveal(ObjectId::from("vial")));
        assert!(state.is_revealed("vial"));

        state.clear();
        assert!(!state.is_revealed("vial"));
        assert!(state.revealed().is_empty());
    }
}
