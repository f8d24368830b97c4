//! Player-facing feedback strings.
//!
//! Every text the engine's observers show to the player lives here, so a case
//! can ship its own wording. Loaded from TOML; missing keys keep their defaults.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::events::StoryEvent;

/// Toast and panel texts used by the investigation session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Shown when a tapped clue is not yet eligible.
    pub blocked_unlock: String,

    /// Used for unlocked clues without text. `{title}` is substituted.
    pub clue_unlocked: String,

    /// Shown when the deduction board becomes available.
    pub deduction_ready: String,

    pub verdict_correct: String,
    pub verdict_incorrect: String,

    /// Journal "advance" found nothing to unlock.
    pub no_eligible_clues: String,

    /// Placeholder for an empty unlocked-clue list.
    pub no_unlocked_clues: String,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            blocked_unlock: "Something is missing.".to_string(),
            clue_unlocked: "Clue unlocked: {title}".to_string(),
            deduction_ready: "Deduction ready. Review the board when ready.".to_string(),
            verdict_correct: "Correct! Case solved.".to_string(),
            verdict_incorrect: "Incorrect. Re-evaluate the evidence.".to_string(),
            no_eligible_clues: "No eligible clues.".to_string(),
            no_unlocked_clues: "(No clues unlocked yet)".to_string(),
        }
    }
}

impl FeedbackConfig {
    /// Parse a (possibly partial) TOML feedback file.
    pub fn from_toml_str(source: &str) -> Result<Self, EngineError> {
        Ok(toml::from_str(source)?)
    }

    /// Text for a deduction verdict.
    pub fn verdict_message(&self, success: bool) -> &str {
        if success {
            &self.verdict_correct
        } else {
            &self.verdict_incorrect
        }
    }

    /// The toast an event produces, if any.
    pub fn toast_for(&self, event: &StoryEvent) -> Option<String> {
        match event {
            StoryEvent::ClueUnlocked { clue, .. } => {
                let text = clue.text();
                Some(if text.is_empty() {
                    self.clue_unlocked.replace("{title}", &clue.title)
                } else {
                    format!("{} - {}", clue.title, text)
                })
            }
            StoryEvent::ClueUnlockBlocked { .. } => Some(self.blocked_unlock.clone()),
            StoryEvent::ClusterCompleted { message, .. } => Some(message.clone()),
            StoryEvent::DeductionAvailabilityChanged { available: true } => {
                Some(self.deduction_ready.clone())
            }
            StoryEvent::DeductionSubmitted { success } => {
                Some(self.verdict_message(*success).to_string())
            }
            StoryEvent::DeductionAvailabilityChanged { available: false }
            | StoryEvent::ObjectRevealed { .. }
            | StoryEvent::DeductionShown
            | StoryEvent::DeductionHidden => None,
        }
    }
}
