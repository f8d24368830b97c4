//! Progression events and the observer list that delivers them.
//!
//! Each publishing component owns its own [`EventBus`]. Delivery is
//! synchronous, in subscription order, on the caller's turn.
//!
//! Listeners must not call back into a mutating method of the component that
//! is delivering to them. There is no reentrancy protection; the borrow
//! checker already rules it out for listeners that do not smuggle shared
//! mutable handles to the publisher.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use story_model::{ClueDefinition, ClusterDefinition, ObjectId};

use crate::error::EngineError;

/// Where an unlock attempt came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnlockSource {
    /// The player tapped the clue's object. Only taps produce blocked feedback.
    Tap,
    /// The journal's "advance" action.
    Journal,
    /// Debug tooling.
    Debug,
}

impl UnlockSource {
    /// Wire name of the source.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnlockSource::Tap => "tap",
            UnlockSource::Journal => "journal",
            UnlockSource::Debug => "debug",
        }
    }

    /// Whether a refused attempt from this source is reported to observers.
    pub fn reports_blocked(&self) -> bool {
        matches!(self, UnlockSource::Tap)
    }
}

impl fmt::Display for UnlockSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnlockSource {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tap" => Ok(UnlockSource::Tap),
            "journal" => Ok(UnlockSource::Journal),
            "debug" => Ok(UnlockSource::Debug),
            other => Err(EngineError::UnknownSource(other.to_string())),
        }
    }
}

/// Everything observers can hear about.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StoryEvent {
    ClueUnlocked {
        clue: ClueDefinition,
        source: UnlockSource,
    },
    /// A tapped clue was not yet eligible.
    ClueUnlockBlocked { clue: ClueDefinition },
    /// Fired once per cluster, the first time all its clues are unlocked.
    ClusterCompleted {
        cluster: ClusterDefinition,
        message: String,
    },
    /// Fired only when the derived predicate flips.
    DeductionAvailabilityChanged { available: bool },
    /// An unlock made a world object visible.
    ObjectRevealed { object_id: ObjectId },
    DeductionShown,
    DeductionHidden,
    DeductionSubmitted { success: bool },
}

impl StoryEvent {
    /// Stable dotted name, used for logs and telemetry.
    pub fn event_type(&self) -> &'static str {
        match self {
            StoryEvent::ClueUnlocked { .. } => "clue.unlocked",
            StoryEvent::ClueUnlockBlocked { .. } => "clue.unlock_blocked",
            StoryEvent::ClusterCompleted { .. } => "cluster.completed",
            StoryEvent::DeductionAvailabilityChanged { .. } => "deduction.availability_changed",
            StoryEvent::ObjectRevealed { .. } => "object.revealed",
            StoryEvent::DeductionShown => "deduction.shown",
            StoryEvent::DeductionHidden => "deduction.hidden",
            StoryEvent::DeductionSubmitted { .. } => "deduction.submitted",
        }
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Listener = Box<dyn FnMut(&StoryEvent)>;

/// Ordered list of listeners owned by a publisher.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl EventBus {
    /// Create a bus with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It receives every later event.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&StoryEvent) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Deliver an event to every listener.
    pub fn emit(&mut self, event: &StoryEvent) {
        tracing::trace!(event = event.event_type(), listeners = self.listeners.len(), "emit");
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
