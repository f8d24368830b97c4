//! Playthrough telemetry.
//!
//! A [`TelemetryRecorder`] listens to engine and board events and keeps one
//! [`TelemetryRecord`] per interesting event. Records serialize to JSON Lines;
//! where the lines end up is the host's business.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

use crate::error::EngineError;
use crate::events::StoryEvent;

/// Source of record timestamps.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck at one instant, for deterministic records.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    /// RFC 3339, UTC.
    pub ts: DateTime<Utc>,
    pub playthrough: Uuid,
    pub event: String,
    pub detail: String,
}

impl TelemetryRecord {
    /// Encode as a single JSON line, without the newline.
    pub fn to_json_line(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Shared handle to one playthrough's records.
///
/// Clones share the same buffer, so a clone can be moved into a listener
/// while the host keeps another to read from.
#[derive(Clone)]
pub struct TelemetryRecorder {
    playthrough: Uuid,
    clock: Rc<dyn Clock>,
    records: Rc<RefCell<Vec<TelemetryRecord>>>,
}

impl TelemetryRecorder {
    /// Start a new playthrough on the wall clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Start a new playthrough with a fresh v4 id.
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            playthrough: Uuid::new_v4(),
            clock: Rc::new(clock),
            records: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Id shared by every record of this playthrough.
    pub fn playthrough(&self) -> Uuid {
        self.playthrough
    }

    /// Append a record stamped with the current time.
    pub fn record(&self, event: impl Into<String>, detail: impl Into<String>) {
        let record = TelemetryRecord {
            ts: self.clock.now(),
            playthrough: self.playthrough,
            event: event.into(),
            detail: detail.into(),
        };
        tracing::trace!(event = %record.event, detail = %record.detail, "telemetry");
        self.records.borrow_mut().push(record);
    }

    /// Record an event if it is one telemetry cares about.
    pub fn observe(&self, event: &StoryEvent) {
        match event {
            StoryEvent::ClueUnlocked { clue, .. } => self.record("clue_unlock", clue.id.as_str()),
            StoryEvent::ClusterCompleted { cluster, .. } => {
                self.record("cluster_complete", cluster.id.as_str())
            }
            StoryEvent::DeductionAvailabilityChanged { available } => {
                self.record("deduction_available", available.to_string())
            }
            StoryEvent::DeductionSubmitted { success } => {
                self.record("deduction", if *success { "success" } else { "fail" })
            }
            _ => {}
        }
    }

    /// A listener feeding this recorder, for `subscribe`.
    pub fn listener(&self) -> impl FnMut(&StoryEvent) + 'static {
        let recorder = self.clone();
        move |event| recorder.observe(event)
    }

    /// Copy of every buffered record, oldest first.
    pub fn records(&self) -> Vec<TelemetryRecord> {
        self.records.borrow().clone()
    }

    /// Number of buffered records.
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    /// Whether no record has been buffered.
    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    /// All records as JSON Lines, each terminated by `\n`.
    pub fn to_jsonl(&self) -> Result<String, EngineError> {
        let mut out = String::new();
        for record in self.records.borrow().iter() {
            out.push_str(&record.to_json_line()?);
            out.push('\n');
        }
        Ok(out)
    }

    /// Hand the buffered records to the caller and start over.
    pub fn drain(&self) -> Vec<TelemetryRecord> {
        std::mem::take(&mut *self.records.borrow_mut())
    }
}

impl Default for TelemetryRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TelemetryRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelemetryRecorder")
            .field("playthrough", &self.playthrough)
            .field("records", &self.records.borrow().len())
            .finish()
    }
}
