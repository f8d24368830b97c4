//! Investigation session - the composition root a host drives.
//!
//! Owns one validated story's [`UnlockEngine`] and [`DeductionEvaluator`],
//! translates their events into player-facing toasts, and exposes the intent
//! methods the presentation layer calls.
//!
//! Taps are only accepted while investigating: after
//! [`Investigation::start_investigation`], not paused, and with the deduction
//! board closed.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use story_model::StoryDefinition;

use crate::config::FeedbackConfig;
use crate::deduction::{DeductionEvaluator, Verdict};
use crate::events::{StoryEvent, SubscriptionId, UnlockSource};
use crate::journal::{unlocked_titles, JournalView};
use crate::telemetry::TelemetryRecorder;
use crate::unlock::UnlockEngine;
use crate::validator::{validate, ValidationReport};

type BeginCallback = Box<dyn FnMut(&StoryDefinition)>;

fn toast_listener(
    config: FeedbackConfig,
    toasts: Rc<RefCell<VecDeque<String>>>,
) -> impl FnMut(&StoryEvent) + 'static {
    move |event| {
        if let Some(toast) = config.toast_for(event) {
            toasts.borrow_mut().push_back(toast);
        }
    }
}

/// Refuse any story with content errors.
fn check(story: &StoryDefinition) -> Result<(), ValidationReport> {
    let report = validate(story);
    if report.is_empty() {
        Ok(())
    } else {
        tracing::warn!(issues = report.len(), "story rejected, gameplay refused");
        Err(report)
    }
}

fn load_failure(err: impl fmt::Display) -> ValidationReport {
    ValidationReport::single(format!("Failed to load story: {}", err))
}

/// One playthrough of one validated story.
pub struct Investigation {
    engine: UnlockEngine,
    board: DeductionEvaluator,
    config: FeedbackConfig,
    toasts: Rc<RefCell<VecDeque<String>>>,
    on_begin: Vec<BeginCallback>,
    started: bool,
    paused: bool,
}

impl Investigation {
    /// Validate `story` and build a session for it.
    ///
    /// Any validation issue refuses gameplay; the full report is returned.
    pub fn begin(
        story: StoryDefinition,
        config: FeedbackConfig,
    ) -> Result<Self, ValidationReport> {
        check(&story)?;

        let toasts = Rc::new(RefCell::new(VecDeque::new()));
        let mut board = DeductionEvaluator::new(&story);
        let mut engine = UnlockEngine::new(story);
        engine.subscribe(toast_listener(config.clone(), Rc::clone(&toasts)));
        board.subscribe(toast_listener(config.clone(), Rc::clone(&toasts)));

        tracing::info!(
            title = engine.story().display_title().unwrap_or(""),
            clues = engine.clues().len(),
            "investigation ready"
        );

        Ok(Self {
            engine,
            board,
            config,
            toasts,
            on_begin: Vec::new(),
            started: false,
            paused: false,
        })
    }

    /// Parse a JSON case file, then [`Investigation::begin`].
    ///
    /// A parse failure is reported as a one-issue validation report.
    pub fn from_json_str(
        source: &str,
        config: FeedbackConfig,
    ) -> Result<Self, ValidationReport> {
        let story = StoryDefinition::from_json_str(source).map_err(load_failure)?;
        Self::begin(story, config)
    }

    /// Parse a TOML case file, then [`Investigation::begin`].
    pub fn from_toml_str(
        source: &str,
        config: FeedbackConfig,
    ) -> Result<Self, ValidationReport> {
        let story = StoryDefinition::from_toml_str(source).map_err(load_failure)?;
        Self::begin(story, config)
    }

    /// Replace the story and start over.
    ///
    /// The new story goes through the same validation as [`Investigation::begin`];
    /// on failure the running investigation is left untouched. On success the
    /// engine and board are reset to the new story with every subscription
    /// kept (toasts, telemetry, host observers, `on_begin` callbacks), queued
    /// toasts are dropped, and the session is back before its start.
    pub fn restart(&mut self, story: StoryDefinition) -> Result<(), ValidationReport> {
        check(&story)?;

        self.board.reload(&story);
        self.engine.initialize(story);
        self.toasts.borrow_mut().clear();
        self.started = false;
        self.paused = false;

        tracing::info!(
            title = self.engine.story().display_title().unwrap_or(""),
            "investigation restarted"
        );
        Ok(())
    }

    /// Register a callback fired once by [`Investigation::start_investigation`].
    pub fn on_begin<F>(&mut self, callback: F)
    where
        F: FnMut(&StoryDefinition) + 'static,
    {
        self.on_begin.push(Box::new(callback));
    }

    /// Begin play. The first call notifies `on_begin` callbacks and returns
    /// the intro text if the story has one; later calls do nothing.
    pub fn start_investigation(&mut self) -> Option<String> {
        if self.started {
            return None;
        }
        self.started = true;
        tracing::info!("investigation started");

        for callback in self.on_begin.iter_mut() {
            callback(self.engine.story());
        }

        self.engine
            .story()
            .intro_text
            .clone()
            .filter(|intro| !intro.is_empty())
    }

    /// Whether [`Investigation::start_investigation`] has run.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Pause or resume. Taps are ignored while paused.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        tracing::debug!(paused, "pause changed");
    }

    /// Whether the session is paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether a tap would currently reach the engine.
    pub fn accepts_taps(&self) -> bool {
        self.started && !self.paused && !self.board.is_visible()
    }

    /// Feed engine and board events into `recorder`.
    pub fn attach_telemetry(&mut self, recorder: &TelemetryRecorder) {
        self.engine.subscribe(recorder.listener());
        self.board.subscribe(recorder.listener());
    }

    /// Observe unlock, reveal, cluster and availability events.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&StoryEvent) + 'static,
    {
        self.engine.subscribe(listener)
    }

    /// Drop an observer added with [`Investigation::subscribe`].
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.engine.unsubscribe(id)
    }

    /// Observe deduction board events.
    pub fn subscribe_board<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&StoryEvent) + 'static,
    {
        self.board.subscribe(listener)
    }

    /// Drop an observer added with [`Investigation::subscribe_board`].
    pub fn unsubscribe_board(&mut self, id: SubscriptionId) -> bool {
        self.board.unsubscribe(id)
    }

    /// Read access to progression state.
    pub fn engine(&self) -> &UnlockEngine {
        &self.engine
    }

    /// Read access to the deduction board.
    pub fn board(&self) -> &DeductionEvaluator {
        &self.board
    }

    /// The feedback texts in use.
    pub fn config(&self) -> &FeedbackConfig {
        &self.config
    }

    /// The player tapped the object carrying `clue_id`.
    pub fn tap(&mut self, clue_id: &str) -> bool {
        if !self.accepts_taps() {
            tracing::debug!(
                clue = clue_id,
                started = self.started,
                paused = self.paused,
                board = self.board.is_visible(),
                "tap ignored outside investigation"
            );
            return false;
        }
        self.engine.try_unlock(clue_id, UnlockSource::Tap)
    }

    /// Tap a world object. Routed to the clue placed on it; hidden objects and
    /// objects without a clue are ignored.
    pub fn tap_object(&mut self, object_id: &str) -> bool {
        if !self.engine.is_revealed(object_id) {
            tracing::debug!(object = object_id, "tap on hidden object ignored");
            return false;
        }
        let Some(clue_id) = self
            .engine
            .story()
            .clue_for_object(object_id)
            .map(|clue| clue.id.clone())
        else {
            return false;
        };
        self.tap(clue_id.as_str())
    }

    /// Journal "advance". Returns the failure text when nothing was eligible.
    pub fn advance_from_journal(&mut self) -> Option<String> {
        if self.engine.unlock_first_eligible() {
            None
        } else {
            Some(self.config.no_eligible_clues.clone())
        }
    }

    /// Debug console unlock, past prerequisites and tap gating.
    pub fn debug_unlock(&mut self, clue_id: &str) -> bool {
        self.engine.force_unlock(clue_id)
    }

    /// Show the deduction board, but only once a deduction is available.
    pub fn open_deduction(&mut self) -> bool {
        if !self.engine.is_deduction_available() {
            tracing::debug!("deduction board requested before it is available");
            return false;
        }
        self.board.show();
        true
    }

    /// Hide the board if it is open.
    pub fn close_deduction(&mut self) {
        if self.board.is_visible() {
            self.board.hide();
        }
    }

    /// Next culprit; returns the new selection.
    pub fn cycle_culprit(&mut self) -> &str {
        self.board.cycle_culprit()
    }

    /// Next method; returns the new selection.
    pub fn cycle_method(&mut self) -> &str {
        self.board.cycle_method()
    }

    /// Next motive; returns the new selection.
    pub fn cycle_motive(&mut self) -> &str {
        self.board.cycle_motive()
    }

    /// Submit the board's current selection. The verdict text is queued as a
    /// toast and available from [`Investigation::verdict_message`].
    pub fn submit_deduction(&mut self) -> Verdict {
        self.board.submit()
    }

    /// Feedback text for a verdict.
    pub fn verdict_message(&self, verdict: &Verdict) -> &str {
        self.config.verdict_message(verdict.success)
    }

    /// Take every toast queued since the last call, oldest first.
    pub fn take_toasts(&mut self) -> Vec<String> {
        self.toasts.borrow_mut().drain(..).collect()
    }

    /// Snapshot for the journal panel.
    pub fn journal(&self) -> JournalView {
        JournalView::build(&self.engine)
    }

    /// Pause-menu clue list.
    pub fn unlocked_titles(&self) -> String {
        unlocked_titles(&self.engine, &self.config)
    }
}

impl fmt::Debug for Investigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Investigation")
            .field("engine", &self.engine)
            .field("board", &self.board)
            .field("started", &self.started)
            .field("paused", &self.paused)
            .field("toasts", &self.toasts.borrow().len())
            .finish()
    }
}
