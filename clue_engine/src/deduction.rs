//! Deduction Evaluator - the culprit / method / motive board.
//!
//! Three independent cursors over the story's option pools. The evaluator
//! never touches unlock state; gating the board on deduction availability is
//! the host's concern.

use serde::{Deserialize, Serialize};
use std::fmt;

use story_model::{DeductionSolution, StoryDefinition};

use crate::events::{EventBus, StoryEvent, SubscriptionId};

/// A wrapping cursor over one option pool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionCycle {
    options: Vec<String>,
    cursor: usize,
}

impl OptionCycle {
    /// Create a cycle positioned on the first option.
    pub fn new(options: Vec<String>) -> Self {
        Self { options, cursor: 0 }
    }

    /// Step forward, wrapping at the end. An empty pool stays put.
    pub fn advance(&mut self) {
        if !self.options.is_empty() {
            self.cursor = (self.cursor + 1) % self.options.len();
        }
    }

    /// Move back to the first option.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// The selected option, or `""` for an empty pool.
    pub fn current(&self) -> &str {
        match self.options.len() {
            0 => "",
            len => &self.options[self.cursor.min(len - 1)],
        }
    }

    /// Zero-based index of the selected option.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// All options, in authored order.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Number of options.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Whether the pool has no options.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// What the board currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub culprit: String,
    pub method: String,
    pub motive: String,
}

impl Selection {
    /// Exact, case-sensitive match on all three fields.
    pub fn matches(&self, solution: &DeductionSolution) -> bool {
        self.culprit == solution.culprit
            && self.method == solution.method
            && self.motive == solution.motive
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} / {}", self.culprit, self.method, self.motive)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub success: bool,
    pub selection: Selection,
}

#[derive(Debug)]
pub struct DeductionEvaluator {
    culprits: OptionCycle,
    methods: OptionCycle,
    motives: OptionCycle,
    solution: Option<DeductionSolution>,
    visible: bool,
    events: EventBus,
}

impl DeductionEvaluator {
    /// Create a hidden board over the story's pools and solution.
    pub fn new(story: &StoryDefinition) -> Self {
        Self {
            culprits: OptionCycle::new(story.culprits.clone()),
            methods: OptionCycle::new(story.methods.clone()),
            motives: OptionCycle::new(story.motives.clone()),
            solution: story.solution.clone(),
            visible: false,
            events: EventBus::new(),
        }
    }

    /// Swap in another story's pools and solution. Subscriptions survive; the
    /// board is hidden and its cursors start over.
    pub fn reload(&mut self, story: &StoryDefinition) {
        self.culprits = OptionCycle::new(story.culprits.clone());
        self.methods = OptionCycle::new(story.methods.clone());
        self.motives = OptionCycle::new(story.motives.clone());
        self.solution = story.solution.clone();
        self.visible = false;
    }

    /// Register an observer for board events.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&StoryEvent) + 'static,
    {
        self.events.subscribe(listener)
    }

    /// Remove a board observer.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Next culprit; returns the new selection.
    pub fn cycle_culprit(&mut self) -> &str {
        self.culprits.advance();
        self.culprits.current()
    }

    /// Next method; returns the new selection.
    pub fn cycle_method(&mut self) -> &str {
        self.methods.advance();
        self.methods.current()
    }

    /// Next motive; returns the new selection.
    pub fn cycle_motive(&mut self) -> &str {
        self.motives.advance();
        self.motives.current()
    }

    /// The culprit pool and its cursor.
    pub fn culprits(&self) -> &OptionCycle {
        &self.culprits
    }

    /// The method pool and its cursor.
    pub fn methods(&self) -> &OptionCycle {
        &self.methods
    }

    /// The motive pool and its cursor.
    pub fn motives(&self) -> &OptionCycle {
        &self.motives
    }

    /// The three options currently shown.
    pub fn current_selection(&self) -> Selection {
        Selection {
            culprit: self.culprits.current().to_string(),
            method: self.methods.current().to_string(),
            motive: self.motives.current().to_string(),
        }
    }

    /// Compare the current selection with the solution.
    ///
    /// A story without a solution can never be solved.
    pub fn submit(&mut self) -> Verdict {
        let selection = self.current_selection();
        let success = self
            .solution
            .as_ref()
            .is_some_and(|solution| selection.matches(solution));

        tracing::info!(success, %selection, "deduction submitted");
        self.events.emit(&StoryEvent::DeductionSubmitted { success });

        Verdict { success, selection }
    }

    /// Open the board. Cursors always start from the first option.
    pub fn show(&mut self) {
        self.culprits.reset();
        self.methods.reset();
        self.motives.reset();
        self.visible = true;
        self.events.emit(&StoryEvent::DeductionShown);
    }

    /// Close the board.
    pub fn hide(&mut self) {
        self.visible = false;
        self.events.emit(&StoryEvent::DeductionHidden);
    }

    /// Whether the board is open.
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}
