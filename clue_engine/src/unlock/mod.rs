//! Unlock Engine - owns the story and every piece of progression state.
//!
//! Per clue the lifecycle is `Locked -> Eligible -> Unlocked`, and `Unlocked`
//! is terminal. All mutation goes through [`UnlockEngine::try_unlock`] (or the
//! debug-only [`UnlockEngine::force_unlock`]); each call is one complete,
//! synchronous transition followed by event delivery.

mod state;

pub use state::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use story_model::{
    ClueDefinition, ClueId, ClusterDefinition, ClusterId, ObjectId, StoryDefinition,
};

use crate::clusters::{completion_message, is_cluster_complete, ClusterTracker};
use crate::events::{EventBus, StoryEvent, SubscriptionId, UnlockSource};
use crate::graph::ClueGraph;

/// Public state of a single clue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClueState {
    /// Some prerequisite is still locked.
    Locked,
    /// Every prerequisite is unlocked, the clue itself is not.
    Eligible,
    Unlocked,
}

impl ClueState {
    /// Journal status marker.
    pub fn marker(self) -> &'static str {
        match self {
            ClueState::Locked => "[ ]",
            ClueState::Eligible => "[>]",
            ClueState::Unlocked => "[x]",
        }
    }
}

fn prerequisites_met(clue: &ClueDefinition, unlocked: &BTreeSet<ClueId>) -> bool {
    clue.prerequisites.iter().all(|prereq| unlocked.contains(prereq))
}

/// The stateful heart of a playthrough.
#[derive(Debug)]
pub struct UnlockEngine {
    story: StoryDefinition,
    graph: ClueGraph,
    state: UnlockState,
    clusters: ClusterTracker,
    deduction_available: bool,
    events: EventBus,
}

impl UnlockEngine {
    /// Create an engine and initialize it from `story`.
    ///
    /// The story is expected to have passed [`crate::validate`].
    pub fn new(story: StoryDefinition) -> Self {
        let mut engine = Self {
            story: StoryDefinition::default(),
            graph: ClueGraph::default(),
            state: UnlockState::new(),
            clusters: ClusterTracker::new(),
            deduction_available: false,
            events: EventBus::new(),
        };
        engine.initialize(story);
        engine
    }

    /// Reset all runtime state for a new (or restarted) story.
    ///
    /// Subscriptions survive. Objects flagged `starts_visible` are revealed
    /// without events. If deduction availability differs from before the
    /// reset, the flip is reported.
    pub fn initialize(&mut self, story: StoryDefinition) {
        self.graph = ClueGraph::build(&story.clues);
        self.story = story;
        self.state.clear();
        self.clusters.reset();

        for object in &self.story.objects {
            if object.starts_visible {
                self.state.reveal(object.id.clone());
            }
        }

        for clue in &self.story.clues {
            if prerequisites_met(clue, self.state.unlocked()) {
                self.state.mark_eligible(clue.id.clone());
            }
        }

        tracing::info!(
            clues = self.story.clues.len(),
            objects = self.story.objects.len(),
            clusters = self.story.clusters.len(),
            eligible = self.state.eligible().len(),
            "unlock engine initialized"
        );

        self.refresh_deduction_availability();
    }

    /// Register an observer for unlock, reveal, cluster and availability events.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&StoryEvent) + 'static,
    {
        self.events.subscribe(listener)
    }

    /// Remove an observer. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// The story currently loaded.
    pub fn story(&self) -> &StoryDefinition {
        &self.story
    }

    /// Authored clues in definition order.
    pub fn clues(&self) -> &[ClueDefinition] {
        &self.story.clues
    }

    /// Authored clusters in definition order.
    pub fn clusters(&self) -> &[ClusterDefinition] {
        &self.story.clusters
    }

    /// Definition of a clue, if the id is known.
    pub fn clue(&self, clue_id: &str) -> Option<&ClueDefinition> {
        self.graph
            .position(clue_id)
            .map(|position| &self.story.clues[position])
    }

    /// Whether the clue has been unlocked.
    pub fn is_unlocked(&self, clue_id: &str) -> bool {
        self.state.is_unlocked(clue_id)
    }

    /// True iff the clue exists, is not unlocked, and all its prerequisites are.
    pub fn is_eligible(&self, clue_id: &str) -> bool {
        match self.clue(clue_id) {
            Some(clue) => {
                !self.state.is_unlocked(clue_id) && prerequisites_met(clue, self.state.unlocked())
            }
            None => false,
        }
    }

    /// `None` for unknown ids.
    pub fn clue_state(&self, clue_id: &str) -> Option<ClueState> {
        self.clue(clue_id)?;
        Some(if self.is_unlocked(clue_id) {
            ClueState::Unlocked
        } else if self.is_eligible(clue_id) {
            ClueState::Eligible
        } else {
            ClueState::Locked
        })
    }

    /// Attempt the normal unlock transition.
    ///
    /// Unknown ids return false silently. Ineligible clues return false and,
    /// for taps only, emit [`StoryEvent::ClueUnlockBlocked`].
    pub fn try_unlock(&mut self, clue_id: &str, source: UnlockSource) -> bool {
        let Some(position) = self.graph.position(clue_id) else {
            tracing::debug!(clue = clue_id, %source, "unlock ignored: unknown clue");
            return false;
        };

        if !self.is_eligible(clue_id) {
            if source.reports_blocked() {
                tracing::debug!(clue = clue_id, %source, "unlock blocked");
                let clue = self.story.clues[position].clone();
                self.events.emit(&StoryEvent::ClueUnlockBlocked { clue });
            } else {
                tracing::debug!(clue = clue_id, %source, "unlock ignored: not eligible");
            }
            return false;
        }

        self.apply_unlock(position, source);
        true
    }

    /// Unlock the first eligible clue in definition order, as the journal does.
    pub fn unlock_first_eligible(&mut self) -> bool {
        let candidate = self
            .story
            .clues
            .iter()
            .map(|clue| clue.id.clone())
            .find(|id| self.is_eligible(id.as_str()));

        match candidate {
            Some(id) => self.try_unlock(id.as_str(), UnlockSource::Journal),
            None => {
                tracing::debug!("no eligible clue to advance");
                false
            }
        }
    }

    /// Debug override: unlock a clue whether or not its prerequisites are met.
    ///
    /// Reported through the same events as a normal unlock, tagged
    /// [`UnlockSource::Debug`]. Unknown or already unlocked clues return false.
    pub fn force_unlock(&mut self, clue_id: &str) -> bool {
        let Some(position) = self.graph.position(clue_id) else {
            return false;
        };
        if self.state.is_unlocked(clue_id) {
            return false;
        }

        tracing::warn!(clue = clue_id, "forcing unlock past prerequisites");
        self.apply_unlock(position, UnlockSource::Debug);
        true
    }

    fn apply_unlock(&mut self, position: usize, source: UnlockSource) {
        let clue = self.story.clues[position].clone();
        self.state.unlock(clue.id.clone());
        tracing::info!(clue = %clue.id, %source, "clue unlocked");

        for object_id in &clue.reveals_object_ids {
            self.state.reveal(object_id.clone());
            tracing::info!(object = %object_id, clue = %clue.id, "object revealed");
            self.events.emit(&StoryEvent::ObjectRevealed {
                object_id: object_id.clone(),
            });
        }

        self.refresh_eligibility(&clue.id);
        self.refresh_deduction_availability();
        self.events.emit(&StoryEvent::ClueUnlocked { clue, source });

        let completed: Vec<(ClusterDefinition, String)> = self
            .clusters
            .detect(&self.story.clusters, self.state.unlocked())
            .into_iter()
            .map(|cluster| (cluster.clone(), completion_message(cluster)))
            .collect();

        for (cluster, message) in completed {
            tracing::info!(cluster = %cluster.id, "cluster completed");
            self.events
                .emit(&StoryEvent::ClusterCompleted { cluster, message });
        }
    }

    /// Only dependents of the newly unlocked clue can change eligibility.
    fn refresh_eligibility(&mut self, unlocked_id: &ClueId) {
        for dependent in self.graph.dependents_of(unlocked_id.as_str()) {
            if self.state.is_unlocked(dependent.as_str()) {
                continue;
            }
            let Some(position) = self.graph.position(dependent.as_str()) else {
                continue;
            };
            if prerequisites_met(&self.story.clues[position], self.state.unlocked()) {
                self.state.mark_eligible(dependent.clone());
            }
        }

        tracing::debug!(eligible = self.state.eligible().len(), "eligibility recomputed");
    }

    fn refresh_deduction_availability(&mut self) {
        let available = self.compute_deduction_available();
        if available != self.deduction_available {
            self.deduction_available = available;
            tracing::info!(available, "deduction availability changed");
            self.events
                .emit(&StoryEvent::DeductionAvailabilityChanged { available });
        }
    }

    /// Every required clue unlocked (and at least one clue is required), or
    /// some cluster complete together with every essential clue.
    fn compute_deduction_available(&self) -> bool {
        let unlocked = self.state.unlocked();

        let mut required = self.story.clues.iter().filter(|clue| clue.required).peekable();
        let all_required =
            required.peek().is_some() && required.all(|clue| unlocked.contains(&clue.id));

        let any_cluster_complete = self
            .story
            .clusters
            .iter()
            .any(|cluster| is_cluster_complete(cluster, unlocked));
        let essentials_met = self.story.essentials.iter().all(|id| unlocked.contains(id));

        all_required || (any_cluster_complete && essentials_met)
    }

    /// Current value of the deduction availability predicate.
    pub fn is_deduction_available(&self) -> bool {
        self.deduction_available
    }

    /// Every unlocked clue id.
    pub fn unlocked_clues(&self) -> &BTreeSet<ClueId> {
        self.state.unlocked()
    }

    /// Unlocked clues in the order they were unlocked.
    pub fn unlock_history(&self) -> &[ClueId] {
        self.state.history()
    }

    /// Number of unlocked clues.
    pub fn unlocked_count(&self) -> usize {
        self.state.unlocked_count()
    }

    /// Clues currently eligible to unlock.
    pub fn eligible_clues(&self) -> &BTreeSet<ClueId> {
        self.state.eligible()
    }

    /// Number of eligible clues.
    pub fn eligible_count(&self) -> usize {
        self.state.eligible().len()
    }

    /// Whether the object is visible in the scene.
    pub fn is_revealed(&self, object_id: &str) -> bool {
        self.state.is_revealed(object_id)
    }

    /// Every visible object id.
    pub fn revealed_objects(&self) -> &BTreeSet<ObjectId> {
        self.state.revealed()
    }

    /// Whether the cluster completion has been announced.
    pub fn is_cluster_completed(&self, cluster_id: &str) -> bool {
        self.clusters.is_completed(cluster_id)
    }

    /// Every cluster announced as complete.
    pub fn completed_clusters(&self) -> &BTreeSet<ClusterId> {
        self.clusters.completed()
    }

    /// Unlocked clues of a cluster. Zero for unknown clusters.
    pub fn cluster_unlocked_count(&self, cluster_id: &str) -> usize {
        self.story
            .cluster(cluster_id)
            .map(|cluster| {
                cluster
                    .clue_ids
                    .iter()
                    .filter(|id| self.state.is_unlocked(id.as_str()))
                    .count()
            })
            .unwrap_or(0)
    }

    /// Number of clues in a cluster. Zero for unknown clusters.
    pub fn cluster_total_count(&self, cluster_id: &str) -> usize {
        self.story
            .cluster(cluster_id)
            .map(|cluster| cluster.clue_ids.len())
            .unwrap_or(0)
    }
}
