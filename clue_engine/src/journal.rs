//! Read models for the journal and pause menu.
//!
//! Pure snapshots built from an [`UnlockEngine`] between calls. Nothing here
//! mutates progression.

use serde::{Deserialize, Serialize};

use story_model::{ClueId, ClusterId};

use crate::config::FeedbackConfig;
use crate::unlock::{ClueState, UnlockEngine};

/// Progress line for one cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterProgress {
    pub id: ClusterId,
    pub title: String,
    pub description: String,
    pub unlocked: usize,
    pub total: usize,
    /// Present once the cluster is complete and has authored completion text.
    pub completion_text: Option<String>,
}

impl ClusterProgress {
    /// Every clue of a non-empty cluster is unlocked.
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.unlocked == self.total
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClueEntry {
    pub id: ClueId,
    pub title: String,
    pub text: String,
    pub state: ClueState,
}

/// Everything the journal panel shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalView {
    pub case_title: Option<String>,
    pub clusters: Vec<ClusterProgress>,
    pub clues: Vec<ClueEntry>,
    /// The "advance" action has something to unlock.
    pub can_advance: bool,
    /// The deduction board may be opened.
    pub can_deduce: bool,
}

impl JournalView {
    /// Snapshot the engine's current progression.
    pub fn build(engine: &UnlockEngine) -> Self {
        let clusters = engine
            .clusters()
            .iter()
            .map(|cluster| {
                let unlocked = engine.cluster_unlocked_count(cluster.id.as_str());
                let total = engine.cluster_total_count(cluster.id.as_str());
                let complete = total > 0 && unlocked == total;
                ClusterProgress {
                    id: cluster.id.clone(),
                    title: cluster.display_title().to_string(),
                    description: cluster.description.clone(),
                    unlocked,
                    total,
                    completion_text: (complete && !cluster.completion_text.is_empty())
                        .then(|| cluster.completion_text.clone()),
                }
            })
            .collect();

        let clues = engine
            .clues()
            .iter()
            .filter_map(|clue| {
                let state = engine.clue_state(clue.id.as_str())?;
                Some(ClueEntry {
                    id: clue.id.clone(),
                    title: clue.title.clone(),
                    text: clue.text().to_string(),
                    state,
                })
            })
            .collect();

        Self {
            case_title: engine.story().display_title().map(str::to_string),
            clusters,
            clues,
            can_advance: engine.eligible_count() > 0,
            can_deduce: engine.is_deduction_available(),
        }
    }

    /// Render the journal as plain text.
    pub fn render(&self) -> String {
        let mut out = String::new();

        if let Some(title) = &self.case_title {
            out.push_str(&format!("# {}\n\n", title));
        }

        if !self.clusters.is_empty() {
            out.push_str("## Clusters\n");
            for cluster in &self.clusters {
                out.push_str(&format!(
                    "{} [{}] {}/{}\n",
                    cluster.title, cluster.id, cluster.unlocked, cluster.total
                ));
                if !cluster.description.is_empty() {
                    out.push_str(&cluster.description);
                    out.push('\n');
                }
                if let Some(text) = &cluster.completion_text {
                    out.push_str(text);
                    out.push('\n');
                }
            }
            out.push('\n');
        }

        out.push_str("## Clues\n");
        for clue in &self.clues {
            out.push_str(&format!("{} {} {}", clue.state.marker(), clue.id, clue.title));
            if !clue.text.is_empty() {
                out.push_str(" - ");
                out.push_str(&clue.text);
            }
            out.push('\n');
        }

        out.trim_end().to_string()
    }
}

/// Pause-menu list of unlocked clue titles, in definition order.
pub fn unlocked_titles(engine: &UnlockEngine, config: &FeedbackConfig) -> String {
    let lines: Vec<String> = engine
        .clues()
        .iter()
        .filter(|clue| engine.is_unlocked(clue.id.as_str()))
        .map(|clue| format!("- {}", clue.title))
        .collect();

    if lines.is_empty() {
        config.no_unlocked_clues.clone()
    } else {
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::UnlockSource;
    use story_model::{ClueDefinition, ClusterDefinition, StoryDefinition};

    fn manor() -> StoryDefinition {
        StoryDefinition::new()
            .with_title("The Manor")
            .with_clue(
                ClueDefinition::new("C1")
                    .with_title("Torn Letter")
                    .with_description("Signed with an M.")
                    .in_cluster("K1"),
            )
            .with_clue(ClueDefinition::new("C2").with_title("Vial").requires("C1").in_cluster("K1"))
            .with_clue(ClueDefinition::new("C3").with_title("Footprint").requires("C2"))
            .with_cluster(
                ClusterDefinition::new("K1")
                    .with_title("The Study")
                    .with_description("Something happened here.")
                    .with_completion_text("The study gives up its secret.")
                    .with_clues(["C1", "C2"]),
            )
    }

    #[test]
    fn test_build_reports_states() {
        let mut engine = UnlockEngine::new(manor());
        engine.try_unlock("C1", UnlockSource::Tap);

        let view = JournalView::build(&engine);
        let states: Vec<ClueState> = view.clues.iter().map(|clue| clue.state).collect();
        assert_eq!(
            states,
            vec![ClueState::Unlocked, ClueState::Eligible, ClueState::Locked]
        );
        assert!(view.can_advance);
        assert!(!view.can_deduce);
        assert_eq!(view.clusters[0].unlocked, 1);
        assert_eq!(view.clusters[0].completion_text, None);
    }

    #[test]
    fn test_render_journal() {
        let mut engine = UnlockEngine::new(manor());
        engine.try_unlock("C1", UnlockSource::Tap);
        engine.try_unlock("C2", UnlockSource::Tap);

        let text = JournalView::build(&engine).render();
        assert!(text.starts_with("# The Manor"));
        assert!(text.contains(
            "The Study [K1] 2/2\nSomething happened here.\nThe study gives up its secret."
        ));
        assert!(text.contains("[x] C1 Torn Letter - Signed with an M."));
        assert!(text.contains("[x] C2 Vial\n"));
        assert!(text.ends_with("[>] C3 Footprint"));
    }

    #[test]
    fn test_cannot_advance_when_exhausted() {
        let mut engine = UnlockEngine::new(manor());
        while engine.unlock_first_eligible() {}

        let view = JournalView::build(&engine);
        assert!(!view.can_advance);
        assert!(view.clusters[0].is_complete());
    }

    #[test]
    fn test_unlocked_titles() {
        let config = FeedbackConfig::default();
        let mut engine = UnlockEngine::new(manor());
        assert_eq!(unlocked_titles(&engine, &config), "(No clues unlocked yet)");

        engine.try_unlock("C1", UnlockSource::Tap);
        engine.try_unlock("C2", UnlockSource::Tap);
        assert_eq!(unlocked_titles(&engine, &config), "- Torn Letter\n- Vial");
    }
}
