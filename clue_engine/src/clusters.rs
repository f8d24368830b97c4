//! Cluster Tracker - one-shot completion detection for clue clusters.

use std::collections::BTreeSet;

use story_model::{ClueId, ClusterDefinition, ClusterId};

/// Whether every clue of a non-empty cluster is unlocked.
pub fn is_cluster_complete(cluster: &ClusterDefinition, unlocked: &BTreeSet<ClueId>) -> bool {
    !cluster.clue_ids.is_empty() && cluster.clue_ids.iter().all(|id| unlocked.contains(id))
}

/// Text announced when a cluster completes.
pub fn completion_message(cluster: &ClusterDefinition) -> String {
    if cluster.completion_text.is_empty() {
        format!("Cluster complete: {}", cluster.display_title())
    } else {
        cluster.completion_text.clone()
    }
}

/// Remembers which clusters have already fired.
#[derive(Debug, Clone, Default)]
pub struct ClusterTracker {
    completed: BTreeSet<ClusterId>,
}

impl ClusterTracker {
    /// Create a tracker with nothing completed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every completion, for a restarted story.
    pub fn reset(&mut self) {
        self.completed.clear();
    }

    /// Whether the cluster has already been announced.
    pub fn is_completed(&self, cluster_id: &str) -> bool {
        self.completed.contains(cluster_id)
    }

    /// Ids of every completed cluster.
    pub fn completed(&self) -> &BTreeSet<ClusterId> {
        &self.completed
    }

    /// Mark and return the clusters that became complete since the last call,
    /// in definition order.
    pub fn detect<'a>(
        &mut self,
        clusters: &'a [ClusterDefinition],
        unlocked: &BTreeSet<ClueId>,
    ) -> Vec<&'a ClusterDefinition> {
        let mut newly_completed = Vec::new();

        for cluster in clusters {
            if cluster.id.is_empty() || self.completed.contains(&cluster.id) {
                continue;
            }
            if is_cluster_complete(cluster, unlocked) {
                self.completed.insert(cluster.id.clone());
                newly_completed.push(cluster);
            }
        }

        newly_completed
    }
}
