//! Story validation - referential integrity and graph sanity checks.
//!
//! Every check runs regardless of earlier failures so an author sees the
//! whole list in one pass. A non-empty report blocks the investigation.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use story_model::StoryDefinition;

use crate::graph::ClueGraph;

/// Human-readable problems found in a story.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    issues: Vec<String>,
}

impl ValidationReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// A report with a single issue.
    pub fn single(issue: impl Into<String>) -> Self {
        Self {
            issues: vec![issue.into()],
        }
    }

    /// Add an issue.
    pub fn push(&mut self, issue: impl Into<String>) {
        self.issues.push(issue.into());
    }

    /// True when the story may be played.
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Number of issues.
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Issues in the order they were found.
    pub fn issues(&self) -> &[String] {
        &self.issues
    }

    /// Take ownership of the issues.
    pub fn into_issues(self) -> Vec<String> {
        self.issues
    }

    /// Text for the blocking error panel.
    pub fn render(&self) -> String {
        let mut text = String::from("ERRORS:");
        for issue in &self.issues {
            text.push_str("\n- ");
            text.push_str(issue);
        }
        text
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Check a story for content errors.
pub fn validate(story: &StoryDefinition) -> ValidationReport {
    let mut report = ValidationReport::new();

    if story.clues.is_empty() {
        report.push("Story has no clues.");
    }
    if story.objects.is_empty() {
        report.push("Story has no objects.");
    }

    let mut clue_ids = HashSet::new();
    for clue in &story.clues {
        if clue.id.is_empty() {
            report.push("A clue is missing an id.");
        } else if !clue_ids.insert(clue.id.as_str()) {
            report.push(format!("Duplicate clue id: {}", clue.id));
        }
    }

    let mut object_ids = HashSet::new();
    for object in &story.objects {
        if object.id.is_empty() {
            report.push("An object is missing an id.");
        } else if !object_ids.insert(object.id.as_str()) {
            report.push(format!("Duplicate object id: {}", object.id));
        }
    }

    let mut cluster_ids = HashSet::new();
    for cluster in &story.clusters {
        if cluster.id.is_empty() {
            report.push("A cluster is missing an id.");
            continue;
        }
        if !cluster_ids.insert(cluster.id.as_str()) {
            report.push(format!("Duplicate cluster id: {}", cluster.id));
        }
        if cluster.clue_ids.is_empty() {
            report.push(format!("Cluster {} has no clues.", cluster.id));
        }
    }

    for clue in &story.clues {
        if let Some(object_id) = &clue.object_id {
            if !object_ids.contains(object_id.as_str()) {
                report.push(format!(
                    "Clue {} references missing objectId: {}",
                    clue.id, object_id
                ));
            }
        }

        for prereq in &clue.prerequisites {
            if !clue_ids.contains(prereq.as_str()) {
                report.push(format!("Clue {} has missing prerequisite: {}", clue.id, prereq));
            }
        }

        for reveal in &clue.reveals_object_ids {
            if !object_ids.contains(reveal.as_str()) {
                report.push(format!("Clue {} reveals missing objectId: {}", clue.id, reveal));
            }
        }

        if let Some(cluster_id) = &clue.cluster_id {
            if !cluster_ids.contains(cluster_id.as_str()) {
                report.push(format!(
                    "Clue {} references missing clusterId: {}",
                    clue.id, cluster_id
                ));
            }
        }
    }

    let graph = ClueGraph::build(&story.clues);

    for cluster in &story.clusters {
        for clue_id in &cluster.clue_ids {
            if !clue_ids.contains(clue_id.as_str()) {
                report.push(format!(
                    "Cluster {} references missing clueId: {}",
                    cluster.id, clue_id
                ));
            }
        }

        // Empty clusters were reported above.
        if !cluster.clue_ids.is_empty() && !graph.completes_within(&cluster.clue_ids) {
            report.push(format!("Cluster {} has no valid completion path.", cluster.id));
        }
    }

    if let Some(cycle) = graph.find_cycle() {
        let path: Vec<&str> = cycle.iter().map(|id| id.as_str()).collect();
        report.push(format!("Clue graph contains a cycle: {}", path.join(" -> ")));
    }

    match &story.solution {
        None => report.push("Story solution is missing."),
        Some(solution) => {
            if !story.culprits.contains(&solution.culprit) {
                report.push("Solution culprit is not in culprits list.");
            }
            if !story.methods.contains(&solution.method) {
                report.push("Solution method is not in methods list.");
            }
            if !story.motives.contains(&solution.motive) {
                report.push("Solution motive is not in motives list.");
            }
        }
    }

    if !report.is_empty() {
        tracing::debug!(issues = report.len(), "story failed validation");
    }

    report
}
