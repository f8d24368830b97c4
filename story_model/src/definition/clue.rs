//! Clue definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::ids::{ClueId, ClusterId, ObjectId};

/// A single authored clue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClueDefinition {
    #[serde(default)]
    pub id: ClueId,

    #[serde(default, deserialize_with = "crate::serde_util::null_as_default")]
    pub title: String,

    #[serde(default, deserialize_with = "crate::serde_util::blank_as_none")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "crate::serde_util::blank_as_none")]
    pub summary: Option<String>,

    /// World object this clue is attached to (tapping it attempts the unlock).
    #[serde(default, deserialize_with = "crate::serde_util::blank_as_none")]
    pub object_id: Option<ObjectId>,

    /// Clues that must be unlocked before this one becomes eligible.
    #[serde(default, deserialize_with = "crate::serde_util::null_as_default")]
    pub prerequisites: BTreeSet<ClueId>,

    /// Objects made visible when this clue unlocks.
    #[serde(default, deserialize_with = "crate::serde_util::null_as_default")]
    pub reveals_object_ids: BTreeSet<ObjectId>,

    #[serde(default, deserialize_with = "crate::serde_util::blank_as_none")]
    pub cluster_id: Option<ClusterId>,

    /// Presentation layer the clue lives on. Passed through untouched.
    #[serde(default, deserialize_with = "crate::serde_util::blank_as_none")]
    pub mode_layer: Option<String>,

    /// Counts towards the "all required clues" deduction gate.
    #[serde(default)]
    pub required: bool,
}

impl ClueDefinition {
    /// Create a clue with no prerequisites and no reveals.
    pub fn new(id: impl Into<ClueId>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            description: None,
            summary: None,
            object_id: None,
            prerequisites: BTreeSet::new(),
            reveals_object_ids: BTreeSet::new(),
            cluster_id: None,
            mode_layer: None,
            required: false,
        }
    }

    /// Set the player-facing title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the long description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the short summary, used when there is no description.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Place the clue on a world object.
    pub fn on_object(mut self, object_id: impl Into<ObjectId>) -> Self {
        self.object_id = Some(object_id.into());
        self
    }

    /// Add a prerequisite. Repeated ids collapse.
    pub fn requires(mut self, clue_id: impl Into<ClueId>) -> Self {
        self.prerequisites.insert(clue_id.into());
        self
    }

    /// Reveal an object when this clue unlocks.
    pub fn reveals(mut self, object_id: impl Into<ObjectId>) -> Self {
        self.reveals_object_ids.insert(object_id.into());
        self
    }

    /// Assign the clue to a cluster.
    pub fn in_cluster(mut self, cluster_id: impl Into<ClusterId>) -> Self {
        self.cluster_id = Some(cluster_id.into());
        self
    }

    /// Flag the clue as required for the deduction.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Body text shown to the player: description, else summary, else empty.
    pub fn text(&self) -> &str {
        self.description
            .as_deref()
            .or(self.summary.as_deref())
            .unwrap_or("")
    }

    /// Whether `clue_id` is a direct prerequisite of this clue.
    pub fn depends_on(&self, clue_id: &str) -> bool {
        self.prerequisites.contains(clue_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_precedence() {
        let both = ClueDefinition::new("C1")
            .with_description("A torn letter")
            .with_summary("Letter");
        assert_eq!(both.text(), "A torn letter");

        let summary_only = ClueDefinition::new("C2").with_summary("Muddy boots");
        assert_eq!(summary_only.text(), "Muddy boots");

        assert_eq!(ClueDefinition::new("C3").text(), "");
    }

    #[test]
    fn test_duplicate_prerequisites_collapse() {
        let clue = ClueDefinition::new("C3").requires("C1").requires("C2").requires("C1");
        assert_eq!(clue.prerequisites.len(), 2);
        assert!(clue.depends_on("C1"));
        assert!(!clue.depends_on("C3"));
    }

    #[test]
    fn test_deserialize_editor_export() {
        let json = r#"{
            "id": "C1",
            "title": "Broken vial",
            "description": "",
            "summary": "Smells of almonds",
            "objectId": "",
            "prerequisites": ["C0", "C0"],
            "revealsObjectIds": null,
            "clusterId": "K1",
            "required": true
        }"#;

        let clue: ClueDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(clue.text(), "Smells of almonds");
        assert!(clue.object_id.is_none());
        assert_eq!(clue.prerequisites.len(), 1);
        assert!(clue.reveals_object_ids.is_empty());
        assert_eq!(clue.cluster_id, Some(ClusterId::from("K1")));
        assert!(clue.required);
    }
}
