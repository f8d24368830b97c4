//! Cluster definitions - named groups of clues that complete together.

use serde::{Deserialize, Serialize};

use crate::ids::{ClueId, ClusterId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterDefinition {
    #[serde(default)]
    pub id: ClusterId,

    #[serde(default, deserialize_with = "crate::serde_util::null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "crate::serde_util::null_as_default")]
    pub title: String,

    #[serde(default, deserialize_with = "crate::serde_util::null_as_default")]
    pub description: String,

    /// Message shown once the last clue of the cluster unlocks.
    #[serde(default, deserialize_with = "crate::serde_util::null_as_default")]
    pub completion_text: String,

    #[serde(default, deserialize_with = "crate::serde_util::null_as_default")]
    pub clue_ids: Vec<ClueId>,
}

impl ClusterDefinition {
    /// Create an empty cluster.
    pub fn new(id: impl Into<ClusterId>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            title: String::new(),
            description: String::new(),
            completion_text: String::new(),
            clue_ids: Vec::new(),
        }
    }

    /// Set the journal title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the fallback name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the journal description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the text announced on completion.
    pub fn with_completion_text(mut self, text: impl Into<String>) -> Self {
        self.completion_text = text.into();
        self
    }

    /// Add one member clue.
    pub fn with_clue(mut self, clue_id: impl Into<ClueId>) -> Self {
        self.clue_ids.push(clue_id.into());
        self
    }

    /// Add several member clues.
    pub fn with_clues<I, C>(mut self, clue_ids: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ClueId>,
    {
        self.clue_ids.extend(clue_ids.into_iter().map(Into::into));
        self
    }

    /// Title, else name, else the raw id.
    pub fn display_title(&self) -> &str {
        if !self.title.is_empty() {
            &self.title
        } else if !self.name.is_empty() {
            &self.name
        } else {
            self.id.as_str()
        }
    }

    /// Whether `clue_id` is a member.
    pub fn contains(&self, clue_id: &str) -> bool {
        self.clue_ids.iter().any(|id| id == clue_id)
    }
}
