//! Story definition - the aggregate root of an authored case.

mod clue;
mod cluster;
mod object;

pub use clue::*;
pub use cluster::*;
pub use object::*;

use serde::{Deserialize, Serialize};

use crate::ids::ClueId;

/// The authored answer to the case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DeductionSolution {
    #[serde(default, deserialize_with = "crate::serde_util::null_as_default")]
    pub culprit: String,
    #[serde(default, deserialize_with = "crate::serde_util::null_as_default")]
    pub method: String,
    #[serde(default, deserialize_with = "crate::serde_util::null_as_default")]
    pub motive: String,
}

impl DeductionSolution {
    /// Create a solution from its three parts.
    pub fn new(
        culprit: impl Into<String>,
        method: impl Into<String>,
        motive: impl Into<String>,
    ) -> Self {
        Self {
            culprit: culprit.into(),
            method: method.into(),
            motive: motive.into(),
        }
    }
}

/// A complete case as loaded from disk.
///
/// Immutable once handed to the engine. Field order in the clue, object and
/// cluster lists is meaningful: it is the order used for scans and events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StoryDefinition {
    #[serde(default, deserialize_with = "crate::serde_util::blank_as_none")]
    pub case_id: Option<String>,

    #[serde(default, deserialize_with = "crate::serde_util::blank_as_none")]
    pub case_title: Option<String>,

    #[serde(default, deserialize_with = "crate::serde_util::blank_as_none")]
    pub title: Option<String>,

    /// Shown once when the investigation begins.
    #[serde(default, deserialize_with = "crate::serde_util::blank_as_none")]
    pub intro_text: Option<String>,

    #[serde(default, deserialize_with = "crate::serde_util::blank_as_none")]
    pub victim: Option<String>,

    #[serde(default)]
    pub solution: Option<DeductionSolution>,

    #[serde(default, deserialize_with = "crate::serde_util::null_as_default")]
    pub culprits: Vec<String>,

    #[serde(default, deserialize_with = "crate::serde_util::null_as_default")]
    pub methods: Vec<String>,

    #[serde(default, deserialize_with = "crate::serde_util::null_as_default")]
    pub motives: Vec<String>,

    /// Clues that, together with any one complete cluster, open the deduction.
    #[serde(default, deserialize_with = "crate::serde_util::null_as_default")]
    pub essentials: Vec<ClueId>,

    #[serde(default, deserialize_with = "crate::serde_util::null_as_default")]
    pub clusters: Vec<ClusterDefinition>,

    #[serde(default, deserialize_with = "crate::serde_util::null_as_default")]
    pub objects: Vec<WorldObjectDefinition>,

    #[serde(default, deserialize_with = "crate::serde_util::null_as_default")]
    pub clues: Vec<ClueDefinition>,
}

impl StoryDefinition {
    /// Create an empty story.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the story title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the intro text shown when the investigation starts.
    pub fn with_intro(mut self, intro: impl Into<String>) -> Self {
        self.intro_text = Some(intro.into());
        self
    }

    /// Add a clue.
    pub fn with_clue(mut self, clue: ClueDefinition) -> Self {
        self.clues.push(clue);
        self
    }

    /// Add a world object.
    pub fn with_object(mut self, object: WorldObjectDefinition) -> Self {
        self.objects.push(object);
        self
    }

    /// Add a cluster.
    pub fn with_cluster(mut self, cluster: ClusterDefinition) -> Self {
        self.clusters.push(cluster);
        self
    }

    /// Add a clue that must be unlocked for the cluster path to deduction.
    pub fn with_essential(mut self, clue_id: impl Into<ClueId>) -> Self {
        self.essentials.push(clue_id.into());
        self
    }

    /// Set the three option pools.
    pub fn with_suspects<A, B, C, S>(mut self, culprits: A, methods: B, motives: C) -> Self
    where
        A: IntoIterator<Item = S>,
        B: IntoIterator<Item = S>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.culprits = culprits.into_iter().map(Into::into).collect();
        self.methods = methods.into_iter().map(Into::into).collect();
        self.motives = motives.into_iter().map(Into::into).collect();
        self
    }

    /// Set the solution.
    pub fn with_solution(mut self, solution: DeductionSolution) -> Self {
        self.solution = Some(solution);
        self
    }

    /// Case title, falling back to the generic title.
    pub fn display_title(&self) -> Option<&str> {
        self.case_title.as_deref().or(self.title.as_deref())
    }

    /// First clue with the given id.
    pub fn clue(&self, id: &str) -> Option<&ClueDefinition> {
        self.clues.iter().find(|clue| clue.id == id)
    }

    /// First object with the given id.
    pub fn object(&self, id: &str) -> Option<&WorldObjectDefinition> {
        self.objects.iter().find(|object| object.id == id)
    }

    /// First cluster with the given id.
    pub fn cluster(&self, id: &str) -> Option<&ClusterDefinition> {
        self.clusters.iter().find(|cluster| cluster.id == id)
    }

    /// Clue attached to a world object, if any. Used to route taps.
    pub fn clue_for_object(&self, object_id: &str) -> Option<&ClueDefinition> {
        self.clues
            .iter()
            .rev()
            .find(|clue| clue.object_id.as_ref().is_some_and(|id| id == object_id))
    }
}
