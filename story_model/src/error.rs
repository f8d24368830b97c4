//! Errors raised while turning a case document into a [`crate::StoryDefinition`].

use thiserror::Error;

/// Failure to parse an authored case file.
///
/// Only covers the document itself. Inconsistent content (dangling ids,
/// cycles) parses fine and is reported by the validator instead.
#[derive(Debug, Error)]
pub enum StoryLoadError {
    #[error("story document is empty")]
    Empty,

    #[error("failed to parse story JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse story TOML: {0}")]
    Toml(#[from] toml::de::Error),
}
