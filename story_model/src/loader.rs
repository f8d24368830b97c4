//! Parsing of case documents. Reading the bytes is the host's job.

use crate::definition::StoryDefinition;
use crate::error::StoryLoadError;

impl StoryDefinition {
    /// Parse a JSON case file (the editor's export format).
    pub fn from_json_str(source: &str) -> Result<Self, StoryLoadError> {
        if source.trim().is_empty() {
            return Err(StoryLoadError::Empty);
        }
        Ok(serde_json::from_str(source)?)
    }

    /// Parse a hand-authored TOML case file.
    pub fn from_toml_str(source: &str) -> Result<Self, StoryLoadError> {
        if source.trim().is_empty() {
            return Err(StoryLoadError::Empty);
        }
        Ok(toml::from_str(source)?)
    }
}
