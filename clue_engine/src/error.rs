//! Engine error types.
//!
//! Gameplay outcomes (ineligible or unknown clues) are not errors; they are
//! `false` returns and events. These cover malformed input at the edges.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown unlock source: {0}")]
    UnknownSource(String),

    #[error("invalid feedback config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("failed to encode telemetry record: {0}")]
    Telemetry(#[from] serde_json::Error),
}
