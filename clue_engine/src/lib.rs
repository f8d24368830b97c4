//! # Clue Engine
//!
//! Runtime progression for a `story_model` case: which clues the player may
//! unlock, what each unlock reveals, when a cluster of evidence is complete,
//! and when the case is ready for a deduction.
//!
//! ## Core Components
//!
//! - **validator**: Exhaustive content checks run before any runtime state exists
//! - **graph**: Prerequisite graph with dependents index and cycle detection
//! - **unlock**: The Unlock Engine, owner of all progression state
//! - **clusters**: One-shot cluster completion tracking
//! - **deduction**: Culprit / method / motive board and verdicts
//! - **events**: Synchronous observer lists owned by each publisher
//! - **session**: `Investigation`, the composition root a host drives
//! - **journal**, **telemetry**, **config**: Read models, playthrough records
//!   and player-facing texts built on top of the events
//!
//! ## Execution Model
//!
//! Single-threaded and synchronous. Every mutating call is one complete state
//! transition, and its events are delivered before the call returns.

pub mod clusters;
pub mod config;
pub mod deduction;
pub mod error;
pub mod events;
pub mod graph;
pub mod journal;
pub mod session;
pub mod telemetry;
pub mod unlock;
pub mod validator;

pub use clusters::*;
pub use config::*;
pub use deduction::*;
pub use error::*;
pub use events::*;
pub use graph::*;
pub use journal::*;
pub use session::*;
pub use telemetry::*;
pub use unlock::*;
pub use validator::*;
