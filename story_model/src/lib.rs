//! # Story Model
//!
//! The "case file" crate - the authored, load-time description of one mystery:
//! clues and their prerequisites, the world objects they sit on or reveal, the
//! clusters they group into, and the deduction solution.
//!
//! Everything here is immutable data. Runtime progression lives in
//! `clue_engine`; this crate only knows how to describe and parse a case.

pub mod definition;
pub mod error;
pub mod ids;

mod loader;
mod serde_util;

pub use definition::*;
pub use error::*;
pub use ids::*;
