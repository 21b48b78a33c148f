//! levelup core data models.
//!
//! This crate defines the challenge catalog and the experience curve
//! shared by the tracker, storage and CLI crates.

#![warn(missing_docs)]

mod challenge;
mod catalog;
mod progress;

pub use challenge::{Challenge, ChallengeKind};
pub use catalog::{ChallengeCatalog, CatalogError, MAX_CHALLENGE_AMOUNT};
pub use progress::{experience_for_level, Progress};
