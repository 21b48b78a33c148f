//! Experience tracking
//!
//! The leveling state machine and the session that persists it.

#![warn(missing_docs)]

pub mod tracker;
pub mod session;

pub use tracker::{Completion, ExperienceTracker, TrackerConfig, TrackerState};
pub use session::{Session, SessionConfig};
