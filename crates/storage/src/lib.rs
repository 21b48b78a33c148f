//! Storage abstraction and implementations for levelup.
//!
//! This crate provides a trait-based key/value storage interface with a
//! JSON file implementation and an in-memory one, plus helpers that map
//! tracker progress onto storage keys.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_storage;
pub mod memory;
pub mod progress;

pub use trait_::{Storage, StorageError, Result};
pub use json_storage::JsonStorage;
pub use memory::MemoryStorage;
pub use progress::{load_progress, save_progress, CHALLENGES_COMPLETED_KEY, CURRENT_EXPERIENCE_KEY, LEVEL_KEY};
