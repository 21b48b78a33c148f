//! Mapping between tracker progress and storage keys.
//!
//! Each counter is stored as its decimal string under its own key, so the
//! store stays readable and compatible with cookie-style backends.

use levelup_core::Progress;
use tracing::warn;

use super::{Result, Storage};

/// Key holding the current level.
pub const LEVEL_KEY: &str = "level";
/// Key holding experience towards the next level.
pub const CURRENT_EXPERIENCE_KEY: &str = "currentExperience";
/// Key holding the number of completed challenges.
pub const CHALLENGES_COMPLETED_KEY: &str = "challengesCompleted";

/// Load progress, falling back to defaults per key.
///
/// Missing keys silently take their default. Unreadable or unparseable
/// values are logged and also take their default; this never fails.
pub async fn load_progress<S: Storage + ?Sized>(storage: &S) -> Progress {
    let defaults = Progress::default();
    Progress {
        level: read_counter(storage, LEVEL_KEY, defaults.level).await,
        current_experience: read_counter(storage, CURRENT_EXPERIENCE_KEY, defaults.current_experience).await,
        challenges_completed: read_counter(storage, CHALLENGES_COMPLETED_KEY, defaults.challenges_completed).await,
    }
}

/// Write all three counters. Durability still requires `commit`.
pub async fn save_progress<S: Storage + ?Sized>(storage: &mut S, progress: &Progress) -> Result<()> {
    storage.set(LEVEL_KEY, &progress.level.to_string()).await?;
    storage.set(CURRENT_EXPERIENCE_KEY, &progress.current_experience.to_string()).await?;
    storage.set(CHALLENGES_COMPLETED_KEY, &progress.challenges_completed.to_string()).await?;
    Ok(())
}

async fn read_counter<S: Storage + ?Sized>(storage: &S, key: &str, default: u32) -> u32 {
    match storage.get(key).await {
        Ok(Some(raw)) => match raw.trim().parse::<u32>() {
            Ok(value) => value,
            Err(e) => {
                warn!("Ignoring stored {}={:?}: {}", key, raw, e);
                default
            }
        },
        Ok(None) => default,
        Err(e) => {
            warn!("Failed to read {} from storage: {}", key, e);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStorage;

    #[tokio::test]
    async fn test_load_empty_storage_gives_defaults() {
        let storage = MemoryStorage::new();
        assert_eq!(load_progress(&storage).await, Progress::default());
    }

    #[tokio::test]
    async fn test_round_trip() {
        let mut storage = MemoryStorage::new();
        let progress = Progress::new(7, 123, 42);

        save_progress(&mut storage, &progress).await.unwrap();
        storage.commit("save").await.unwrap();

        assert_eq!(storage.committed(LEVEL_KEY), Some("7"));
        assert_eq!(storage.committed(CURRENT_EXPERIENCE_KEY), Some("123"));
        assert_eq!(storage.committed(CHALLENGES_COMPLETED_KEY), Some("42"));
        assert_eq!(load_progress(&storage).await, progress);
    }

    #[tokio::test]
    async fn test_partial_and_garbage_values_fall_back_per_key() {
        let storage = MemoryStorage::with_entries([
            (LEVEL_KEY, "5"),
            (CURRENT_EXPERIENCE_KEY, "lots"),
        ]);

        let progress = load_progress(&storage).await;
        assert_eq!(progress.level, 5);
        assert_eq!(progress.current_experience, 0);
        assert_eq!(progress.challenges_completed, 0);
    }

    #[tokio::test]
    async fn test_negative_values_fall_back() {
        let storage = MemoryStorage::with_entries([(LEVEL_KEY, "-2")]);
        assert_eq!(load_progress(&storage).await.level, 1);
    }
}
