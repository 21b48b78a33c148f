//! A tracker session - owns one tracker and persists its counters.

use std::sync::Arc;

use levelup_core::{Challenge, ChallengeCatalog};
use levelup_notify::Notifier;
use levelup_storage::{load_progress, save_progress, Storage};
use rand::rngs::StdRng;
use rand::Rng;
use tracing::{info, warn};

use crate::tracker::{Completion, ExperienceTracker, TrackerConfig};

/// Configuration for a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Whether to commit storage after each persisted change
    pub auto_commit: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { auto_commit: true }
    }
}

/// One user session: a tracker plus the storage it is saved to.
///
/// Storage failures are logged and swallowed; they never affect the
/// tracker.
pub struct Session<S: Storage, R: Rng = StdRng> {
    storage: S,
    tracker: ExperienceTracker<R>,
    config: SessionConfig,
}

impl<S: Storage, R: Rng> Session<S, R> {
    /// Open a session: load saved progress, ask for notification
    /// permission and write the starting counters back.
    pub async fn open(
        storage: S,
        catalog: ChallengeCatalog,
        notifier: Arc<dyn Notifier>,
        rng: R,
    ) -> Self {
        let progress = load_progress(&storage).await;
        let permission = notifier.request_permission();
        info!(
            "Session opened at level {} ({}xp, {} completed), notifications {:?}",
            progress.level, progress.current_experience, progress.challenges_completed, permission
        );

        let mut session = Self {
            storage,
            tracker: ExperienceTracker::new(progress, catalog, notifier, rng),
            config: SessionConfig::default(),
        };
        session.persist("Open session").await;
        session
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the tracker configuration.
    pub fn with_tracker_config(mut self, config: TrackerConfig) -> Self {
        self.tracker = self.tracker.with_config(config);
        self
    }

    /// The tracker, for reading state.
    pub fn tracker(&self) -> &ExperienceTracker<R> {
        &self.tracker
    }

    /// Get a reference to the storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Get a mutable reference to the storage.
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Offer a new challenge. Counters are unchanged, so nothing is saved.
    pub fn start_new_challenge(&mut self) -> &Challenge {
        self.tracker.start_new_challenge()
    }

    /// Complete the active challenge and save if it was rewarded.
    pub async fn complete_challenge(&mut self) -> Completion {
        let completion = self.tracker.complete_challenge();
        if completion.changed_progress() {
            self.persist("Complete challenge").await;
        }
        completion
    }

    /// Discard the active challenge.
    pub fn reset_challenge(&mut self) {
        self.tracker.reset_challenge();
    }

    /// Advance one level outside of a challenge and save.
    pub async fn level_up(&mut self) {
        self.tracker.level_up();
        self.persist("Level up").await;
    }

    /// Dismiss the level-up acknowledgement.
    pub fn close_modal(&mut self) {
        self.tracker.close_modal();
    }

    async fn persist(&mut self, message: &str) {
        let progress = self.tracker.progress();
        if let Err(e) = save_progress(&mut self.storage, &progress).await {
            warn!("Failed to save progress: {}", e);
            return;
        }

        if self.config.auto_commit {
            if let Err(e) = self.storage.commit(message).await {
                warn!("Failed to commit progress: {}", e);
            }
        }
    }
}
