//! The experience/leveling state machine.
//!
//! ```text
//! Idle --start--> Active --complete--> Idle (rewarded)
//!                        --reset-----> Idle (discarded)
//! ```
//!
//! Level is a separate counter that only moves up, on the rollover branch
//! of `complete_challenge`.

use std::path::PathBuf;
use std::sync::Arc;

use levelup_core::{experience_for_level, Challenge, ChallengeCatalog, Progress};
use levelup_notify::Notifier;
use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Configuration for the tracker's side effects.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Sound played when a challenge starts
    pub sound_path: PathBuf,
    /// Title of the new-challenge notification
    pub notification_title: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            sound_path: PathBuf::from("notification.mp3"),
            notification_title: "New challenge".to_string(),
        }
    }
}

/// Outcome of [`ExperienceTracker::complete_challenge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Nothing was active; state is unchanged
    NoActiveChallenge,
    /// The active challenge was rewarded
    Rewarded {
        /// Experience awarded
        amount: u32,
        /// Whether the reward crossed the level threshold
        leveled_up: bool,
    },
}

impl Completion {
    /// Whether the persisted counters changed.
    pub fn changed_progress(&self) -> bool {
        matches!(self, Self::Rewarded { .. })
    }
}

/// Everything a presentation layer needs to render the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackerState {
    /// Persisted counters
    pub progress: Progress,
    /// Threshold for the current level
    pub experience_to_next_level: u32,
    /// Challenge currently offered
    pub active_challenge: Option<Challenge>,
    /// Whether the level-up acknowledgement should be shown
    pub level_up_visible: bool,
}

/// Tracks level and experience and hands out challenges.
pub struct ExperienceTracker<R: Rng = StdRng> {
    catalog: ChallengeCatalog,
    notifier: Arc<dyn Notifier>,
    rng: R,
    config: TrackerConfig,
    progress: Progress,
    active_challenge: Option<Challenge>,
    level_up_visible: bool,
}

impl<R: Rng> ExperienceTracker<R> {
    /// Create a tracker seeded with `progress`.
    ///
    /// Out-of-range progress is clamped into a consistent state.
    pub fn new(
        progress: Progress,
        catalog: ChallengeCatalog,
        notifier: Arc<dyn Notifier>,
        rng: R,
    ) -> Self {
        let normalized = progress.normalized();
        if normalized != progress {
            warn!("Clamped inconsistent progress {:?} to {:?}", progress, normalized);
        }

        Self {
            catalog,
            notifier,
            rng,
            config: TrackerConfig::default(),
            progress: normalized,
            active_challenge: None,
            level_up_visible: false,
        }
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: TrackerConfig) -> Self {
        self.config = config;
        self
    }

    /// Current level.
    pub fn level(&self) -> u32 {
        self.progress.level
    }

    /// Experience accumulated in the current level.
    pub fn current_experience(&self) -> u32 {
        self.progress.current_experience
    }

    /// Number of completed challenges.
    pub fn challenges_completed(&self) -> u32 {
        self.progress.challenges_completed
    }

    /// Snapshot of the persisted counters.
    pub fn progress(&self) -> Progress {
        self.progress
    }

    /// The challenge currently offered, if any.
    pub fn active_challenge(&self) -> Option<&Challenge> {
        self.active_challenge.as_ref()
    }

    /// Whether the level-up acknowledgement is showing.
    pub fn is_level_up_visible(&self) -> bool {
        self.level_up_visible
    }

    /// The catalog challenges are drawn from.
    pub fn catalog(&self) -> &ChallengeCatalog {
        &self.catalog
    }

    /// Experience needed to leave the current level.
    pub fn experience_to_next_level(&self) -> u32 {
        experience_for_level(self.progress.level)
    }

    /// Progress through the current level, rounded to a whole percent.
    pub fn percent_to_next_level(&self) -> u32 {
        let threshold = u64::from(self.experience_to_next_level());
        let scaled = u64::from(self.progress.current_experience) * 100;
        ((scaled + threshold / 2) / threshold) as u32
    }

    /// Full state for rendering.
    pub fn state(&self) -> TrackerState {
        TrackerState {
            progress: self.progress,
            experience_to_next_level: self.experience_to_next_level(),
            active_challenge: self.active_challenge.clone(),
            level_up_visible: self.level_up_visible,
        }
    }

    /// Draw a challenge uniformly from the catalog and make it active.
    ///
    /// Any previously active challenge is replaced. Plays the configured
    /// sound and, if permitted, shows a notification with the reward.
    pub fn start_new_challenge(&mut self) -> &Challenge {
        let index = self.rng.gen_range(0..self.catalog.len());
        let challenge = self.catalog[index].clone();
        debug!("Selected challenge #{}: {}", index, challenge.description);

        if let Some(previous) = &self.active_challenge {
            debug!("Replacing active challenge: {}", previous.description);
        }

        self.notifier.play_sound(&self.config.sound_path);
        if self.notifier.permission().is_granted() {
            self.notifier.notify(
                &self.config.notification_title,
                &format!("Worth {}xp!", challenge.amount),
            );
        }

        self.active_challenge.insert(challenge)
    }

    /// Reward the active challenge.
    ///
    /// Grants at most one level per completion: the leftover after crossing
    /// the current threshold is kept as-is and not re-checked against the
    /// next one.
    pub fn complete_challenge(&mut self) -> Completion {
        let Some(challenge) = self.active_challenge.take() else {
            return Completion::NoActiveChallenge;
        };

        let threshold = self.experience_to_next_level();
        let mut final_experience = self.progress.current_experience.saturating_add(challenge.amount);
        let mut leveled_up = false;

        if final_experience >= threshold {
            final_experience -= threshold;
            self.level_up();
            leveled_up = true;
        }

        self.progress.current_experience = final_experience;
        self.progress.challenges_completed = self.progress.challenges_completed.saturating_add(1);

        info!(
            "Completed challenge for {}xp (level {}, {}/{}xp)",
            challenge.amount,
            self.progress.level,
            self.progress.current_experience,
            self.experience_to_next_level()
        );

        Completion::Rewarded {
            amount: challenge.amount,
            leveled_up,
        }
    }

    /// Discard the active challenge without reward.
    pub fn reset_challenge(&mut self) {
        if let Some(challenge) = self.active_challenge.take() {
            debug!("Discarded challenge: {}", challenge.description);
        }
    }

    /// Advance one level and raise the acknowledgement flag.
    pub fn level_up(&mut self) {
        self.progress.level = self.progress.level.saturating_add(1);
        self.level_up_visible = true;
        info!("Level up! Now level {}", self.progress.level);
    }

    /// Dismiss the level-up acknowledgement.
    pub fn close_modal(&mut self) {
        self.level_up_visible = false;
    }
}
