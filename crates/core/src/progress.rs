//! Experience curve and the persisted progress counters.

use serde::{Deserialize, Serialize};

/// Experience needed to advance from `level` to the next one.
///
/// `((level + 1) * 4)^2`, so level 1 needs 64 and level 2 needs 144.
pub const fn experience_for_level(level: u32) -> u32 {
    let base = level.saturating_add(1).saturating_mul(4);
    base.saturating_mul(base)
}

/// The counters that survive between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Current level (starts at 1)
    pub level: u32,

    /// Experience accumulated towards the next level
    pub current_experience: u32,

    /// Number of challenges completed so far
    pub challenges_completed: u32,
}

impl Progress {
    /// Create progress from explicit values.
    pub fn new(level: u32, current_experience: u32, challenges_completed: u32) -> Self {
        Self {
            level,
            current_experience,
            challenges_completed,
        }
    }

    /// Experience needed to leave the current level.
    pub fn experience_to_next_level(&self) -> u32 {
        experience_for_level(self.level)
    }

    /// Whether the counters satisfy the leveling invariant.
    pub fn is_consistent(&self) -> bool {
        self.level >= 1 && self.current_experience < self.experience_to_next_level()
    }

    /// Clamp out-of-range values into a consistent state.
    ///
    /// Level is raised to at least 1 and experience is capped just below
    /// the threshold of the resulting level.
    pub fn normalized(self) -> Self {
        let level = self.level.max(1);
        let cap = experience_for_level(level) - 1;
        Self {
            level,
            current_experience: self.current_experience.min(cap),
            challenges_completed: self.challenges_completed,
        }
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            level: 1,
            current_experience: 0,
            challenges_completed: 0,
        }
    }
}
