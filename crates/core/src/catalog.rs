//! Challenge catalog - the fixed, validated list challenges are drawn from.

use std::path::Path;

use crate::challenge::Challenge;
use crate::progress::experience_for_level;

/// Largest reward a single challenge may carry.
///
/// A completion grants at most one level, so a reward must never exceed
/// the smallest threshold or the leftover experience could overflow the
/// next level too.
pub const MAX_CHALLENGE_AMOUNT: u32 = experience_for_level(1);

const BUILTIN_CATALOG: &str = include_str!("../challenges.json");

/// Errors raised while loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog has no challenges
    #[error("challenge catalog is empty")]
    Empty,

    /// A challenge awards zero experience
    #[error("challenge #{index} has a non-positive amount")]
    NonPositiveAmount {
        /// Position in the catalog
        index: usize,
    },

    /// A challenge awards more than one level can absorb
    #[error("challenge #{index} awards {amount}xp, above the maximum of {max}xp (a completion grants at most one level)")]
    AmountTooLarge {
        /// Position in the catalog
        index: usize,
        /// Offending amount
        amount: u32,
        /// Allowed maximum
        max: u32,
    },

    /// Malformed catalog JSON
    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Catalog file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// An ordered, non-empty, read-only list of challenges.
#[derive(Debug, Clone)]
pub struct ChallengeCatalog {
    challenges: Vec<Challenge>,
}

impl ChallengeCatalog {
    /// Build a catalog, rejecting empty lists and out-of-range rewards.
    pub fn new(challenges: Vec<Challenge>) -> Result<Self, CatalogError> {
        if challenges.is_empty() {
            return Err(CatalogError::Empty);
        }

        for (index, challenge) in challenges.iter().enumerate() {
            if challenge.amount == 0 {
                return Err(CatalogError::NonPositiveAmount { index });
            }
            if challenge.amount > MAX_CHALLENGE_AMOUNT {
                return Err(CatalogError::AmountTooLarge {
                    index,
                    amount: challenge.amount,
                    max: MAX_CHALLENGE_AMOUNT,
                });
            }
        }

        Ok(Self { challenges })
    }

    /// Parse a catalog from a JSON array.
    ///
    /// Amounts are read as signed integers first so that negative rewards
    /// surface as [`CatalogError::NonPositiveAmount`] instead of a parse error.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: Vec<RawChallenge> = serde_json::from_str(json)?;
        let mut challenges = Vec::with_capacity(raw.len());
        for (index, entry) in raw.into_iter().enumerate() {
            if entry.amount <= 0 {
                return Err(CatalogError::NonPositiveAmount { index });
            }
            let amount = u32::try_from(entry.amount).unwrap_or(u32::MAX);
            challenges.push(Challenge::new(entry.kind, entry.description, amount));
        }
        Self::new(challenges)
    }

    /// Load a catalog from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Number of challenges.
    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }

    /// Challenge at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Challenge> {
        self.challenges.get(index)
    }

    /// Iterate over the challenges in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Challenge> {
        self.challenges.iter()
    }

    /// Whether `challenge` is part of this catalog.
    pub fn contains(&self, challenge: &Challenge) -> bool {
        self.challenges.contains(challenge)
    }
}

impl std::ops::Index<usize> for ChallengeCatalog {
    type Output = Challenge;

    fn index(&self, index: usize) -> &Challenge {
        &self.challenges[index]
    }
}

#[derive(serde::Deserialize)]
struct RawChallenge {
    #[serde(rename = "type")]
    kind: crate::ChallengeKind,
    description: String,
    amount: i64,
}
