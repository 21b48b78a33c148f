//! Challenge model - a single unit of work with an experience reward.

use serde::{Deserialize, Serialize};

/// A challenge offered to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    /// Category of the challenge
    #[serde(rename = "type")]
    pub kind: ChallengeKind,

    /// What the user is asked to do
    pub description: String,

    /// Experience awarded on completion
    pub amount: u32,
}

impl Challenge {
    /// Create a new challenge.
    pub fn new(kind: ChallengeKind, description: impl Into<String>, amount: u32) -> Self {
        Self {
            kind,
            description: description.into(),
            amount,
        }
    }
}

/// Challenge category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeKind {
    /// Physical exercise
    Body,
    /// Eye rest
    Eye,
}

impl std::fmt::Display for ChallengeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Body => f.pad("body"),
            Self::Eye => f.pad("eye"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_under_type_key() {
        let challenge = Challenge::new(ChallengeKind::Eye, "Blink", 20);
        let json = serde_json::to_value(&challenge).unwrap();

        assert_eq!(json["type"], "eye");
        assert_eq!(json["amount"], 20);
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let result: Result<Challenge, _> =
            serde_json::from_str(r#"{"type": "mind", "description": "x", "amount": 1}"#);
        assert!(result.is_err());
    }
}
