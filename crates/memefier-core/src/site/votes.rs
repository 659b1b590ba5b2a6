//! Caption voting rules.
//!
//! A user holds at most one vote per caption. Voting the same way twice
//! withdraws the vote; voting the other way flips it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An up or down vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum VoteValue {
    Up,
    Down,
}

/// Raised for vote values other than `1` and `-1`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("vote value must be 1 or -1, got {0}")]
pub struct InvalidVote(pub i64);

impl TryFrom<i64> for VoteValue {
    type Error = InvalidVote;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(VoteValue::Up),
            -1 => Ok(VoteValue::Down),
            other => Err(InvalidVote(other)),
        }
    }
}

impl From<VoteValue> for i64 {
    fn from(value: VoteValue) -> Self {
        match value {
            VoteValue::Up => 1,
            VoteValue::Down => -1,
        }
    }
}

/// What to do with the stored vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteAction {
    /// No vote yet: insert one
    #[serde(rename = "created")]
    Create,
    /// Opposite vote stored: change it
    #[serde(rename = "updated")]
    Update,
    /// Same vote stored: delete it
    #[serde(rename = "removed")]
    Remove,
}

/// Decide how a new vote changes the stored one.
pub fn resolve_vote(existing: Option<VoteValue>, new: VoteValue) -> VoteAction {
    match existing {
        None => VoteAction::Create,
        Some(current) if current == new => VoteAction::Remove,
        Some(_) => VoteAction::Update,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_vote_creates() {
        assert_eq!(resolve_vote(None, VoteValue::Up), VoteAction::Create);
        assert_eq!(resolve_vote(None, VoteValue::Down), VoteAction::Create);
    }

    #[test]
    fn test_same_vote_toggles_off() {
        assert_eq!(resolve_vote(Some(VoteValue::Up), VoteValue::Up), VoteAction::Remove);
        assert_eq!(
            resolve_vote(Some(VoteValue::Down), VoteValue::Down),
            VoteAction::Remove
        );
    }

    #[test]
    fn test_opposite_vote_updates() {
        assert_eq!(resolve_vote(Some(VoteValue::Up), VoteValue::Down), VoteAction::Update);
    }

    #[test]
    fn test_vote_value_serde() {
        let up: VoteValue = serde_json::from_str("1").unwrap();
        assert_eq!(up, VoteValue::Up);
        assert_eq!(serde_json::to_string(&VoteValue::Down).unwrap(), "-1");
        assert!(serde_json::from_str::<VoteValue>("0").is_err());
        assert!(serde_json::from_str::<VoteValue>("2").is_err());
    }

    #[test]
    fn test_action_names() {
        assert_eq!(serde_json::to_string(&VoteAction::Create).unwrap(), "\"created\"");
        assert_eq!(serde_json::to_string(&VoteAction::Remove).unwrap(), "\"removed\"");
        assert_eq!(serde_json::to_string(&VoteAction::Update).unwrap(), "\"updated\"");
    }

    #[test]
    fn test_invalid_vote_message() {
        assert_eq!(
            VoteValue::try_from(3).unwrap_err().to_string(),
            "vote value must be 1 or -1, got 3"
        );
    }
}
