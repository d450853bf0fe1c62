//! Pull request status machine.
//!
//! A pull request is a record of intent to merge one branch into another.
//! Status only changes when a client asks for it; nothing here merges
//! branch contents.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lifecycle state of a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullRequestStatus {
    Open,
    Merged,
    Closed,
}

/// All valid status strings.
const VALID_STATUS_STRINGS: &[&str] = &["open", "merged", "closed"];

impl PullRequestStatus {
    /// Return the status as stored in the `pull_requests.status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Merged => "merged",
            Self::Closed => "closed",
        }
    }

    /// Parse a status from its stored string form.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "open" => Ok(Self::Open),
            "merged" => Ok(Self::Merged),
            "closed" => Ok(Self::Closed),
            _ => Err(CoreError::BadRequest(format!(
                "Invalid pull request status '{s}'. Must be one of: {}",
                VALID_STATUS_STRINGS.join(", ")
            ))),
        }
    }

    /// Whether a manual move from `self` to `next` is permitted.
    ///
    /// Open requests may be merged or closed, closed ones reopened. A merged
    /// request is final.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Open, Self::Merged) | (Self::Open, Self::Closed) | (Self::Closed, Self::Open)
        )
    }
}

/// Validate a requested status change.
///
/// Returns `Ok(false)` when `next` equals `current` (nothing to write),
/// `Ok(true)` for a permitted transition, and `Conflict` otherwise.
pub fn validate_transition(
    current: PullRequestStatus,
    next: PullRequestStatus,
) -> Result<bool, CoreError> {
    if current == next {
        return Ok(false);
    }
    if !current.can_transition_to(next) {
        return Err(CoreError::Conflict(format!(
            "Cannot move pull request from '{}' to '{}'",
            current.as_str(),
            next.as_str()
        )));
    }
    Ok(true)
}
