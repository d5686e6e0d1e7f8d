//! Shared types for the gitpulse workspace.
//!
//! This crate defines the canonical event record every other crate speaks:
//! the closed [`ActionType`] set, the immutable [`CanonicalEvent`], the
//! persisted [`StoredEvent`] and the wire encoding used when records leave
//! the server. Presentation helpers for the polling dashboard live in
//! [`display`].
//!
//! No crate in the workspace defines its own copy of these types. The
//! classifier produces them, the store persists them and the server
//! serializes them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod display;
mod event;
pub mod wire_date;

pub use event::{CanonicalEvent, StoredEvent};

/// The kind of source-control occurrence a canonical event describes.
///
/// This set is closed: the classifier never constructs anything else, and
/// payloads describing other activity are ignored rather than mapped here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    /// Commits pushed to a branch.
    Push,
    /// A pull request was opened.
    PullRequest,
    /// A pull request was merged.
    Merge,
}

impl ActionType {
    /// All variants, in declaration order.
    pub const ALL: [ActionType; 3] = [Self::Push, Self::PullRequest, Self::Merge];

    /// Returns the string tag stored and transmitted for this action.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Push => "PUSH",
            Self::PullRequest => "PULL_REQUEST",
            Self::Merge => "MERGE",
        }
    }

    /// Returns the human-readable label shown on the dashboard.
    pub fn label(self) -> &'static str {
        match self {
            Self::Push => "Push",
            Self::PullRequest => "Pull Request",
            Self::Merge => "Merge",
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActionType {
    type Err = ParseActionTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PUSH" => Ok(Self::Push),
            "PULL_REQUEST" => Ok(Self::PullRequest),
            "MERGE" => Ok(Self::Merge),
            _ => Err(ParseActionTypeError(s.to_string())),
        }
    }
}

/// Error returned when a stored action tag is not one of the known variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action type: {0}")]
pub struct ParseActionTypeError(pub String);
