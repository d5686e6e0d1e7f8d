//! The canonical event record and its persisted form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ActionType;

/// One normalized source-control occurrence.
///
/// Built once by the classifier and never mutated afterwards: fields are
/// private and only readable through accessors. Serializes to the flat
/// record shape `{request_id, author, action, from_branch, to_branch,
/// timestamp}` with the timestamp in the wrapped-date encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalEvent {
    request_id: String,
    author: Option<String>,
    action: ActionType,
    from_branch: Option<String>,
    to_branch: Option<String>,
    #[serde(with = "crate::wire_date")]
    timestamp: DateTime<Utc>,
}

impl CanonicalEvent {
    /// Creates an event from fully resolved fields.
    pub fn new(
        request_id: impl Into<String>,
        author: Option<String>,
        action: ActionType,
        from_branch: Option<String>,
        to_branch: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            author,
            action,
            from_branch,
            to_branch,
            timestamp,
        }
    }

    /// Creates a push event. A push names a single branch, so it is used as
    /// both the source and the destination.
    pub fn push(
        request_id: impl Into<String>,
        author: Option<String>,
        branch: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let branch = branch.into();
        Self::new(
            request_id,
            author,
            ActionType::Push,
            Some(branch.clone()),
            Some(branch),
            timestamp,
        )
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn action(&self) -> ActionType {
        self.action
    }

    pub fn from_branch(&self) -> Option<&str> {
        self.from_branch.as_deref()
    }

    pub fn to_branch(&self) -> Option<&str> {
        self.to_branch.as_deref()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// A canonical event as read back from the store, with its store-assigned id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEvent {
    /// Identifier returned by the store when the event was inserted.
    #[serde(rename = "_id")]
    pub id: i64,
    #[serde(flatten)]
    pub event: CanonicalEvent,
}
