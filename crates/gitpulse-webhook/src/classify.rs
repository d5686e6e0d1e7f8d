//! Ordered classification of webhook payloads into canonical events.

use chrono::{DateTime, Utc};
use gitpulse_types::{ActionType, CanonicalEvent};
use serde_json::Value;

use crate::timestamp::resolve_timestamp;

const BRANCH_REF_PREFIX: &str = "refs/heads/";

/// Outcome of classifying one webhook payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The payload describes a tracked occurrence.
    Event(CanonicalEvent),
    /// The payload is valid input but describes nothing this system records.
    Ignored(IgnoreReason),
}

impl Classification {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored(_))
    }
}

/// Why a payload was not turned into an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The payload matches neither the pull-request nor the push shape.
    UnsupportedShape,
    /// A pull-request payload whose `action` is not a tracked transition
    /// (e.g. `synchronize`, `reopened`, or `closed` without a merge).
    UntrackedPullRequestAction(Option<String>),
}

impl std::fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedShape => f.write_str("unsupported payload shape"),
            Self::UntrackedPullRequestAction(Some(action)) => {
                write!(f, "untracked pull request action: {action}")
            }
            Self::UntrackedPullRequestAction(None) => {
                f.write_str("pull request payload without an action")
            }
        }
    }
}

/// Classifies a payload, defaulting missing timestamps to the current time.
pub fn classify(payload: &Value) -> Classification {
    classify_at(payload, Utc::now())
}

/// Classifies a payload, defaulting missing timestamps to `now`.
///
/// The pull-request check takes priority over the push check, so a payload
/// carrying both shapes is treated as a pull request.
pub fn classify_at(payload: &Value, now: DateTime<Utc>) -> Classification {
    let Some(fields) = payload.as_object() else {
        return Classification::Ignored(IgnoreReason::UnsupportedShape);
    };

    if fields.contains_key("pull_request") {
        classify_pull_request(payload, now)
    } else if fields.contains_key("ref") && fields.contains_key("commits") {
        Classification::Event(classify_push(payload, now))
    } else {
        Classification::Ignored(IgnoreReason::UnsupportedShape)
    }
}

fn classify_pull_request(payload: &Value, now: DateTime<Utc>) -> Classification {
    let action = str_at(payload, "/action");
    let merged = payload
        .pointer("/pull_request/merged")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let from_branch = owned_at(payload, "/pull_request/head/ref");
    let to_branch = owned_at(payload, "/pull_request/base/ref");

    let event = match action {
        Some("closed") if merged => CanonicalEvent::new(
            str_at(payload, "/pull_request/merge_commit_sha").unwrap_or_default(),
            owned_at(payload, "/pull_request/merged_by/login"),
            ActionType::Merge,
            from_branch,
            to_branch,
            resolve_timestamp(
                "pull_request.merged_at",
                payload.pointer("/pull_request/merged_at"),
                now,
            ),
        ),
        Some("opened") => CanonicalEvent::new(
            str_at(payload, "/pull_request/head/sha").unwrap_or_default(),
            owned_at(payload, "/pull_request/user/login"),
            ActionType::PullRequest,
            from_branch,
            to_branch,
            resolve_timestamp(
                "pull_request.created_at",
                payload.pointer("/pull_request/created_at"),
                now,
            ),
        ),
        other => {
            return Classification::Ignored(IgnoreReason::UntrackedPullRequestAction(
                other.map(str::to_owned),
            ))
        }
    };

    Classification::Event(event)
}

fn classify_push(payload: &Value, now: DateTime<Utc>) -> CanonicalEvent {
    let git_ref = str_at(payload, "/ref").unwrap_or_default();
    let branch = git_ref.strip_prefix(BRANCH_REF_PREFIX).unwrap_or(git_ref);

    CanonicalEvent::push(
        str_at(payload, "/after").unwrap_or_default(),
        owned_at(payload, "/pusher/name"),
        branch,
        resolve_timestamp(
            "head_commit.timestamp",
            payload.pointer("/head_commit/timestamp"),
            now,
        ),
    )
}

fn str_at<'a>(payload: &'a Value, pointer: &str) -> Option<&'a str> {
    payload.pointer(pointer).and_then(Value::as_str)
}

fn owned_at(payload: &Value, pointer: &str) -> Option<String> {
    str_at(payload, pointer).map(str::to_owned)
}
