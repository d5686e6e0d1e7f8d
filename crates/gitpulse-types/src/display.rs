//! Presentation helpers for the polling dashboard.
//!
//! The dashboard renders each event as a labelled card with a one-line
//! message and a human-readable time, plus a few counters over the list.

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use crate::{ActionType, CanonicalEvent};

const UNKNOWN_AUTHOR: &str = "Unknown";
const UNKNOWN_BRANCH: &str = "unknown-branch";

/// One rendered card on the dashboard feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedEntry {
    pub action: ActionType,
    pub label: &'static str,
    pub author: String,
    pub message: String,
    pub when: String,
}

impl From<&CanonicalEvent> for FeedEntry {
    fn from(event: &CanonicalEvent) -> Self {
        Self {
            action: event.action(),
            label: event.action().label(),
            author: event.author().unwrap_or(UNKNOWN_AUTHOR).to_string(),
            message: describe(event),
            when: format_display_time(&event.timestamp()),
        }
    }
}

/// Counters shown above the feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeedStats {
    pub total: usize,
    pub merges: usize,
    pub pushes: usize,
    pub pull_requests: usize,
}

impl FeedStats {
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a CanonicalEvent>) -> Self {
        events
            .into_iter()
            .fold(Self::default(), |mut stats, event| {
                stats.total += 1;
                match event.action() {
                    ActionType::Push => stats.pushes += 1,
                    ActionType::PullRequest => stats.pull_requests += 1,
                    ActionType::Merge => stats.merges += 1,
                }
                stats
            })
    }
}

/// Returns the verb phrase describing what the author did.
pub fn describe(event: &CanonicalEvent) -> String {
    let from = event.from_branch().unwrap_or(UNKNOWN_BRANCH);
    let to = event.to_branch().unwrap_or(UNKNOWN_BRANCH);
    match event.action() {
        ActionType::Push => format!("pushed to `{to}`"),
        ActionType::Merge => format!("merged `{from}` → `{to}`"),
        ActionType::PullRequest => format!("opened PR from `{from}` to `{to}`"),
    }
}

/// Formats an instant as e.g. `1st January 2024 - 12:00 PM UTC`.
pub fn format_display_time(ts: &DateTime<Utc>) -> String {
    let day = ts.day();
    format!(
        "{day}{} {} - {} UTC",
        ordinal_suffix(day),
        ts.format("%B %Y"),
        ts.format("%-I:%M %p"),
    )
}

fn ordinal_suffix(day: u32) -> &'static str {
    if (11..=13).contains(&day) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}
