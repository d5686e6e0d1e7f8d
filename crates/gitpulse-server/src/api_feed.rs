//! Dashboard feed handler: the latest events pre-rendered for display.

use crate::api::{call_store, ApiError, ResponseStatus};
use crate::AppState;
use axum::extract::{Extension, Json};
use gitpulse_types::display::{FeedEntry, FeedStats};
use serde::Serialize;
use std::sync::Arc;

/// Response body for `GET /webhook/feed`.
#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub status: ResponseStatus,
    pub stats: FeedStats,
    pub entries: Vec<FeedEntry>,
    /// How often a dashboard should poll, in seconds.
    pub poll_interval_secs: u64,
}

/// Handler for `GET /webhook/feed`.
pub async fn feed_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<FeedResponse>, ApiError> {
    let limit = state.feed_limit;
    let events = call_store(&state, move |store| store.latest(limit))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to fetch feed events");
            ApiError::Fetch(e)
        })?;

    Ok(Json(FeedResponse {
        status: ResponseStatus::Success,
        stats: FeedStats::from_events(events.iter().map(|stored| &stored.event)),
        entries: events
            .iter()
            .map(|stored| FeedEntry::from(&stored.event))
            .collect(),
        poll_interval_secs: state.poll_interval.as_secs(),
    }))
}
