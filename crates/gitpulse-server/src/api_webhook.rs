//! Webhook ingestion and query handlers.
//!
//! Provides:
//! - `POST /webhook/receiver` — classify a webhook payload and store it
//! - `GET /webhook/data` — the most recent stored events, newest first

use crate::api::{append_event, call_store, ApiError, ResponseStatus};
use crate::AppState;
use axum::extract::{Extension, Json};
use gitpulse_types::{CanonicalEvent, StoredEvent};
use gitpulse_webhook::{classify, Classification};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Response body for `POST /webhook/receiver`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReceiverResponse {
    pub status: ResponseStatus,
    pub message: String,
    /// The stored event; absent when the payload was ignored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<CanonicalEvent>,
    /// Store-assigned identifier, as a string; absent when ignored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inserted_id: Option<String>,
}

/// Response body for `GET /webhook/data`.
#[derive(Debug, Serialize, Deserialize)]
pub struct LatestEventsResponse {
    pub status: ResponseStatus,
    pub message: String,
    /// Events ordered by timestamp, newest first.
    pub data: Vec<StoredEvent>,
}

/// Handler for `POST /webhook/receiver`.
///
/// Unsupported payloads are acknowledged with an `ignored` status and never
/// reach the store. Store failures are returned as `500` and nothing is
/// persisted.
pub async fn receiver_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> Result<Json<ReceiverResponse>, ApiError> {
    let event = match classify(&payload) {
        Classification::Event(event) => event,
        Classification::Ignored(reason) => {
            tracing::info!(%reason, "webhook event type not supported, ignoring");
            return Ok(Json(ReceiverResponse {
                status: ResponseStatus::Ignored,
                message: "Webhook event type not supported".to_string(),
                data: None,
                inserted_id: None,
            }));
        }
    };

    let id = append_event(&state, event.clone())
        .await
        .map_err(|e| {
            tracing::error!(
                action = event.action().as_str(),
                request_id = event.request_id(),
                error = %e,
                "failed to store webhook event"
            );
            ApiError::Persist(e)
        })?;

    tracing::info!(
        inserted_id = id,
        action = event.action().as_str(),
        request_id = event.request_id(),
        "webhook event stored"
    );

    Ok(Json(ReceiverResponse {
        status: ResponseStatus::Success,
        message: "Webhook processed successfully".to_string(),
        data: Some(event),
        inserted_id: Some(id.to_string()),
    }))
}

/// Handler for `GET /webhook/data`.
pub async fn latest_events_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<LatestEventsResponse>, ApiError> {
    let limit = state.feed_limit;
    let events = call_store(&state, move |store| store.latest(limit))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to fetch latest events");
            ApiError::Fetch(e)
        })?;

    tracing::debug!(count = events.len(), "retrieved latest events");

    Ok(Json(LatestEventsResponse {
        status: ResponseStatus::Success,
        message: format!("Retrieved {} latest documents", events.len()),
        data: events,
    }))
}
