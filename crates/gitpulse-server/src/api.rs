//! Shared response types and store access for the HTTP handlers.

use crate::AppState;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gitpulse_store::{EventStore, StoreError};
use gitpulse_types::CanonicalEvent;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Outcome tag carried by every webhook API response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Ignored,
    Error,
}

/// Failure of one store call made from a request handler.
#[derive(Debug, Error)]
pub enum StoreCallError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("store call timed out after {} ms", .0.as_millis())]
    TimedOut(Duration),

    #[error("store task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Runs a blocking read off the async runtime, bounded by the configured
/// store timeout.
pub async fn call_store<T, F>(state: &AppState, op: F) -> Result<T, StoreCallError>
where
    T: Send + 'static,
    F: FnOnce(&dyn EventStore) -> Result<T, StoreError> + Send + 'static,
{
    let store = Arc::clone(&state.store);
    let task = tokio::task::spawn_blocking(move || op(store.as_ref()));

    match tokio::time::timeout(state.store_timeout, task).await {
        Ok(joined) => Ok(joined??),
        Err(_) => Err(StoreCallError::TimedOut(state.store_timeout)),
    }
}

/// Appends one event off the async runtime and reports its real outcome.
///
/// An insert is never abandoned: once started it may commit, so answering
/// before it finishes could report a failure for a stored event. Its duration
/// is bounded by the pool's connection timeout and SQLite's busy timeout. An
/// insert still running after the store timeout is logged and awaited.
pub async fn append_event(state: &AppState, event: CanonicalEvent) -> Result<i64, StoreCallError> {
    let store = Arc::clone(&state.store);
    let mut task = tokio::task::spawn_blocking(move || store.insert(&event));

    match tokio::time::timeout(state.store_timeout, &mut task).await {
        Ok(joined) => Ok(joined??),
        Err(_) => {
            tracing::warn!(
                timeout_ms = state.store_timeout.as_millis() as u64,
                "event insert is slower than the store timeout, waiting for it to finish"
            );
            Ok(task.await??)
        }
    }
}

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to save to database: {0}")]
    Persist(StoreCallError),
    #[error("Failed to fetch data from database: {0}")]
    Fetch(StoreCallError),
}

/// Body of an error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: ResponseStatus,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Persist(_) | ApiError::Fetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse {
            status: ResponseStatus::Error,
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}
