//! gitpulse server library logic.

pub mod api;
pub mod api_feed;
pub mod api_webhook;
pub mod config;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Json, Router,
};
use gitpulse_store::EventStore;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Append-only event store.
    pub store: Arc<dyn EventStore>,
    /// Number of events returned by the query and feed endpoints.
    pub feed_limit: usize,
    /// Upper bound on a store read. Inserts past it are logged, not abandoned.
    pub store_timeout: Duration,
    /// Polling interval advertised to dashboards.
    pub poll_interval: Duration,
}

impl AppState {
    /// Builds state with the default limits (10 events, 5 s store timeout,
    /// 15 s poll interval).
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self {
            store,
            feed_limit: 10,
            store_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_secs(15),
        }
    }
}

/// Maximum request body size (25 MiB), the largest payload GitHub delivers.
const MAX_REQUEST_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/webhook/receiver", post(api_webhook::receiver_handler))
        .route("/webhook/data", get(api_webhook::latest_events_handler))
        .route("/webhook/feed", get(api_feed::feed_handler))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
