//! gitpulse server binary.
//!
//! Starts an axum HTTP server with structured logging, best-effort database
//! initialization, and graceful shutdown on SIGTERM/SIGINT.

use gitpulse_server::{app, config, AppState};
use gitpulse_store::SqliteEventStore;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

fn resolve_config_path() -> (Option<String>, &'static str) {
    if let Some(path) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return (Some(path), "cli-arg");
    }

    if let Ok(path) = std::env::var("GITPULSE_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return (Some(path), "env-var");
        }
    }

    (None, "default")
}

/// Probes the database and applies migrations.
///
/// Failures are logged and tolerated: the server still starts and classifies
/// webhooks. The store retries the migrations on its next successful
/// connection, and store calls report their own errors per request.
fn prepare_database(pool: &gitpulse_db::DbPool, store: &SqliteEventStore, path: &str) {
    if let Err(e) = gitpulse_db::check_connectivity(pool) {
        tracing::warn!(path, error = %e, "database unreachable at startup, continuing in degraded mode");
        return;
    }
    tracing::info!(path, "database connection successful");

    if let Err(e) = store.ensure_schema() {
        tracing::warn!(path, error = %e, "failed to run database migrations");
    }
}

#[tokio::main]
async fn main() {
    let (resolved_config_path, config_source) = resolve_config_path();
    let selected_config_path = resolved_config_path.as_deref().or(Some("config.toml"));

    let config = config::load_config(selected_config_path)
        .expect("failed to load configuration — the server cannot start without valid config");

    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(
        source = config_source,
        path = selected_config_path.unwrap_or("<none>"),
        "resolved startup configuration path"
    );

    let pool = gitpulse_db::create_pool(&config.database.path, config.database.runtime_settings());
    let store = SqliteEventStore::new(pool.clone());
    prepare_database(&pool, &store, &config.database.path);

    let state = AppState {
        store: Arc::new(store),
        feed_limit: config.webhook.feed_limit,
        store_timeout: Duration::from_millis(config.webhook.store_timeout_ms),
        poll_interval: Duration::from_secs(config.webhook.poll_interval_secs),
    };

    let app = app(state);
    let addr = SocketAddr::new(config.server.host, config.server.port);

    tracing::info!(%addr, "starting gitpulse server");

    let listener = TcpListener::bind(addr)
        .await
        .expect("failed to bind to address — is another process using this port?");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("gitpulse server shut down");
}

/// Waits for a SIGINT (Ctrl+C) or SIGTERM signal for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { tracing::info!("received SIGINT, initiating graceful shutdown"); }
        () = terminate => { tracing::info!("received SIGTERM, initiating graceful shutdown"); }
    }
}
