//! Shared fixtures for router tests.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use gitpulse_db::{create_pool, run_migrations, DbPool, DbRuntimeSettings};
use gitpulse_server::AppState;
use gitpulse_store::{EventStore, SqliteEventStore, StoreError};
use gitpulse_types::{CanonicalEvent, StoredEvent};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt; // for oneshot

/// Single-connection in-memory database with migrations applied.
pub fn memory_pool() -> DbPool {
    let pool = create_pool(
        ":memory:",
        DbRuntimeSettings {
            pool_max_size: 1,
            ..DbRuntimeSettings::default()
        },
    );
    {
        let conn = pool.get().unwrap();
        run_migrations(&conn).unwrap();
    }
    pool
}

pub fn sqlite_state() -> (AppState, SqliteEventStore) {
    let store = SqliteEventStore::new(memory_pool());
    (AppState::new(Arc::new(store.clone())), store)
}

/// A store whose every call fails the way an unreachable database would.
pub struct FailingStore;

impl EventStore for FailingStore {
    fn insert(&self, _event: &CanonicalEvent) -> Result<i64, StoreError> {
        Err(StoreError::Database(rusqlite_error("disk I/O error")))
    }

    fn latest(&self, _limit: usize) -> Result<Vec<StoredEvent>, StoreError> {
        Err(StoreError::Database(rusqlite_error("disk I/O error")))
    }
}

fn rusqlite_error(message: &str) -> rusqlite::Error {
    rusqlite::Error::SqliteFailure(
        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_IOERR),
        Some(message.to_string()),
    )
}

/// A store that sleeps past any reasonable timeout before answering.
pub struct StalledStore {
    pub delay: Duration,
}

impl EventStore for StalledStore {
    fn insert(&self, _event: &CanonicalEvent) -> Result<i64, StoreError> {
        std::thread::sleep(self.delay);
        Ok(1)
    }

    fn latest(&self, _limit: usize) -> Result<Vec<StoredEvent>, StoreError> {
        std::thread::sleep(self.delay);
        Ok(Vec::new())
    }
}

/// Wraps another store and delays every call before delegating.
pub struct SlowStore<S> {
    pub inner: S,
    pub delay: Duration,
}

impl<S: EventStore> EventStore for SlowStore<S> {
    fn insert(&self, event: &CanonicalEvent) -> Result<i64, StoreError> {
        std::thread::sleep(self.delay);
        self.inner.insert(event)
    }

    fn latest(&self, limit: usize) -> Result<Vec<StoredEvent>, StoreError> {
        std::thread::sleep(self.delay);
        self.inner.latest(limit)
    }
}

/// Wraps another store and counts calls.
pub struct CountingStore<S> {
    pub inner: S,
    pub inserts: AtomicUsize,
    pub reads: AtomicUsize,
}

impl<S> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            inserts: AtomicUsize::new(0),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }
}

impl<S: EventStore> EventStore for CountingStore<S> {
    fn insert(&self, event: &CanonicalEvent) -> Result<i64, StoreError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(event)
    }

    fn latest(&self, limit: usize) -> Result<Vec<StoredEvent>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.latest(limit)
    }
}

pub async fn post_json(app: Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .method("POST")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}
