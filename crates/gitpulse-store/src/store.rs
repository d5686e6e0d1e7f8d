//! Persistence operations for the event log.
//!
//! Writes go through [`EventStore::insert`], a single `INSERT` statement with
//! no read-modify-write, so concurrent inserts never contend on shared
//! state. Reads go through [`EventStore::latest`], which orders by the native
//! integer timestamp column with the row id as a deterministic tie-breaker.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::DateTime;
use gitpulse_db::DbPool;
use gitpulse_types::{ActionType, CanonicalEvent, StoredEvent};
use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

use crate::error::StoreError;

/// Append-only persistence for canonical events.
pub trait EventStore: Send + Sync {
    /// Appends one event and returns the identifier assigned to it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the event could not be written. Nothing is
    /// persisted in that case.
    fn insert(&self, event: &CanonicalEvent) -> Result<i64, StoreError>;

    /// Returns up to `limit` events, most recent timestamp first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the log could not be read.
    fn latest(&self, limit: usize) -> Result<Vec<StoredEvent>, StoreError>;
}

/// [`EventStore`] backed by the `github_events` SQLite table.
///
/// The schema is brought up to date on the first connection that succeeds,
/// so a store created while the database is unreachable starts working once
/// it becomes reachable.
#[derive(Clone)]
pub struct SqliteEventStore {
    pool: DbPool,
    schema_ready: Arc<Mutex<bool>>,
}

impl SqliteEventStore {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            schema_ready: Arc::new(Mutex::new(false)),
        }
    }

    /// Applies pending migrations unless this store has already done so.
    ///
    /// Returns the number of migrations applied by this call.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if no connection is available or a migration
    /// fails. The next call tries again.
    pub fn ensure_schema(&self) -> Result<usize, StoreError> {
        let conn = self.pool.get()?;
        self.migrate_once(&conn)
    }

    fn connection(&self) -> Result<PooledConnection<SqliteConnectionManager>, StoreError> {
        let conn = self.pool.get()?;
        self.migrate_once(&conn)?;
        Ok(conn)
    }

    fn migrate_once(&self, conn: &rusqlite::Connection) -> Result<usize, StoreError> {
        let mut ready = self
            .schema_ready
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if *ready {
            return Ok(0);
        }

        let applied = gitpulse_db::run_migrations(conn)?;
        *ready = true;
        if applied > 0 {
            tracing::info!(count = applied, "applied event store migrations");
        }
        Ok(applied)
    }
}

/// Raw column values for one `github_events` row.
struct EventRow {
    id: i64,
    request_id: String,
    author: Option<String>,
    action: String,
    from_branch: Option<String>,
    to_branch: Option<String>,
    timestamp_ms: i64,
}

impl EventRow {
    fn into_stored(self) -> Result<StoredEvent, StoreError> {
        let action: ActionType = self.action.parse().map_err(|e| StoreError::CorruptRecord {
            id: self.id,
            reason: format!("{e}"),
        })?;
        let timestamp =
            DateTime::from_timestamp_millis(self.timestamp_ms).ok_or_else(|| {
                StoreError::CorruptRecord {
                    id: self.id,
                    reason: format!("timestamp out of range: {}", self.timestamp_ms),
                }
            })?;

        Ok(StoredEvent {
            id: self.id,
            event: CanonicalEvent::new(
                self.request_id,
                self.author,
                action,
                self.from_branch,
                self.to_branch,
                timestamp,
            ),
        })
    }
}

impl EventStore for SqliteEventStore {
    fn insert(&self, event: &CanonicalEvent) -> Result<i64, StoreError> {
        let conn = self.connection()?;

        let id = conn.query_row(
            "INSERT INTO github_events
                (request_id, author, action, from_branch, to_branch, timestamp_ms)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id",
            params![
                event.request_id(),
                event.author(),
                event.action().as_str(),
                event.from_branch(),
                event.to_branch(),
                event.timestamp().timestamp_millis(),
            ],
            |row| row.get::<_, i64>(0),
        )?;

        tracing::debug!(
            id,
            action = event.action().as_str(),
            request_id = event.request_id(),
            "event appended"
        );

        Ok(id)
    }

    fn latest(&self, limit: usize) -> Result<Vec<StoredEvent>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, request_id, author, action, from_branch, to_branch, timestamp_ms
             FROM github_events
             ORDER BY timestamp_ms DESC, id DESC
             LIMIT ?1",
        )?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map([limit], |row| {
            Ok(EventRow {
                id: row.get(0)?,
                request_id: row.get(1)?,
                author: row.get(2)?,
                action: row.get(3)?,
                from_branch: row.get(4)?,
                to_branch: row.get(5)?,
                timestamp_ms: row.get(6)?,
            })
        })?;

        let mut events = Vec::new();
        for row in rows {
            events.push(row?.into_stored()?);
        }

        Ok(events)
    }
}
