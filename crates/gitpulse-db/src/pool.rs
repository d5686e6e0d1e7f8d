//! Connection pool creation and configuration.

use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use thiserror::Error;

/// Runtime tunables for SQLite connection behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbRuntimeSettings {
    /// Busy timeout for SQLite connections, in milliseconds.
    pub busy_timeout_ms: u64,

    /// Maximum number of pooled SQLite connections.
    pub pool_max_size: u32,

    /// How long `pool.get()` waits for a connection, in milliseconds.
    pub connection_timeout_ms: u64,
}

impl Default for DbRuntimeSettings {
    fn default() -> Self {
        Self {
            busy_timeout_ms: 5_000,
            pool_max_size: 8,
            connection_timeout_ms: 5_000,
        }
    }
}

/// A type alias for the SQLite connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Errors raised while reaching the database through the pool.
#[derive(Debug, Error)]
pub enum PoolError {
    /// No connection could be checked out of the pool.
    #[error("failed to obtain database connection: {0}")]
    Connection(#[from] r2d2::Error),

    /// A connection was obtained but did not answer a trivial query.
    #[error("database did not respond to ping: {0}")]
    Ping(#[from] rusqlite::Error),
}

/// Creates a new SQLite connection pool with WAL mode and a busy timeout.
///
/// The pool is built lazily: no connection is opened here, so a bad path or
/// an unwritable directory only surfaces on first use. Call
/// [`check_connectivity`] to probe it eagerly.
///
/// # Arguments
///
/// * `db_path` - Path to the SQLite database file. `:memory:` gives every
///   pooled connection its own private database, so pair it with
///   `pool_max_size: 1` in tests.
pub fn create_pool(db_path: &str, settings: DbRuntimeSettings) -> DbPool {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;

    let manager = SqliteConnectionManager::file(db_path)
        .with_flags(flags)
        .with_init(move |conn| {
            // In-memory databases report "memory" which is acceptable.
            let journal_mode: String =
                conn.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))?;
            if journal_mode != "wal" && journal_mode != "memory" {
                return Err(rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
                    Some(format!(
                        "failed to set WAL journal mode, got: {}",
                        journal_mode
                    )),
                ));
            }
            conn.execute_batch(&format!(
                "PRAGMA busy_timeout = {};",
                settings.busy_timeout_ms
            ))
        });

    Pool::builder()
        .max_size(settings.pool_max_size)
        .min_idle(Some(0))
        .connection_timeout(Duration::from_millis(settings.connection_timeout_ms))
        .build_unchecked(manager)
}

/// Checks out one connection and runs `SELECT 1` on it.
///
/// # Errors
///
/// Returns `PoolError::Connection` if no connection can be opened within the
/// configured timeout, or `PoolError::Ping` if the query fails.
pub fn check_connectivity(pool: &DbPool) -> Result<(), PoolError> {
    let conn = pool.get()?;
    conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_in_memory_pool() {
        let settings = DbRuntimeSettings {
            busy_timeout_ms: 2_500,
            pool_max_size: 3,
            connection_timeout_ms: 1_000,
        };

        let pool = create_pool(":memory:", settings);
        let conn = pool.get().expect("should get a connection");

        let mode: String = conn
            .query_row("PRAGMA journal_mode;", [], |row| row.get(0))
            .expect("should query journal_mode");
        assert!(
            mode == "wal" || mode == "memory",
            "unexpected journal_mode: {mode}"
        );

        let busy_timeout: i32 = conn
            .query_row("PRAGMA busy_timeout;", [], |row| row.get(0))
            .expect("should query busy_timeout");
        assert_eq!(busy_timeout, 2_500, "busy timeout should match settings");

        assert_eq!(pool.max_size(), 3, "pool max size should match settings");
    }

    #[test]
    fn connectivity_check_succeeds_for_reachable_database() {
        let pool = create_pool(":memory:", DbRuntimeSettings::default());
        check_connectivity(&pool).expect("in-memory database should answer");
    }

    #[test]
    fn connectivity_check_fails_for_missing_directory() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let path = dir.path().join("missing").join("events.db");
        let pool = create_pool(
            path.to_str().expect("utf-8 path"),
            DbRuntimeSettings {
                connection_timeout_ms: 200,
                ..DbRuntimeSettings::default()
            },
        );

        let err = check_connectivity(&pool).expect_err("missing directory should fail");
        assert!(matches!(err, PoolError::Connection(_)), "unexpected: {err:?}");
    }
}
