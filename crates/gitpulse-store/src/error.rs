//! Error types for the event store.

/// Errors that can occur during event store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No database connection could be obtained.
    #[error("event store connection error: {0}")]
    Connection(#[from] r2d2::Error),

    /// A database operation failed.
    #[error("event store database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The event log schema could not be brought up to date.
    #[error("event store schema error: {0}")]
    Schema(#[from] gitpulse_db::MigrationError),

    /// A stored row could not be mapped back to a canonical event.
    #[error("corrupt event record {id}: {reason}")]
    CorruptRecord {
        /// Row id of the offending record.
        id: i64,
        /// What was wrong with it.
        reason: String,
    },
}
