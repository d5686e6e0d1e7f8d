//! Append-only event store for gitpulse.
//!
//! Canonical events are persisted once and never updated or removed. The
//! store exposes two operations through the [`EventStore`] trait:
//!
//! - [`EventStore::insert`] appends one event and returns its id.
//! - [`EventStore::latest`] returns the most recent events, newest first.
//!
//! [`SqliteEventStore`] is the production implementation, backed by the
//! `github_events` table created by `gitpulse-db` migrations, which the store
//! applies itself on its first successful connection. Callers hold
//! the store as an explicit handle (usually `Arc<dyn EventStore>`); there is
//! no process-wide database handle.
//!
//! Store calls block on SQLite. Async callers should run them on a blocking
//! thread and impose their own timeout.

mod error;
mod store;

pub use error::StoreError;
pub use store::{EventStore, SqliteEventStore};
