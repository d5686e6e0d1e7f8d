//! Database layer for gitpulse.
//!
//! Provides SQLite connection pooling (via `r2d2`), WAL-mode initialization,
//! a connectivity probe and embedded SQL migrations. The event log table is
//! created through versioned migrations managed by this crate.
//!
//! # Design decisions
//!
//! - **SQLite with WAL mode**: concurrent readers with a single writer, which
//!   matches a webhook receiver that mostly appends and a dashboard that
//!   mostly reads.
//! - **Lazy `r2d2` pool**: the pool is built without opening connections, so
//!   an unreachable database is reported by [`check_connectivity`] instead of
//!   aborting startup.
//! - **Embedded migrations**: SQL files are compiled into the binary via
//!   `include_str!` and cannot drift from the code that depends on them.

mod migrations;
mod pool;

pub use migrations::{run_migrations, MigrationError};
pub use pool::{check_connectivity, create_pool, DbPool, DbRuntimeSettings, PoolError};
