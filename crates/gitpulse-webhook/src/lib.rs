//! Webhook payload classification.
//!
//! Turns an untrusted, loosely-typed webhook body into at most one
//! [`CanonicalEvent`](gitpulse_types::CanonicalEvent). Classification is a
//! pure, synchronous function: it never fails and never panics. Missing or
//! wrongly-typed fields fall back to defaults, and payloads that describe
//! untracked activity are reported as [`Classification::Ignored`].
//!
//! # Rules
//!
//! Rules are tried in order; the first match wins.
//!
//! | Priority | Payload shape | Result |
//! |----------|---------------|--------|
//! | 1 | has `pull_request` | `MERGE` on closed+merged, `PULL_REQUEST` on opened, otherwise ignored |
//! | 2 | has both `ref` and `commits` | `PUSH` |
//! | 3 | anything else | ignored |
//!
//! # Usage
//!
//! ```rust,ignore
//! use gitpulse_webhook::{classify, Classification};
//!
//! match classify(&payload) {
//!     Classification::Event(event) => store.insert(&event)?,
//!     Classification::Ignored(reason) => tracing::info!(%reason, "ignoring webhook"),
//! }
//! ```

mod classify;
mod timestamp;

pub use classify::{classify, classify_at, Classification, IgnoreReason};
pub use timestamp::{parse_timestamp, resolve_timestamp, TimestampError};
