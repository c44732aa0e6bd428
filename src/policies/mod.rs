//! Reconnection delay policies.
//!
//! This module groups the knobs that control **how long** the listener waits
//! between reconnect attempts.
//!
//! ## Contents
//! - [`BackoffPolicy`] how retry delays evolve (first / factor / max + jitter)
//! - [`JitterPolicy`]  randomization strategy to avoid synchronized retries
//!
//! ## Quick wiring
//! ```text
//! Config { min_reconnect, max_reconnect, backoff_factor, jitter }
//!      └─► Config::backoff() -> BackoffPolicy
//!           └─► core::listener reconnect loop uses backoff.next(attempt)
//!               to schedule each retry after a lost connection
//! ```
//!
//! ## Defaults
//! - `BackoffPolicy::default()` → first=10s, factor=2.0, max=60s, jitter=None,
//!   matching a "retry quickly but never hammer the store" posture.
//! - Delays are floored at `first`: retries are never scheduled closer
//!   together than the configured minimum interval, jitter included.

mod backoff;
mod jitter;

pub use backoff::BackoffPolicy;
pub use jitter::JitterPolicy;
