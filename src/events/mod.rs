//! Lifecycle events: the observable surface of the connection state machine.
//!
//! The connection state ({Disconnected, Connecting, Connected}) is owned
//! exclusively by the listener's connection task and is never exposed for
//! external mutation; every transition is instead reported as a
//! [`LifecycleEvent`] through the configured [`HookSet`](crate::HookSet).
//!
//! ## Contents
//! - [`EventKind`], [`LifecycleEvent`] event classification and metadata
//!
//! ## Quick reference
//! - **Publishers**: `core::listener` (connect/disconnect/reconnect cycle),
//!   `core::watchdog` (idle probes, dispatch failures).
//! - **Consumers**: user hooks registered at start, e.g. the built-in
//!   [`LogHook`](crate::LogHook) behind the `logging` feature.

mod event;

pub use event::{EventKind, LifecycleEvent};
