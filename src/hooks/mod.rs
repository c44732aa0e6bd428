//! # Lifecycle hooks for the listener runtime.
//!
//! This module provides the [`Hook`] trait, the [`HookSet`] fan-out wrapper,
//! and a built-in stdout logger behind the `logging` feature.
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   connection task ── emit(&LifecycleEvent) ──► HookSet
//!   watchdog loop   ──────────────────────────►   │
//!                                            ┌────┴────┬────────┐
//!                                            ▼         ▼        ▼
//!                                         LogHook   Metrics   Custom ...
//! ```
//!
//! ## Contract
//! Hooks are invoked **synchronously** on the task that observed the
//! transition, so the host process sees state changes in order and without
//! buffering. The flip side: a hook that blocks stalls reconnection. Keep
//! hooks at logging-scale cost; offload anything heavier to your own task.
//!
//! Panics in a hook are caught by [`HookSet`] so one misbehaving hook cannot
//! take down the connection task.

mod hook;
#[cfg(feature = "logging")]
mod log;
mod set;

pub use hook::Hook;
#[cfg(feature = "logging")]
pub use log::LogHook;
pub use set::HookSet;
