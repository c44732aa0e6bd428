//! Runtime core: the reconnecting listener and its watchdog.
//!
//! The public API from this module is [`Listener`] / [`ListenerHandle`]
//! (subscription lifecycle over an unreliable transport), [`Watchdog`]
//! (consume-and-dispatch loop with idle liveness checks), and
//! [`wait_for_shutdown_signal`] for process harnesses.
//!
//! Internal split:
//! - [`listener`]: connection task owning the transport, reconnect backoff;
//! - [`watchdog`]: event-or-timeout dispatch loop;
//! - [`shutdown`]: cross-platform termination signal handling.

mod listener;
mod shutdown;
mod watchdog;

pub use listener::{Listener, ListenerHandle};
pub use shutdown::wait_for_shutdown_signal;
pub use watchdog::Watchdog;
