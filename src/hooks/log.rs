//! # Simple logging hook for debugging and demos.
//!
//! [`LogHook`] prints lifecycle events to stdout in a human-readable format.
//! This is primarily useful for development, debugging, and examples.
//!
//! ## Output format
//! ```text
//! [connected]
//! [disconnected] reason="connection lost: eof"
//! [attempt-failed] attempt=3 delay=40s reason="store unreachable: refused"
//! [reconnected] after_attempts=3
//! [idle-probe] idle=90s checking for new work
//! [dispatch-failed] channel="hello" reason="malformed payload"
//! [closed]
//! ```

use crate::events::{EventKind, LifecycleEvent};
use crate::hooks::Hook;

/// Simple stdout logging hook.
///
/// Enabled via the `logging` feature. Prints human-readable event
/// descriptions to stdout for debugging and demonstration purposes.
///
/// Not intended for production use - implement a custom [`Hook`] for
/// structured logging or metrics collection.
#[derive(Default)]
pub struct LogHook;

impl Hook for LogHook {
    fn on_event(&self, e: &LifecycleEvent) {
        match e.kind {
            EventKind::Connected => {
                println!("[connected]");
            }
            EventKind::Disconnected => {
                println!("[disconnected] reason={:?}", e.reason.as_deref().unwrap_or(""));
            }
            EventKind::AttemptFailed => {
                println!(
                    "[attempt-failed] attempt={:?} delay={:?} reason={:?}",
                    e.attempt,
                    e.delay(),
                    e.reason.as_deref().unwrap_or("")
                );
            }
            EventKind::Reconnected => {
                println!("[reconnected] after_attempts={:?}", e.attempt);
            }
            EventKind::IdleProbe => {
                println!(
                    "[idle-probe] idle={:?} checking for new work",
                    e.delay()
                );
            }
            EventKind::DispatchFailed => {
                println!(
                    "[dispatch-failed] channel={:?} reason={:?}",
                    e.channel.as_deref().unwrap_or(""),
                    e.reason.as_deref().unwrap_or("")
                );
            }
            EventKind::Closed => {
                println!("[closed]");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-hook"
    }
}
