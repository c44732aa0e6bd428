//! # Watchdog: event-or-timeout dispatch loop.
//!
//! Consumes a [`Listener`]'s notification sequence, hands every notification
//! to the configured [`Dispatch`] handler, and refuses to passively trust a
//! silent connection: when nothing arrives for one idle window, it emits a
//! diagnostic [`EventKind::IdleProbe`] and fires an out-of-band ping, in case
//! the transport has not yet noticed a dead connection.
//!
//! ## Loop shape
//! ```text
//! loop {
//!   select! {
//!     note = listener.recv() => Some(..) → dispatch, re-arm idle timer
//!                               None     → listener closed, exit cleanly
//!     _ = sleep(idle_timeout) => emit IdleProbe,
//!                                spawn handle.ping() (fire-and-forget),
//!                                re-arm idle timer
//!   }
//! }
//! ```
//!
//! ## Rules
//! - A dispatch failure is reported as [`EventKind::DispatchFailed`] and the
//!   loop continues; it never terminates the sequence. A panicking handler is
//!   caught and reported the same way.
//! - The ping result is deliberately not awaited by the loop: a slow or
//!   blocking probe cannot stall dispatch. A failed probe already makes the
//!   connection task reconnect on its own.
//! - The loop never exits on its own; only a closed listener ends it.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

use tokio::time;

use crate::core::listener::Listener;
use crate::dispatch::Dispatch;
use crate::events::{EventKind, LifecycleEvent};
use crate::hooks::HookSet;

/// Default idle window before a silent connection gets probed.
const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// Consume-and-dispatch loop with an idle liveness check.
pub struct Watchdog<D: Dispatch> {
    dispatcher: D,
    hooks: HookSet,
    idle_timeout: Duration,
}

impl<D: Dispatch> Watchdog<D> {
    /// Creates a watchdog with the default 90s idle window.
    pub fn new(dispatcher: D, hooks: HookSet) -> Self {
        Self {
            dispatcher,
            hooks,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }

    /// Overrides the idle window after which a liveness probe is issued.
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Runs until the listener's sequence terminates.
    ///
    /// Owns the listener for the duration; close it through a
    /// [`ListenerHandle`](crate::ListenerHandle) taken before calling this.
    pub async fn run(self, mut listener: Listener) {
        loop {
            let wake = tokio::select! {
                note = listener.recv() => Some(note),
                _ = time::sleep(self.idle_timeout) => None,
            };

            match wake {
                Some(Some(note)) => {
                    // Panics are isolated like hook panics in `HookSet::emit`;
                    // a misbehaving handler must not kill the loop.
                    let failed =
                        match catch_unwind(AssertUnwindSafe(|| self.dispatcher.dispatch(&note))) {
                            Ok(Ok(())) => None,
                            Ok(Err(err)) => Some(err.to_string()),
                            Err(_) => Some(format!("handler {} panicked", self.dispatcher.name())),
                        };
                    if let Some(reason) = failed {
                        self.hooks.emit(
                            &LifecycleEvent::new(EventKind::DispatchFailed)
                                .with_channel(note.channel.clone())
                                .with_reason(reason),
                        );
                    }
                }
                // Sequence terminated: listener closed, exit cleanly.
                Some(None) => break,
                None => {
                    self.hooks.emit(
                        &LifecycleEvent::new(EventKind::IdleProbe)
                            .with_delay(self.idle_timeout),
                    );
                    let handle = listener.handle();
                    tokio::spawn(async move {
                        let _ = handle.ping().await;
                    });
                }
            }
        }
    }
}
