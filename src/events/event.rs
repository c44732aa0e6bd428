//! # Lifecycle events emitted by the listener and watchdog.
//!
//! The [`EventKind`] enum classifies transitions across two categories:
//! - **Connection lifecycle**: connected, disconnected, attempt-failed,
//!   reconnected, closed
//! - **Watchdog diagnostics**: idle probes and dispatch failures
//!
//! The [`LifecycleEvent`] struct carries metadata such as timestamps, the
//! affected channel, failure reasons, attempt counters, and backoff delays.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically, so hooks that buffer events can restore emission order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use relisten::{EventKind, LifecycleEvent};
//!
//! let ev = LifecycleEvent::new(EventKind::AttemptFailed)
//!     .with_reason("store unreachable: refused")
//!     .with_attempt(3)
//!     .with_delay(Duration::from_secs(40));
//!
//! assert_eq!(ev.kind, EventKind::AttemptFailed);
//! assert_eq!(ev.attempt, Some(3));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Connection lifecycle ===
    /// Initial connection established and all listen commands accepted.
    ///
    /// Sets: `at`, `seq`.
    Connected,

    /// The live connection failed; the reconnect loop is starting.
    ///
    /// Sets:
    /// - `reason`: transport failure message
    /// - `at`, `seq`
    Disconnected,

    /// One reconnect attempt failed; the next is scheduled after `delay_ms`.
    ///
    /// Sets:
    /// - `attempt`: failed attempt number (1-based)
    /// - `delay_ms`: backoff delay before the next attempt
    /// - `reason`: transport failure message
    /// - `at`, `seq`
    AttemptFailed,

    /// Connection re-established and all listen commands replayed.
    ///
    /// Sets:
    /// - `attempt`: number of failed attempts before success
    /// - `at`, `seq`
    Reconnected,

    /// The listener was closed; no further events will be emitted.
    ///
    /// Sets: `at`, `seq`.
    Closed,

    // === Watchdog diagnostics ===
    /// No notification arrived within the idle window; a liveness probe was
    /// issued out-of-band.
    ///
    /// Sets:
    /// - `delay_ms`: the idle window that elapsed
    /// - `at`, `seq`
    IdleProbe,

    /// A notification handler failed; the watchdog continues with the next
    /// notification.
    ///
    /// Sets:
    /// - `channel`: channel of the offending notification
    /// - `reason`: handler failure message
    /// - `at`, `seq`
    DispatchFailed,
}

impl EventKind {
    /// Returns a short stable label (snake_case) for use in log lines.
    pub fn as_label(&self) -> &'static str {
        match self {
            EventKind::Connected => "connected",
            EventKind::Disconnected => "disconnected",
            EventKind::AttemptFailed => "attempt_failed",
            EventKind::Reconnected => "reconnected",
            EventKind::Closed => "closed",
            EventKind::IdleProbe => "idle_probe",
            EventKind::DispatchFailed => "dispatch_failed",
        }
    }
}

/// Lifecycle event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct LifecycleEvent {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Channel name, if the event concerns one channel.
    pub channel: Option<Arc<str>>,
    /// Human-readable reason (transport errors, handler failures).
    pub reason: Option<Arc<str>>,
    /// Reconnect attempt count (starting from 1).
    pub attempt: Option<u32>,
    /// Delay in milliseconds (backoff delay or elapsed idle window).
    pub delay_ms: Option<u32>,
}

impl LifecycleEvent {
    /// Creates a new event of the given kind with the current timestamp and
    /// next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            channel: None,
            reason: None,
            attempt: None,
            delay_ms: None,
        }
    }

    /// Attaches a channel name.
    #[inline]
    pub fn with_channel(mut self, channel: impl Into<Arc<str>>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a reconnect attempt count.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Returns the delay as a [`Duration`], if one was attached.
    #[inline]
    pub fn delay(&self) -> Option<Duration> {
        self.delay_ms.map(|ms| Duration::from_millis(u64::from(ms)))
    }
}
