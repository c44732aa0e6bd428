//! Error types used by the listener runtime and transports.
//!
//! This module defines three error types:
//!
//! - [`TransportError`] — failures produced by a [`Transport`](crate::Transport)
//!   or [`Connection`](crate::Connection) implementation.
//! - [`ListenerError`] — errors surfaced by the listener runtime itself. Only
//!   [`ListenerError::Start`] is fatal; everything else is recovered internally.
//! - [`DispatchError`] — a failure while handling one delivered notification.
//!
//! All types provide `as_label` for stable snake_case identifiers in log lines.

use thiserror::Error;

/// # Errors produced by transport implementations.
///
/// Every variant below the initial connect is treated by the listener as
/// "connection lost": it is swallowed, reported through lifecycle hooks, and
/// triggers the reconnect loop. Variants are cloneable because a single
/// failure may need to be both replied to a ping caller and fed into the
/// reconnect machinery.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum TransportError {
    /// The store cannot be reached at all (refused, unresolvable, down).
    #[error("store unreachable: {reason}")]
    Unreachable {
        /// Human-readable cause.
        reason: String,
    },

    /// An established connection failed (dropped socket, failed ping, EOF).
    #[error("connection lost: {reason}")]
    ConnectionLost {
        /// Human-readable cause.
        reason: String,
    },

    /// The store rejected a listen command for one channel.
    #[error("listen on channel {channel:?} failed: {reason}")]
    Listen {
        /// The channel whose listen command failed.
        channel: String,
        /// Human-readable cause.
        reason: String,
    },

    /// The connection was closed deliberately and accepts no further work.
    #[error("connection closed")]
    Closed,
}

impl TransportError {
    /// Shorthand constructor for [`TransportError::Unreachable`].
    pub fn unreachable(reason: impl Into<String>) -> Self {
        TransportError::Unreachable {
            reason: reason.into(),
        }
    }

    /// Shorthand constructor for [`TransportError::ConnectionLost`].
    pub fn lost(reason: impl Into<String>) -> Self {
        TransportError::ConnectionLost {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in log lines.
    pub fn as_label(&self) -> &'static str {
        match self {
            TransportError::Unreachable { .. } => "transport_unreachable",
            TransportError::ConnectionLost { .. } => "transport_connection_lost",
            TransportError::Listen { .. } => "transport_listen_failed",
            TransportError::Closed => "transport_closed",
        }
    }
}

/// # Errors surfaced by the listener runtime.
///
/// The propagation policy is deliberately asymmetric: the one scenario that
/// needs operator intervention (total inability to connect at startup) is
/// returned from [`Listener::start`](crate::Listener::start) as
/// [`ListenerError::Start`]. Every failure after a successful start is
/// self-healing and only ever observable through lifecycle hooks.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ListenerError {
    /// The initial connection or initial listen command failed. Fatal:
    /// the caller should log and terminate.
    #[error("initial connection failed: {source}")]
    Start {
        /// Underlying transport failure.
        #[source]
        source: TransportError,
    },

    /// An out-of-band liveness probe failed; the listener is already
    /// reconnecting in the background.
    #[error("ping failed: {source}")]
    Ping {
        /// Underlying transport failure.
        #[source]
        source: TransportError,
    },

    /// The listener was closed; no further commands are accepted.
    #[error("listener closed")]
    Closed,
}

impl ListenerError {
    /// Returns a short stable label (snake_case) for use in log lines.
    ///
    /// # Example
    /// ```
    /// use relisten::{ListenerError, TransportError};
    ///
    /// let err = ListenerError::Start { source: TransportError::unreachable("refused") };
    /// assert_eq!(err.as_label(), "listener_start_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ListenerError::Start { .. } => "listener_start_failed",
            ListenerError::Ping { .. } => "listener_ping_failed",
            ListenerError::Closed => "listener_closed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ListenerError::Start { source } => format!("start failed: {source}"),
            ListenerError::Ping { source } => format!("ping failed: {source}"),
            ListenerError::Closed => "listener closed".to_string(),
        }
    }

    /// Indicates whether the error requires operator intervention.
    ///
    /// Returns `true` only for [`ListenerError::Start`]; everything else is
    /// recovered by the listener's own reconnect loop.
    ///
    /// # Example
    /// ```
    /// use relisten::{ListenerError, TransportError};
    ///
    /// let fatal = ListenerError::Start { source: TransportError::unreachable("down") };
    /// assert!(fatal.is_fatal());
    ///
    /// let transient = ListenerError::Ping { source: TransportError::lost("eof") };
    /// assert!(!transient.is_fatal());
    /// ```
    pub fn is_fatal(&self) -> bool {
        matches!(self, ListenerError::Start { .. })
    }
}

/// # A failure while handling one delivered notification.
///
/// Policy is local-only: the watchdog loop reports it through hooks and
/// continues with the next notification. It never terminates the event
/// sequence.
#[derive(Error, Debug)]
#[error("dispatch failed: {reason}")]
pub struct DispatchError {
    /// Human-readable cause.
    pub reason: String,
}

impl DispatchError {
    /// Creates a dispatch error with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
