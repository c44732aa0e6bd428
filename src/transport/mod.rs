//! # Transport abstraction: the pub/sub capability the listener runs on.
//!
//! The listener core never talks to a concrete store. It is written against
//! two traits:
//!
//! - [`Transport`] — can open a fresh connection to the store;
//! - [`Connection`] — one live connection: issue listen commands, receive
//!   notifications, and answer out-of-band liveness probes.
//!
//! Any backing store providing this capability set is substitutable: a
//! database client with a notify primitive, a message broker, or the bundled
//! in-process [`MemoryHub`] used for demos and fault-injection tests.
//!
//! ## Contract notes
//! - The store's notify primitive is assumed **at-most-once, best-effort,
//!   connection-scoped**: subscriptions die with the connection (the listener
//!   replays listen commands on every reconnect) and nothing published while
//!   disconnected is recoverable.
//! - [`Connection::recv`] must be **cancel-safe**: the connection task races
//!   it against shutdown and ping commands inside `select!`, and a future
//!   dropped before completion must not lose a notification.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TransportError;

#[cfg(any(test, feature = "memory"))]
mod memory;

#[cfg(any(test, feature = "memory"))]
pub use memory::{MemoryConnection, MemoryHub};

/// One notification delivered on a subscribed channel.
///
/// The payload is opaque to the core: it is handed to the configured
/// [`Dispatch`](crate::Dispatch) handler untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    /// Channel the notification was published on.
    pub channel: Arc<str>,
    /// Extra data attached by the publisher. May be empty.
    pub payload: String,
}

impl Notification {
    /// Creates a notification.
    pub fn new(channel: impl Into<Arc<str>>, payload: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            payload: payload.into(),
        }
    }
}

/// Capability to open connections to the store.
///
/// The listener holds one `Transport` for its whole life and calls
/// [`Transport::connect`] once at start and once per reconnect attempt.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Concrete connection type produced by this transport.
    type Conn: Connection;

    /// Opens a fresh connection.
    ///
    /// Returns [`TransportError::Unreachable`] when the store cannot be
    /// reached; the listener turns this into a fatal error at start and into
    /// a backoff-scheduled retry afterwards.
    async fn connect(&self) -> Result<Self::Conn, TransportError>;
}

/// One live connection to the store.
#[async_trait]
pub trait Connection: Send + 'static {
    /// Requests delivery of notifications published on `channel`.
    ///
    /// Connection-scoped: the registration is lost when the connection drops
    /// and must be re-issued on the replacement connection.
    async fn listen(&mut self, channel: &str) -> Result<(), TransportError>;

    /// Waits for the next notification.
    ///
    /// Must be cancel-safe (see module docs). An error means the connection
    /// is no longer usable.
    async fn recv(&mut self) -> Result<Notification, TransportError>;

    /// Out-of-band liveness probe.
    ///
    /// Does not disturb the listen registrations. An error means the
    /// connection is no longer usable.
    async fn ping(&mut self) -> Result<(), TransportError>;
}
