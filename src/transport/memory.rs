//! # In-process pub/sub broker.
//!
//! [`MemoryHub`] implements [`Transport`] against a broker living in the
//! current process. It exists for demos and tests: besides `publish`, it
//! exposes fault-injection controls (`set_reachable`, `drop_connections`)
//! that reproduce the failure modes the listener must survive.
//!
//! Semantics mirror a connection-scoped notify primitive:
//! - a connection only receives channels it issued `listen` for;
//! - dropping a connection discards its registrations;
//! - notifications published while nobody listens are lost.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::TransportError;
use crate::transport::{Connection, Notification, Transport};

#[derive(Default)]
struct HubState {
    reachable: bool,
    next_id: u64,
    pings: u64,
    conns: HashMap<u64, ConnEntry>,
}

struct ConnEntry {
    channels: HashSet<Arc<str>>,
    tx: mpsc::UnboundedSender<Notification>,
}

/// In-process broker; cheap to clone, all clones share one state.
#[derive(Clone)]
pub struct MemoryHub {
    inner: Arc<Mutex<HubState>>,
}

impl Default for MemoryHub {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHub {
    /// Creates a reachable hub with no connections.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HubState {
                reachable: true,
                ..HubState::default()
            })),
        }
    }

    // Test infrastructure: a poisoned lock here means a test already panicked.
    fn state(&self) -> MutexGuard<'_, HubState> {
        self.inner.lock().expect("hub state poisoned")
    }

    /// Publishes a notification to every connection listening on `channel`.
    ///
    /// Returns the number of connections it was delivered to.
    pub fn publish(&self, channel: &str, payload: impl Into<String>) -> usize {
        let payload = payload.into();
        let channel: Arc<str> = channel.into();
        let state = self.state();
        let mut delivered = 0;
        for entry in state.conns.values() {
            if entry.channels.contains(&channel) {
                let note = Notification::new(channel.clone(), payload.clone());
                if entry.tx.send(note).is_ok() {
                    delivered += 1;
                }
            }
        }
        delivered
    }

    /// Makes the hub accept or refuse new connections (and fail pings).
    pub fn set_reachable(&self, reachable: bool) {
        self.state().reachable = reachable;
    }

    /// Severs every live connection: in-flight `recv` calls fail with
    /// `ConnectionLost` and all listen registrations are discarded.
    pub fn drop_connections(&self) {
        self.state().conns.clear();
    }

    /// Number of live connections.
    pub fn connection_count(&self) -> usize {
        self.state().conns.len()
    }

    /// Total pings answered (successfully or not) since creation.
    pub fn ping_count(&self) -> u64 {
        self.state().pings
    }
}

#[async_trait]
impl Transport for MemoryHub {
    type Conn = MemoryConnection;

    async fn connect(&self) -> Result<MemoryConnection, TransportError> {
        let mut state = self.state();
        if !state.reachable {
            return Err(TransportError::unreachable("memory hub marked down"));
        }
        let id = state.next_id;
        state.next_id += 1;
        let (tx, rx) = mpsc::unbounded_channel();
        state.conns.insert(
            id,
            ConnEntry {
                channels: HashSet::new(),
                tx,
            },
        );
        Ok(MemoryConnection {
            id,
            hub: self.clone(),
            rx,
        })
    }
}

/// One live connection to a [`MemoryHub`].
pub struct MemoryConnection {
    id: u64,
    hub: MemoryHub,
    rx: mpsc::UnboundedReceiver<Notification>,
}

#[async_trait]
impl Connection for MemoryConnection {
    async fn listen(&mut self, channel: &str) -> Result<(), TransportError> {
        let mut state = self.hub.state();
        if !state.reachable {
            return Err(TransportError::lost("memory hub marked down"));
        }
        match state.conns.get_mut(&self.id) {
            Some(entry) => {
                entry.channels.insert(channel.into());
                Ok(())
            }
            None => Err(TransportError::lost("connection dropped by hub")),
        }
    }

    async fn recv(&mut self) -> Result<Notification, TransportError> {
        // The sender lives in the hub entry; drop_connections() drops it,
        // which wakes this recv with None.
        match self.rx.recv().await {
            Some(note) => Ok(note),
            None => Err(TransportError::lost("connection dropped by hub")),
        }
    }

    async fn ping(&mut self) -> Result<(), TransportError> {
        let mut state = self.hub.state();
        state.pings += 1;
        if state.reachable && state.conns.contains_key(&self.id) {
            Ok(())
        } else {
            Err(TransportError::lost("ping failed: connection dropped"))
        }
    }
}

impl Drop for MemoryConnection {
    fn drop(&mut self) {
        if let Ok(mut state) = self.hub.inner.lock() {
            state.conns.remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_delivers_only_to_listened_channels() {
        let hub = MemoryHub::new();
        let mut conn = hub.connect().await.unwrap();
        conn.listen("hello").await.unwrap();

        assert_eq!(hub.publish("hello", "Ann"), 1);
        assert_eq!(hub.publish("other", "Bob"), 0);

        let note = conn.recv().await.unwrap();
        assert_eq!(note.channel.as_ref(), "hello");
        assert_eq!(note.payload, "Ann");
    }

    #[tokio::test]
    async fn test_unreachable_hub_refuses_connections() {
        let hub = MemoryHub::new();
        hub.set_reachable(false);
        let err = hub.connect().await.err().unwrap();
        assert_eq!(err.as_label(), "transport_unreachable");
    }

    #[tokio::test]
    async fn test_drop_connections_fails_inflight_recv() {
        let hub = MemoryHub::new();
        let mut conn = hub.connect().await.unwrap();
        conn.listen("hello").await.unwrap();

        let recv = tokio::spawn(async move { conn.recv().await });
        tokio::task::yield_now().await;
        hub.drop_connections();

        let err = recv.await.unwrap().unwrap_err();
        assert_eq!(err.as_label(), "transport_connection_lost");
    }

    #[tokio::test]
    async fn test_ping_tracks_liveness() {
        let hub = MemoryHub::new();
        let mut conn = hub.connect().await.unwrap();
        assert!(conn.ping().await.is_ok());

        hub.drop_connections();
        assert!(conn.ping().await.is_err());
        assert_eq!(hub.ping_count(), 2);
    }

    #[tokio::test]
    async fn test_dropped_connection_unregisters() {
        let hub = MemoryHub::new();
        let conn = hub.connect().await.unwrap();
        assert_eq!(hub.connection_count(), 1);
        drop(conn);
        assert_eq!(hub.connection_count(), 0);
    }
}
