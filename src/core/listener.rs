//! # Listener: one logical subscription over an unreliable transport.
//!
//! [`Listener::start`] opens the initial connection, issues the listen
//! command for every subscribed channel, then hands the connection to a
//! background **connection task** that owns it exclusively for the rest of
//! the listener's life.
//!
//! ## Architecture
//! ```text
//! Listener::start(transport, subscription, config, hooks)
//!     │  initial connect + listen (the only fatal failure point)
//!     ▼
//! ConnectionTask::run()                           Consumer side:
//!   loop {                                          Listener::recv()
//!     pump:  select! {                                ▲
//!       conn.recv() ──► notifications ────────────────┘ (unbounded SPSC)
//!       commands    ──► conn.ping(), reply via oneshot
//!       token      ──► exit
//!     }
//!     on transport error:
//!       emit Disconnected
//!       reconnect: try_connect immediately,
//!                  then sleep backoff.next(n) between attempts
//!                  (AttemptFailed per failure, pings answered Err meanwhile)
//!       emit Reconnected, replay listen commands, continue
//!   }
//!   emit Closed, drop notifications sender → recv() yields None
//! ```
//!
//! ## Rules
//! - At most one live connection exists at any time; reconnect attempts run
//!   on the connection task and are therefore serialized.
//! - Transport errors after start never reach the notification consumer;
//!   they become lifecycle events plus a backoff-scheduled reconnect.
//! - Hooks run synchronously on the connection task, in transition order.

use tokio::sync::{mpsc, oneshot};
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::{ListenerError, TransportError};
use crate::events::{EventKind, LifecycleEvent};
use crate::hooks::HookSet;
use crate::policies::BackoffPolicy;
use crate::subscription::Subscription;
use crate::transport::{Connection, Notification, Transport};

/// Commands accepted by the connection task.
enum Command {
    Ping(oneshot::Sender<Result<(), TransportError>>),
}

/// What woke the pump loop.
enum Wake {
    Inbound(Result<Notification, TransportError>),
    Cmd(Option<Command>),
    Shutdown,
}

/// Why the pump loop ended.
enum Pump {
    Closed,
    Lost(TransportError),
}

/// A started listener: the single consumer of the notification sequence.
///
/// Obtained from [`Listener::start`]. Dropping it closes the listener
/// implicitly; prefer [`Listener::close`] for an orderly shutdown that waits
/// for the connection task.
pub struct Listener {
    notifications: mpsc::UnboundedReceiver<Notification>,
    handle: ListenerHandle,
    join: tokio::task::JoinHandle<()>,
}

/// Cloneable control handle to a running listener.
///
/// Lets harness code and the watchdog probe liveness or request shutdown
/// without holding the notification sequence.
#[derive(Clone)]
pub struct ListenerHandle {
    commands: mpsc::UnboundedSender<Command>,
    token: CancellationToken,
}

impl ListenerHandle {
    /// Issues an out-of-band liveness probe on the current connection.
    ///
    /// The probe does not disturb the listen registrations. While the
    /// listener is between connections, the probe fails immediately with
    /// [`ListenerError::Ping`]; a probe failure on a live connection also
    /// makes the connection task treat the connection as lost.
    pub async fn ping(&self) -> Result<(), ListenerError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(Command::Ping(tx))
            .map_err(|_| ListenerError::Closed)?;
        match rx.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => Err(ListenerError::Ping { source }),
            // Task exited before answering.
            Err(_) => Err(ListenerError::Closed),
        }
    }

    /// Requests shutdown: stops reconnection and terminates the sequence.
    pub fn close(&self) {
        self.token.cancel();
    }

    /// Returns `true` once shutdown has been requested.
    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Listener {
    /// Establishes the initial connection, issues the listen command for
    /// every channel in `subscription`, and spawns the connection task.
    ///
    /// This is the only operation that can fail fatally: an unreachable
    /// store or a rejected listen command here returns
    /// [`ListenerError::Start`] and the caller should treat it as fatal.
    /// Every failure after a successful return is self-healing.
    pub async fn start<T: Transport>(
        transport: T,
        subscription: Subscription,
        config: Config,
        hooks: HookSet,
    ) -> Result<Self, ListenerError> {
        let mut conn = transport
            .connect()
            .await
            .map_err(|source| ListenerError::Start { source })?;
        for channel in subscription.iter() {
            conn.listen(channel)
                .await
                .map_err(|source| ListenerError::Start { source })?;
        }
        hooks.emit(&LifecycleEvent::new(EventKind::Connected));

        let (notif_tx, notif_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let token = CancellationToken::new();

        let task = ConnectionTask {
            transport,
            subscription,
            backoff: config.backoff(),
            hooks,
            notifications: notif_tx,
            commands: cmd_rx,
        };
        let join = tokio::spawn(task.run(conn, token.clone()));

        Ok(Self {
            notifications: notif_rx,
            handle: ListenerHandle {
                commands: cmd_tx,
                token,
            },
            join,
        })
    }

    /// Waits for the next notification.
    ///
    /// Yields notifications in transport delivery order (no ordering across
    /// a reconnect boundary). Returns `None` only after the listener has
    /// been closed; the sequence is infinite otherwise. Cancel-safe.
    pub async fn recv(&mut self) -> Option<Notification> {
        self.notifications.recv().await
    }

    /// Returns a cloneable control handle.
    pub fn handle(&self) -> ListenerHandle {
        self.handle.clone()
    }

    /// Issues an out-of-band liveness probe. See [`ListenerHandle::ping`].
    pub async fn ping(&self) -> Result<(), ListenerError> {
        self.handle.ping().await
    }

    /// Orderly shutdown: stops reconnection, releases the connection, and
    /// waits for the connection task to finish. The notification sequence
    /// terminates (yields `None` to nobody — `self` is consumed).
    pub async fn close(self) {
        self.handle.close();
        let _ = self.join.await;
    }
}

/// Background task owning the transport connection exclusively.
struct ConnectionTask<T: Transport> {
    transport: T,
    subscription: Subscription,
    backoff: BackoffPolicy,
    hooks: HookSet,
    notifications: mpsc::UnboundedSender<Notification>,
    commands: mpsc::UnboundedReceiver<Command>,
}

impl<T: Transport> ConnectionTask<T> {
    async fn run(mut self, mut conn: T::Conn, token: CancellationToken) {
        loop {
            match self.pump(&mut conn, &token).await {
                Pump::Closed => break,
                Pump::Lost(err) => {
                    // Release the dead connection now; holding it through the
                    // backoff window would keep a broken socket open.
                    drop(conn);
                    self.hooks.emit(
                        &LifecycleEvent::new(EventKind::Disconnected)
                            .with_reason(err.to_string()),
                    );
                }
            }

            match self.reconnect(&token).await {
                Some((fresh, failures)) => {
                    conn = fresh;
                    self.hooks.emit(
                        &LifecycleEvent::new(EventKind::Reconnected).with_attempt(failures),
                    );
                }
                None => break,
            }
        }
        self.hooks.emit(&LifecycleEvent::new(EventKind::Closed));
        // Dropping `self.notifications` here terminates the sequence.
    }

    /// Connected phase: forward notifications and answer pings until the
    /// connection fails or shutdown is requested.
    async fn pump(&mut self, conn: &mut T::Conn, token: &CancellationToken) -> Pump {
        loop {
            let wake = tokio::select! {
                _ = token.cancelled() => Wake::Shutdown,
                msg = conn.recv() => Wake::Inbound(msg),
                cmd = self.commands.recv() => Wake::Cmd(cmd),
            };

            match wake {
                Wake::Shutdown => return Pump::Closed,
                Wake::Inbound(Ok(note)) => {
                    if self.notifications.send(note).is_err() {
                        // Consumer dropped the Listener; nothing left to do.
                        return Pump::Closed;
                    }
                }
                Wake::Inbound(Err(err)) => return Pump::Lost(err),
                Wake::Cmd(Some(Command::Ping(reply))) => {
                    // A hung transport ping must not block shutdown; dropping
                    // `reply` here answers the caller with `Closed`.
                    let res = tokio::select! {
                        _ = token.cancelled() => return Pump::Closed,
                        res = conn.ping() => res,
                    };
                    let lost = res.clone().err();
                    let _ = reply.send(res);
                    if let Some(err) = lost {
                        return Pump::Lost(err);
                    }
                }
                // All handles dropped together with the Listener.
                Wake::Cmd(None) => return Pump::Closed,
            }
        }
    }

    /// Disconnected phase: retry until the store is reachable again.
    ///
    /// The first attempt runs immediately; each failure schedules the next
    /// attempt after `backoff.next(n)`, bounded by the configured min/max.
    /// Pings arriving meanwhile are answered with an error right away.
    /// Returns the fresh connection and the number of failed attempts, or
    /// `None` on shutdown.
    async fn reconnect(&mut self, token: &CancellationToken) -> Option<(T::Conn, u32)> {
        let mut failures: u32 = 0;
        loop {
            if token.is_cancelled() {
                return None;
            }
            match self.try_connect().await {
                Ok(conn) => return Some((conn, failures)),
                Err(err) => {
                    let delay = self.backoff.next(failures);
                    failures = failures.saturating_add(1);
                    self.hooks.emit(
                        &LifecycleEvent::new(EventKind::AttemptFailed)
                            .with_attempt(failures)
                            .with_delay(delay)
                            .with_reason(err.to_string()),
                    );

                    let sleep = time::sleep(delay);
                    tokio::pin!(sleep);
                    loop {
                        tokio::select! {
                            _ = &mut sleep => break,
                            _ = token.cancelled() => return None,
                            cmd = self.commands.recv() => match cmd {
                                Some(Command::Ping(reply)) => {
                                    let _ = reply.send(Err(TransportError::lost(
                                        "listener is reconnecting",
                                    )));
                                }
                                None => return None,
                            },
                        }
                    }
                }
            }
        }
    }

    /// One reconnect attempt: connect, then replay every listen command.
    /// The store discards connection-scoped subscriptions, so a partial
    /// replay failure discards the connection and counts as a failed attempt.
    async fn try_connect(&self) -> Result<T::Conn, TransportError> {
        let mut conn = self.transport.connect().await?;
        for channel in self.subscription.iter() {
            conn.listen(channel).await?;
        }
        Ok(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use crate::hooks::Hook;
    use crate::policies::JitterPolicy;
    use crate::transport::{MemoryConnection, MemoryHub};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    /// Records every lifecycle event kind, in order.
    struct Recorder(Mutex<Vec<EventKind>>);

    impl Recorder {
        fn arc() -> Arc<Self> {
            Arc::new(Self(Mutex::new(Vec::new())))
        }

        fn kinds(&self) -> Vec<EventKind> {
            self.0.lock().unwrap().clone()
        }

        fn count(&self, kind: EventKind) -> usize {
            self.kinds().iter().filter(|k| **k == kind).count()
        }
    }

    impl Hook for Recorder {
        fn on_event(&self, event: &LifecycleEvent) {
            self.0.lock().unwrap().push(event.kind);
        }
    }

    fn fast_config() -> Config {
        Config {
            min_reconnect: Duration::from_millis(20),
            max_reconnect: Duration::from_millis(100),
            idle_timeout: Duration::from_secs(90),
            backoff_factor: 2.0,
            jitter: JitterPolicy::None,
        }
    }

    /// Hub wrapper counting connection objects that are still alive.
    #[derive(Clone)]
    struct TrackedHub {
        hub: MemoryHub,
        live: Arc<AtomicUsize>,
    }

    struct TrackedConn {
        inner: MemoryConnection,
        live: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Transport for TrackedHub {
        type Conn = TrackedConn;

        async fn connect(&self) -> Result<TrackedConn, TransportError> {
            let inner = self.hub.connect().await?;
            self.live.fetch_add(1, Ordering::SeqCst);
            Ok(TrackedConn {
                inner,
                live: self.live.clone(),
            })
        }
    }

    #[async_trait]
    impl Connection for TrackedConn {
        async fn listen(&mut self, channel: &str) -> Result<(), TransportError> {
            self.inner.listen(channel).await
        }

        async fn recv(&mut self) -> Result<Notification, TransportError> {
            self.inner.recv().await
        }

        async fn ping(&mut self) -> Result<(), TransportError> {
            self.inner.ping().await
        }
    }

    impl Drop for TrackedConn {
        fn drop(&mut self) {
            self.live.fetch_sub(1, Ordering::SeqCst);
        }
    }

    /// Transport whose connections never yield and never answer pings.
    struct StallStore;

    struct StallConn;

    #[async_trait]
    impl Transport for StallStore {
        type Conn = StallConn;

        async fn connect(&self) -> Result<StallConn, TransportError> {
            Ok(StallConn)
        }
    }

    #[async_trait]
    impl Connection for StallConn {
        async fn listen(&mut self, _channel: &str) -> Result<(), TransportError> {
            Ok(())
        }

        async fn recv(&mut self) -> Result<Notification, TransportError> {
            std::future::pending().await
        }

        async fn ping(&mut self) -> Result<(), TransportError> {
            std::future::pending().await
        }
    }

    async fn wait_for_reconnect(hub: &MemoryHub) {
        for _ in 0..200 {
            if hub.connection_count() > 0 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("listener did not reconnect in time");
    }

    #[tokio::test]
    async fn test_start_fails_fast_when_unreachable() {
        let hub = MemoryHub::new();
        hub.set_reachable(false);

        let err = Listener::start(
            hub,
            Subscription::channel("hello"),
            fast_config(),
            HookSet::empty(),
        )
        .await
        .err()
        .unwrap();

        assert!(err.is_fatal());
        assert_eq!(err.as_label(), "listener_start_failed");
    }

    #[tokio::test]
    async fn test_delivers_in_publish_order() {
        let hub = MemoryHub::new();
        let mut listener = Listener::start(
            hub.clone(),
            Subscription::channel("hello"),
            fast_config(),
            HookSet::empty(),
        )
        .await
        .unwrap();

        for name in ["Ann", "Bob", "Cid"] {
            assert_eq!(hub.publish("hello", name), 1);
        }

        assert_eq!(listener.recv().await.unwrap().payload, "Ann");
        assert_eq!(listener.recv().await.unwrap().payload, "Bob");
        assert_eq!(listener.recv().await.unwrap().payload, "Cid");

        listener.close().await;
    }

    #[tokio::test]
    async fn test_ignores_channels_outside_subscription() {
        let hub = MemoryHub::new();
        let mut listener = Listener::start(
            hub.clone(),
            Subscription::channel("hello"),
            fast_config(),
            HookSet::empty(),
        )
        .await
        .unwrap();

        assert_eq!(hub.publish("other", "nope"), 0);
        assert_eq!(hub.publish("hello", "Ann"), 1);
        assert_eq!(listener.recv().await.unwrap().payload, "Ann");

        listener.close().await;
    }

    #[tokio::test]
    async fn test_reconnects_after_connection_drop() {
        let hub = MemoryHub::new();
        let recorder = Recorder::arc();
        let mut listener = Listener::start(
            hub.clone(),
            Subscription::channel("hello"),
            fast_config(),
            HookSet::new(vec![recorder.clone()]),
        )
        .await
        .unwrap();

        hub.drop_connections();
        wait_for_reconnect(&hub).await;

        // Subscription replayed: publishing after the drop still delivers.
        assert_eq!(hub.publish("hello", "Ann"), 1);
        assert_eq!(listener.recv().await.unwrap().payload, "Ann");

        let kinds = recorder.kinds();
        assert_eq!(kinds[0], EventKind::Connected);
        assert!(kinds.contains(&EventKind::Disconnected));
        assert!(kinds.contains(&EventKind::Reconnected));

        listener.close().await;
    }

    #[tokio::test]
    async fn test_reconnect_attempts_respect_minimum_interval() {
        let hub = MemoryHub::new();
        let recorder = Recorder::arc();
        let mut cfg = fast_config();
        cfg.min_reconnect = Duration::from_millis(40);
        cfg.max_reconnect = Duration::from_millis(40);

        let listener = Listener::start(
            hub.clone(),
            Subscription::channel("hello"),
            cfg,
            HookSet::new(vec![recorder.clone()]),
        )
        .await
        .unwrap();

        let started = Instant::now();
        hub.set_reachable(false);
        hub.drop_connections();

        // Let several attempts fail, then allow recovery.
        tokio::time::sleep(Duration::from_millis(150)).await;
        hub.set_reachable(true);
        wait_for_reconnect(&hub).await;
        let elapsed = started.elapsed();

        let attempts = recorder.count(EventKind::AttemptFailed) as u32;
        assert!(attempts >= 2, "expected several failed attempts");
        // n failures plus the immediate first attempt fit in the window only
        // if no two attempts ran closer than min_reconnect apart.
        assert!(
            elapsed >= Duration::from_millis(40) * (attempts - 1),
            "attempts ran too close together: {} in {:?}",
            attempts,
            elapsed
        );
        assert_eq!(recorder.count(EventKind::Reconnected), 1);

        listener.close().await;
    }

    #[tokio::test]
    async fn test_transient_errors_never_reach_the_consumer() {
        let hub = MemoryHub::new();
        let mut listener = Listener::start(
            hub.clone(),
            Subscription::channel("hello"),
            fast_config(),
            HookSet::empty(),
        )
        .await
        .unwrap();

        hub.drop_connections();
        wait_for_reconnect(&hub).await;
        hub.publish("hello", "after");

        // The only thing the consumer ever sees is the notification itself.
        assert_eq!(listener.recv().await.unwrap().payload, "after");

        listener.close().await;
    }

    #[tokio::test]
    async fn test_ping_succeeds_on_live_connection() {
        let hub = MemoryHub::new();
        let listener = Listener::start(
            hub.clone(),
            Subscription::channel("hello"),
            fast_config(),
            HookSet::empty(),
        )
        .await
        .unwrap();

        listener.ping().await.unwrap();
        assert_eq!(hub.ping_count(), 1);

        listener.close().await;
    }

    #[tokio::test]
    async fn test_ping_fails_while_reconnecting() {
        let hub = MemoryHub::new();
        let listener = Listener::start(
            hub.clone(),
            Subscription::channel("hello"),
            fast_config(),
            HookSet::empty(),
        )
        .await
        .unwrap();

        hub.set_reachable(false);
        hub.drop_connections();

        // First ping reports the dead connection, later ones fail while the
        // reconnect loop waits out its backoff.
        let handle = listener.handle();
        let mut saw_failure = false;
        for _ in 0..10 {
            if handle.ping().await.is_err() {
                saw_failure = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(saw_failure);

        listener.close().await;
    }

    #[tokio::test]
    async fn test_close_terminates_the_sequence() {
        let hub = MemoryHub::new();
        let recorder = Recorder::arc();
        let mut listener = Listener::start(
            hub.clone(),
            Subscription::channel("hello"),
            fast_config(),
            HookSet::new(vec![recorder.clone()]),
        )
        .await
        .unwrap();

        let handle = listener.handle();
        handle.close();
        assert!(handle.is_closed());

        assert_eq!(listener.recv().await, None);
        assert_eq!(recorder.count(EventKind::Closed), 1);
    }

    #[tokio::test]
    async fn test_close_stops_background_reconnection() {
        let hub = MemoryHub::new();
        let listener = Listener::start(
            hub.clone(),
            Subscription::channel("hello"),
            fast_config(),
            HookSet::empty(),
        )
        .await
        .unwrap();

        hub.set_reachable(false);
        hub.drop_connections();
        listener.close().await;

        hub.set_reachable(true);
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(hub.connection_count(), 0);
    }

    #[tokio::test]
    async fn test_dead_connection_is_released_before_the_backoff_window() {
        let hub = MemoryHub::new();
        let live = Arc::new(AtomicUsize::new(0));
        let transport = TrackedHub {
            hub: hub.clone(),
            live: live.clone(),
        };

        let mut cfg = fast_config();
        cfg.min_reconnect = Duration::from_millis(200);
        cfg.max_reconnect = Duration::from_millis(200);

        let listener = Listener::start(
            transport,
            Subscription::channel("hello"),
            cfg,
            HookSet::empty(),
        )
        .await
        .unwrap();
        assert_eq!(live.load(Ordering::SeqCst), 1);

        hub.set_reachable(false);
        hub.drop_connections();
        tokio::time::sleep(Duration::from_millis(50)).await;

        // Mid-backoff: the broken connection object must already be gone,
        // not parked until the replacement arrives.
        assert_eq!(live.load(Ordering::SeqCst), 0);

        hub.set_reachable(true);
        wait_for_reconnect(&hub).await;
        assert_eq!(live.load(Ordering::SeqCst), 1);

        listener.close().await;
        assert_eq!(live.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_close_interrupts_a_hung_ping() {
        let listener = Listener::start(
            StallStore,
            Subscription::channel("hello"),
            fast_config(),
            HookSet::empty(),
        )
        .await
        .unwrap();
        let handle = listener.handle();

        // Park a probe inside the transport, then close underneath it.
        let ping = tokio::spawn(async move { handle.ping().await });
        tokio::time::sleep(Duration::from_millis(20)).await;

        tokio::time::timeout(Duration::from_millis(500), listener.close())
            .await
            .expect("close blocked on the hung ping");

        assert!(matches!(ping.await.unwrap(), Err(ListenerError::Closed)));
    }
}
