//! # relisten
//!
//! **relisten** is a resilient notification-listening client for
//! pub/sub-capable stores.
//!
//! It keeps one long-lived subscription to a set of named channels alive
//! across transient connectivity loss: the listener owns the connection,
//! reconnects with bounded backoff, replays the listen commands after every
//! reconnect, and pairs the event stream with an idle watchdog that actively
//! probes silent connections instead of trusting them.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!            ┌──────────────────┐
//!            │ Transport (trait)│  connect() → Connection
//!            │  store-specific  │  listen / recv / ping
//!            └────────┬─────────┘
//!                     ▼
//! ┌───────────────────────────────────────────────────────────┐
//! │  Listener (connection task)                               │
//! │  - owns the one live connection, exclusively              │
//! │  - reconnect loop with BackoffPolicy (min..max, jitter)   │
//! │  - replays Subscription listen commands on reconnect      │
//! │  - emits LifecycleEvents through HookSet (synchronous)    │
//! └───────┬──────────────────────────────────────┬────────────┘
//!         │ notifications (unbounded SPSC)       │ commands (ping)
//!         ▼                                      │
//! ┌───────────────────────────────┐              │
//! │  Watchdog (dispatch loop)     │──────────────┘
//! │  - select! { recv, idle }     │   fire-and-forget ping on idle
//! │  - Dispatch handler per note  │
//! │  - IdleProbe diagnostics      │
//! └───────────────────────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! Listener::start ──► initial connect + listen   (fatal on failure)
//!                      │
//!                      ▼
//!            ┌── Connected ──► pump: forward notifications, answer pings
//!            │                   │ transport error
//!            │                   ▼
//!            │               Disconnected ──► reconnect loop:
//!            │                                 attempt now, then backoff
//!            │                                 (AttemptFailed per failure)
//!            └── Reconnected ◄────────────────── success, listens replayed
//!
//! close() / ListenerHandle::close() ──► Closed, sequence terminates,
//!                                        watchdog exits cleanly
//! ```
//!
//! ## Error policy
//! Only [`Listener::start`] returns a fatal error ([`ListenerError::Start`]).
//! Every transport failure after a successful start is recovered internally
//! and observable solely as lifecycle events; the notification consumer never
//! sees an error, only notifications.
//!
//! ## Features
//! | Area           | Description                                              | Key types / traits              |
//! |----------------|----------------------------------------------------------|---------------------------------|
//! | **Transport**  | Pluggable store integration (connect/listen/recv/ping).  | [`Transport`], [`Connection`]   |
//! | **Listening**  | Reconnecting subscription with ordered delivery.         | [`Listener`], [`ListenerHandle`]|
//! | **Watchdog**   | Dispatch loop with idle liveness probes.                 | [`Watchdog`], [`Dispatch`]      |
//! | **Policies**   | Reconnect delay bounds and jitter.                       | [`BackoffPolicy`], [`JitterPolicy`] |
//! | **Hooks**      | Observe connection-state transitions.                    | [`Hook`], [`HookSet`]           |
//! | **Errors**     | Fatal-vs-transient taxonomy.                             | [`ListenerError`], [`TransportError`] |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogHook`] _(demo/reference only)_.
//! - `memory`: exports the in-process [`MemoryHub`] transport for demos and
//!   fault-injection tests.
//!
//! ## Example
//! ```no_run
//! use std::time::Duration;
//! use async_trait::async_trait;
//! use relisten::{
//!     Config, Connection, Greeter, HookSet, Listener, Notification,
//!     Subscription, Transport, TransportError, Watchdog,
//! };
//!
//! // A stand-in for a real store integration.
//! struct MyStore;
//! struct MyConn;
//!
//! #[async_trait]
//! impl Transport for MyStore {
//!     type Conn = MyConn;
//!     async fn connect(&self) -> Result<MyConn, TransportError> {
//!         Ok(MyConn)
//!     }
//! }
//!
//! #[async_trait]
//! impl Connection for MyConn {
//!     async fn listen(&mut self, _channel: &str) -> Result<(), TransportError> {
//!         Ok(())
//!     }
//!     async fn recv(&mut self) -> Result<Notification, TransportError> {
//!         std::future::pending().await
//!     }
//!     async fn ping(&mut self) -> Result<(), TransportError> {
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let listener = Listener::start(
//!         MyStore,
//!         Subscription::channel("hello"),
//!         Config::default(),
//!         HookSet::empty(),
//!     )
//!     .await?; // fatal only here
//!
//!     let handle = listener.handle();
//!     let watchdog = Watchdog::new(Greeter::default(), HookSet::empty())
//!         .with_idle_timeout(Duration::from_secs(90));
//!     let loop_task = tokio::spawn(watchdog.run(listener));
//!
//!     relisten::wait_for_shutdown_signal().await?;
//!     handle.close();
//!     loop_task.await?;
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod dispatch;
mod error;
mod events;
mod hooks;
mod policies;
mod subscription;
mod transport;

// ---- Public re-exports ----

pub use config::Config;
pub use core::{wait_for_shutdown_signal, Listener, ListenerHandle, Watchdog};
pub use dispatch::{Dispatch, DispatchFn, DispatchRef, Greeter};
pub use error::{DispatchError, ListenerError, TransportError};
pub use events::{EventKind, LifecycleEvent};
pub use hooks::{Hook, HookSet};
pub use policies::{BackoffPolicy, JitterPolicy};
pub use subscription::Subscription;
pub use transport::{Connection, Notification, Transport};

// Optional: expose the in-process broker transport.
// Enable with: `--features memory`
#[cfg(feature = "memory")]
pub use transport::{MemoryConnection, MemoryHub};

// Optional: expose a simple built-in logging hook (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use hooks::LogHook;
