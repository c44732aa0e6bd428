//! # Listener configuration.
//!
//! Provides [`Config`], the centralized settings for one listener.
//!
//! Config is used in two ways:
//! 1. **Listener creation**: `Listener::start(transport, subscription, config, hooks)`
//! 2. **Watchdog wiring**: pass `idle_timeout` via `Watchdog::with_idle_timeout`
//!
//! ## Field semantics
//! - `min_reconnect`: shortest interval between reconnect attempts
//! - `max_reconnect`: cap the backoff grows toward
//! - `idle_timeout`: silence window after which the watchdog probes liveness
//! - `backoff_factor` / `jitter`: shape of the delay curve between the bounds

use std::time::Duration;

use crate::policies::{BackoffPolicy, JitterPolicy};

/// Configuration for a listener and its watchdog.
///
/// Defines:
/// - **Reconnect bounds**: min/max interval for the backoff schedule
/// - **Idle watchdog**: how long a silent connection is trusted before probing
/// - **Delay curve**: growth factor and jitter between the bounds
///
/// All fields are public; the struct is plain data, immutable by convention
/// once the listener has started.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Minimum interval between reconnect attempts.
    ///
    /// The first failed attempt schedules a retry after exactly this long;
    /// no two attempts are ever issued closer together.
    pub min_reconnect: Duration,

    /// Maximum interval between reconnect attempts.
    ///
    /// The backoff delay grows from `min_reconnect` toward this cap and then
    /// stays there for as long as the store remains unreachable.
    pub max_reconnect: Duration,

    /// Idle window after which the watchdog fires a liveness probe.
    ///
    /// When no notification arrives for this long, the watchdog emits one
    /// diagnostic lifecycle event and pings the connection out-of-band, in
    /// case the transport has not yet noticed a silent failure.
    pub idle_timeout: Duration,

    /// Multiplicative growth factor for the backoff delay.
    pub backoff_factor: f64,

    /// Randomization applied to each backoff delay.
    pub jitter: JitterPolicy,
}

impl Config {
    /// Builds the backoff schedule used by the reconnect loop.
    #[inline]
    pub fn backoff(&self) -> BackoffPolicy {
        BackoffPolicy {
            first: self.min_reconnect,
            max: self.max_reconnect,
            factor: self.backoff_factor,
            jitter: self.jitter,
        }
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `min_reconnect = 10s`
    /// - `max_reconnect = 60s`
    /// - `idle_timeout = 90s`
    /// - `backoff_factor = 2.0` (doubling)
    /// - `jitter = JitterPolicy::None`
    fn default() -> Self {
        Self {
            min_reconnect: Duration::from_secs(10),
            max_reconnect: Duration::from_secs(60),
            idle_timeout: Duration::from_secs(90),
            backoff_factor: 2.0,
            jitter: JitterPolicy::None,
        }
    }
}
