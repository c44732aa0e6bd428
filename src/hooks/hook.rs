//! # Core hook trait
//!
//! `Hook` is the extension point for observing connection-state transitions.
//! Implementations are invoked synchronously by the connection task and the
//! watchdog, in emission order.
//!
//! ## Contract
//! - Implementations must be cheap (logging-scale). A blocking hook delays
//!   reconnection, because it runs on the connection task itself.
//! - Hooks must not assume any particular kind arrives first; a listener that
//!   never loses its connection only ever emits `Connected` and `Closed`.
//!
//! ## Example
//! ```rust
//! use relisten::{EventKind, Hook, LifecycleEvent};
//!
//! struct FailureCounter(std::sync::atomic::AtomicU64);
//!
//! impl Hook for FailureCounter {
//!     fn on_event(&self, event: &LifecycleEvent) {
//!         if event.kind == EventKind::AttemptFailed {
//!             self.0.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "failure-counter" }
//! }
//! ```

use crate::events::LifecycleEvent;

/// Contract for lifecycle observers.
///
/// Called synchronously from the connection task or the watchdog loop.
/// Implementations should return quickly and never block.
pub trait Hook: Send + Sync + 'static {
    /// Handle a single lifecycle event.
    ///
    /// # Parameters
    /// - `event`: Reference to the event (does not transfer ownership)
    fn on_event(&self, event: &LifecycleEvent);

    /// Human-readable name (for diagnostics when a hook panics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
