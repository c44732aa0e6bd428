//! # Handler abstraction for delivered notifications.
//!
//! The watchdog loop hands every notification to a [`Dispatch`]
//! implementation. Handling is assumed cheap (logging-scale); a handler that
//! does real work should offload it to its own task rather than hold up the
//! loop.
//!
//! A handler failure is local: the watchdog reports it through hooks and
//! moves on to the next notification.

use std::sync::Arc;

use crate::error::DispatchError;
use crate::transport::Notification;

/// Shared handle to a notification handler.
pub type DispatchRef = Arc<dyn Dispatch>;

/// # Per-notification application logic.
///
/// # Example
/// ```
/// use relisten::{Dispatch, DispatchError, Notification};
///
/// struct Audit;
///
/// impl Dispatch for Audit {
///     fn name(&self) -> &str { "audit" }
///
///     fn dispatch(&self, note: &Notification) -> Result<(), DispatchError> {
///         if note.payload.len() > 1024 {
///             return Err(DispatchError::new("payload too large"));
///         }
///         // record it...
///         Ok(())
///     }
/// }
/// ```
pub trait Dispatch: Send + Sync + 'static {
    /// Returns a stable, human-readable handler name.
    fn name(&self) -> &str;

    /// Handles one notification.
    ///
    /// Errors are reported through lifecycle hooks and never stop the
    /// watchdog loop.
    fn dispatch(&self, note: &Notification) -> Result<(), DispatchError>;
}
