//! # Notification handlers.
//!
//! This module provides the handler-side types consumed by the watchdog loop:
//! - [`Dispatch`] - trait for handling one delivered notification
//! - [`DispatchFn`] - closure-backed handler implementation
//! - [`DispatchRef`] - shared handler handle (`Arc<dyn Dispatch>`)
//! - [`Greeter`] - the reference handler (greeting with fallback naming)

mod dispatch_fn;
mod greeter;
mod handler;

pub use dispatch_fn::DispatchFn;
pub use greeter::Greeter;
pub use handler::{Dispatch, DispatchRef};
