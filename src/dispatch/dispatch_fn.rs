//! # Function-backed handler (`DispatchFn`)
//!
//! [`DispatchFn`] wraps a closure `F: Fn(&Notification) -> Result<(), DispatchError>`.
//! Handy in tests and small harnesses where a full trait impl is noise.
//!
//! ## Example
//! ```rust
//! use relisten::{DispatchError, DispatchFn, DispatchRef, Notification};
//!
//! let h: DispatchRef = DispatchFn::arc("printer", |note: &Notification| {
//!     println!("{}: {}", note.channel, note.payload);
//!     Ok(())
//! });
//!
//! assert_eq!(h.name(), "printer");
//! ```

use std::borrow::Cow;
use std::sync::Arc;

use crate::dispatch::handler::Dispatch;
use crate::error::DispatchError;
use crate::transport::Notification;

/// Function-backed handler implementation.
pub struct DispatchFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> DispatchFn<F> {
    /// Creates a new function-backed handler.
    ///
    /// Prefer [`DispatchFn::arc`] when you immediately need a
    /// [`DispatchRef`](crate::DispatchRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the handler and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F> Dispatch for DispatchFn<F>
where
    F: Fn(&Notification) -> Result<(), DispatchError> + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn dispatch(&self, note: &Notification) -> Result<(), DispatchError> {
        (self.f)(note)
    }
}
