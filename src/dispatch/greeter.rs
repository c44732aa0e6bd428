//! # Reference handler: greet whoever the payload names.
//!
//! [`Greeter`] derives a display name from the notification payload,
//! substituting a fallback (default `"world"`) when the payload is empty,
//! and prints a human-readable greeting line.

use std::borrow::Cow;

use crate::dispatch::handler::Dispatch;
use crate::error::DispatchError;
use crate::transport::Notification;

/// Greeting handler with fallback naming.
pub struct Greeter {
    fallback: Cow<'static, str>,
}

impl Default for Greeter {
    /// Greets `"world"` when the payload is empty.
    fn default() -> Self {
        Self {
            fallback: Cow::Borrowed("world"),
        }
    }
}

impl Greeter {
    /// Creates a greeter with a custom fallback name.
    pub fn with_fallback(fallback: impl Into<Cow<'static, str>>) -> Self {
        Self {
            fallback: fallback.into(),
        }
    }

    /// Builds the greeting line for one notification.
    pub fn greeting(&self, note: &Notification) -> String {
        let name = if note.payload.is_empty() {
            self.fallback.as_ref()
        } else {
            note.payload.as_str()
        };
        format!("Hello, {name}!")
    }
}

impl Dispatch for Greeter {
    fn name(&self) -> &str {
        "greeter"
    }

    fn dispatch(&self, note: &Notification) -> Result<(), DispatchError> {
        println!("{}", self.greeting(note));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_payload_is_greeted() {
        let greeter = Greeter::default();
        let note = Notification::new("hello", "Ann");
        assert_eq!(greeter.greeting(&note), "Hello, Ann!");
    }

    #[test]
    fn test_empty_payload_falls_back_to_world() {
        let greeter = Greeter::default();
        let note = Notification::new("hello", "");
        assert_eq!(greeter.greeting(&note), "Hello, world!");
    }

    #[test]
    fn test_custom_fallback() {
        let greeter = Greeter::with_fallback("nobody");
        let note = Notification::new("hello", "");
        assert_eq!(greeter.greeting(&note), "Hello, nobody!");
    }

    #[test]
    fn test_dispatch_never_fails() {
        let greeter = Greeter::default();
        assert!(greeter.dispatch(&Notification::new("hello", "Ann")).is_ok());
    }
}
