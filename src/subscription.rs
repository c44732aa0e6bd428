//! # Channel subscription set.
//!
//! A [`Subscription`] names the channels a listener wants notifications on.
//! It is built once at startup and stays immutable for the lifetime of the
//! listener: the reconnect loop replays the same listen commands after every
//! successful reconnect, since the store discards connection-scoped
//! subscriptions when a connection drops.
//!
//! ## Example
//! ```rust
//! use relisten::Subscription;
//!
//! let sub = Subscription::channels(["hello", "jobs", "hello"]);
//! assert_eq!(sub.len(), 2); // duplicates collapse, order preserved
//! assert!(sub.contains("jobs"));
//! ```

use std::sync::Arc;

/// Immutable, deduplicated set of channel names.
///
/// Channel names are stored as `Arc<str>` so the connection task and
/// lifecycle events can share them without copying.
#[derive(Clone, Debug)]
pub struct Subscription {
    channels: Vec<Arc<str>>,
}

impl Subscription {
    /// Creates a subscription for a single channel.
    pub fn channel(name: impl Into<Arc<str>>) -> Self {
        Self {
            channels: vec![name.into()],
        }
    }

    /// Creates a subscription for several channels.
    ///
    /// Duplicates are dropped; first-seen order is preserved so listen
    /// commands are replayed deterministically on reconnect.
    pub fn channels<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        let mut channels: Vec<Arc<str>> = Vec::new();
        for name in names {
            let name = name.into();
            if !channels.iter().any(|c| **c == *name) {
                channels.push(name);
            }
        }
        Self { channels }
    }

    /// Returns the channel names in listen order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<str>> {
        self.channels.iter()
    }

    /// Returns `true` if `name` is part of this subscription.
    pub fn contains(&self, name: &str) -> bool {
        self.channels.iter().any(|c| **c == *name)
    }

    /// Number of distinct channels.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Returns `true` if no channels were requested.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_channel() {
        let sub = Subscription::channel("hello");
        assert_eq!(sub.len(), 1);
        assert!(sub.contains("hello"));
        assert!(!sub.contains("other"));
    }

    #[test]
    fn test_duplicates_collapse_in_order() {
        let sub = Subscription::channels(["a", "b", "a", "c", "b"]);
        let names: Vec<&str> = sub.iter().map(|c| c.as_ref()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_subscription() {
        let sub = Subscription::channels(Vec::<&str>::new());
        assert!(sub.is_empty());
        assert_eq!(sub.len(), 0);
    }
}
