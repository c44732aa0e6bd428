//! # Hook fan-out set.
//!
//! [`HookSet`] owns the registered hooks and delivers every lifecycle event
//! to each of them, in registration order, on the emitting task.
//!
//! A panicking hook is isolated with `catch_unwind`: the panic is reported to
//! stderr and the remaining hooks still run, so observability failures never
//! stall the reconnect loop.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::events::LifecycleEvent;
use crate::hooks::Hook;

/// Ordered fan-out over registered [`Hook`]s.
///
/// Cheap to clone; the hook list is shared behind an `Arc` and immutable
/// after construction.
#[derive(Clone)]
pub struct HookSet {
    hooks: Arc<[Arc<dyn Hook>]>,
}

impl Default for HookSet {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl HookSet {
    /// Creates a set from the given hooks. Order is preserved.
    pub fn new(hooks: Vec<Arc<dyn Hook>>) -> Self {
        Self {
            hooks: hooks.into(),
        }
    }

    /// Creates an empty set (events are dropped).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns `true` if no hooks are registered.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Delivers one event to every hook, catching per-hook panics.
    pub fn emit(&self, event: &LifecycleEvent) {
        for hook in self.hooks.iter() {
            let res = catch_unwind(AssertUnwindSafe(|| hook.on_event(event)));
            if res.is_err() {
                eprintln!(
                    "[hook-panic] hook={} event={}",
                    hook.name(),
                    event.kind.as_label()
                );
            }
        }
    }
}

impl From<Vec<Arc<dyn Hook>>> for HookSet {
    fn from(hooks: Vec<Arc<dyn Hook>>) -> Self {
        Self::new(hooks)
    }
}
