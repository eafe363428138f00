//! Subscriber list
//!
//! Observers register a callback and receive a reference to the new state
//! once per committed transition. Callbacks live in a slot map, so the
//! handle returned by [`Subscribers::subscribe`] stays valid (and is never
//! reissued) after other subscribers leave.
//!
//! # Example
//!
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use listable_core::store::Subscribers;
//!
//! let mut subscribers = Subscribers::<u32>::new();
//! let seen = Arc::new(AtomicUsize::new(0));
//! let seen_clone = seen.clone();
//!
//! let id = subscribers.subscribe(move |value| {
//!     seen_clone.store(*value as usize, Ordering::SeqCst);
//! });
//!
//! subscribers.notify(&7);
//! assert_eq!(seen.load(Ordering::SeqCst), 7);
//!
//! assert!(subscribers.unsubscribe(id));
//! ```

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle identifying a subscription
    pub struct SubscriptionId;
}

type Callback<S> = Box<dyn Fn(&S) + Send + Sync>;

/// Callbacks notified with a state value
pub struct Subscribers<S> {
    callbacks: SlotMap<SubscriptionId, Callback<S>>,
}

impl<S> Default for Subscribers<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> std::fmt::Debug for Subscribers<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.callbacks.len())
            .finish()
    }
}

impl<S> Subscribers<S> {
    pub fn new() -> Self {
        Self {
            callbacks: SlotMap::with_key(),
        }
    }

    /// Register a callback
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        self.callbacks.insert(Box::new(callback))
    }

    /// Remove a callback; returns whether it was registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.callbacks.remove(id).is_some()
    }

    /// Invoke every callback with `state`
    pub fn notify(&self, state: &S) {
        for callback in self.callbacks.values() {
            callback(state);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}
