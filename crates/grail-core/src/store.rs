//! Observable value stores.
//!
//! A [`Store<T>`] pairs a value with a [`Signal`] that fires whenever the value
//! is replaced. It is the reactive backbone of Grail: selection changes, the
//! active item of a list, and the managed item list itself are all stores.
//!
//! Unlike a bare signal, a store always has a current value:
//!
//! - [`Store::get`] reads it at any time
//! - [`Store::subscribe`] calls the new subscriber with it immediately, then
//!   again on every change
//! - [`Store::connect`] only observes future changes
//!
//! # Example
//!
//! ```
//! use grail_core::Store;
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//!
//! let count = Store::new(0);
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let seen_clone = seen.clone();
//! count.subscribe(move |&n| seen_clone.lock().push(n));
//!
//! assert!(count.set(1));
//! assert!(!count.set(1)); // unchanged, no notification
//!
//! assert_eq!(*seen.lock(), vec![0, 1]);
//! ```

use std::fmt;

use parking_lot::RwLock;

use crate::signal::{ConnectionGuard, ConnectionId, Signal};

/// A value with change notification.
///
/// The value lock is released before subscribers are notified, so a
/// subscriber may read or write the store it is observing.
pub struct Store<T> {
    value: RwLock<T>,
    changed: Signal<T>,
}

impl<T: Clone + Send + Sync + 'static> Store<T> {
    /// Create a new store with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
            changed: Signal::new(),
        }
    }

    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Access the current value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }

    /// Replace the value and notify subscribers unconditionally.
    ///
    /// Use this for event-like values where every publication matters even
    /// if it compares equal to the previous one.
    pub fn publish(&self, value: T) {
        *self.value.write() = value.clone();
        self.changed.emit(value);
    }

    /// Replace the value without notifying subscribers.
    pub fn set_silent(&self, value: T) {
        *self.value.write() = value;
    }

    /// Subscribe to the value.
    ///
    /// The subscriber is called immediately with the current value and then
    /// after every change.
    pub fn subscribe<F>(&self, subscriber: F) -> ConnectionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let current = self.get();
        subscriber(&current);
        self.changed.connect(subscriber)
    }

    /// Observe future changes only.
    pub fn connect<F>(&self, subscriber: F) -> ConnectionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.changed.connect(subscriber)
    }

    /// Observe future changes until the returned guard is dropped.
    pub fn connect_scoped<F>(&self, subscriber: F) -> ConnectionGuard<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.changed.connect_scoped(subscriber)
    }

    /// Remove a subscriber.
    ///
    /// Returns `true` if the subscriber was connected.
    pub fn unsubscribe(&self, id: ConnectionId) -> bool {
        let removed = self.changed.disconnect(id);
        if !removed {
            crate::grail_trace!(?id, "unsubscribe of unknown store connection");
        }
        removed
    }

    /// The number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.changed.connection_count()
    }
}

impl<T: Clone + PartialEq + Send + Sync + 'static> Store<T> {
    /// Set the value, returning `true` if the value changed.
    ///
    /// Subscribers are only notified when the new value differs from the
    /// current one.
    pub fn set(&self, value: T) -> bool {
        self.replace(value).is_some()
    }

    /// Set the value, returning the old value if it changed.
    pub fn replace(&self, value: T) -> Option<T> {
        let old = {
            let mut current = self.value.write();
            if *current == value {
                return None;
            }
            std::mem::replace(&mut *current, value.clone())
        };
        self.changed.emit(value);
        Some(old)
    }

    /// Update the value through a closure, notifying if it changed.
    pub fn update<F>(&self, f: F) -> bool
    where
        F: FnOnce(&T) -> T,
    {
        let next = f(&self.value.read());
        self.set(next)
    }
}

impl<T: Clone + Default + Send + Sync + 'static> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("value", &*self.value.read())
            .field("changed", &self.changed)
            .finish()
    }
}

static_assertions::assert_impl_all!(Store<Vec<u32>>: Send, Sync);
