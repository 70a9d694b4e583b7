//! Debounced type-to-search buffer.
//!
//! Characters added to a [`Typeahead`] are collected until no new character
//! arrives for the debounce interval. The collected characters are then
//! emitted to subscribers as one token and the buffer starts over.
//!
//! The debounce runs on a shared [`TimerQueue`]; nothing is emitted until the
//! host calls [`TimerQueue::process_expired`] after the interval has passed.

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use grail_core::logging::targets;
use grail_core::{ConnectionId, Signal, TimerId, TimerQueue};
use parking_lot::Mutex;

/// The default debounce interval.
pub const DEFAULT_DEBOUNCE_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Default)]
struct TypeaheadState {
    pressed_letters: String,
    pending: Option<TimerId>,
}

struct TypeaheadInner {
    timers: Arc<TimerQueue>,
    debounce_interval: Duration,
    state: Mutex<TypeaheadState>,
    emitted: Signal<String>,
}

impl TypeaheadInner {
    fn cancel_pending(&self, state: &mut TypeaheadState) {
        if let Some(id) = state.pending.take() {
            // The timer may have fired already.
            let _ = self.timers.stop(id);
        }
    }

    fn flush(&self) {
        let token = {
            let mut state = self.state.lock();
            state.pending = None;
            std::mem::take(&mut state.pressed_letters)
        };
        if token.is_empty() {
            return;
        }
        tracing::trace!(target: targets::KEY_MANAGER, %token, "typeahead token");
        self.emitted.emit(token);
    }
}

/// A debounced buffer of typed characters.
pub struct Typeahead {
    inner: Arc<TypeaheadInner>,
}

impl Typeahead {
    /// Create a buffer with the default 200ms debounce interval.
    pub fn new(timers: Arc<TimerQueue>) -> Self {
        Self::with_debounce_interval(timers, DEFAULT_DEBOUNCE_INTERVAL)
    }

    /// Create a buffer with a custom debounce interval.
    pub fn with_debounce_interval(timers: Arc<TimerQueue>, debounce_interval: Duration) -> Self {
        Self {
            inner: Arc::new(TypeaheadInner {
                timers,
                debounce_interval,
                state: Mutex::new(TypeaheadState::default()),
                emitted: Signal::new(),
            }),
        }
    }

    /// The debounce interval.
    pub fn debounce_interval(&self) -> Duration {
        self.inner.debounce_interval
    }

    /// Append a character and restart the debounce timer.
    pub fn add(&self, letter: char) {
        let inner = &self.inner;
        let mut state = inner.state.lock();
        state.pressed_letters.push(letter);
        inner.cancel_pending(&mut state);

        let weak: Weak<TypeaheadInner> = Arc::downgrade(inner);
        let id = inner.timers.start_one_shot(inner.debounce_interval, move || {
            if let Some(inner) = weak.upgrade() {
                inner.flush();
            }
        });
        state.pending = Some(id);
    }

    /// Clear the buffer and cancel the pending emission without firing it.
    pub fn reset(&self) {
        let mut state = self.inner.state.lock();
        state.pressed_letters.clear();
        self.inner.cancel_pending(&mut state);
    }

    /// The characters buffered so far.
    pub fn pending_letters(&self) -> String {
        self.inner.state.lock().pressed_letters.clone()
    }

    /// Returns true if an emission is scheduled.
    pub fn is_pending(&self) -> bool {
        self.inner.state.lock().pending.is_some()
    }

    /// Subscribe to emitted tokens.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&String) + Send + Sync + 'static,
    {
        self.inner.emitted.connect(slot)
    }

    /// Remove a token subscriber.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.inner.emitted.disconnect(id)
    }

    /// Cancel any pending emission and drop every subscriber.
    pub fn destroy(&self) {
        self.reset();
        self.inner.emitted.disconnect_all();
    }
}

impl Drop for Typeahead {
    fn drop(&mut self) {
        let mut state = self.inner.state.lock();
        self.inner.cancel_pending(&mut state);
    }
}

impl fmt::Debug for Typeahead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Typeahead")
            .field("pressed_letters", &state.pressed_letters)
            .field("pending", &state.pending.is_some())
            .field("debounce_interval", &self.inner.debounce_interval)
            .finish()
    }
}

static_assertions::assert_impl_all!(Typeahead: Send, Sync);
