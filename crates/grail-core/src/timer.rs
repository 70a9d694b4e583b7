//! Timer system for Grail.
//!
//! Provides one-shot timers that re-enter the host's event loop. The host owns
//! a [`TimerQueue`] and calls [`TimerQueue::process_expired`] whenever it wakes
//! up (using [`TimerQueue::time_until_next`] to decide how long to sleep).
//! Cancellation is done by stopping the timer before it fires.
//!
//! Time is read from an injected [`Clock`], so tests can drive timers with a
//! [`ManualClock`] instead of sleeping.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::error::{Result, TimerError};
use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a timer.
    pub struct TimerId;
}

/// A source of monotonic time.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> Instant;
}

/// The real monotonic clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    elapsed: Mutex<Duration>,
}

impl ManualClock {
    /// Create a manual clock starting at the current instant.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        *self.elapsed.lock() += by;
    }

    /// Time elapsed since the clock was created.
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + *self.elapsed.lock()
    }
}

type TimerCallback = Box<dyn FnOnce() + Send>;

/// Internal timer data.
struct TimerData {
    /// When this timer should fire.
    fire_time: Instant,
    /// The callback, taken when the timer fires.
    callback: TimerCallback,
}

/// An entry in the timer queue (min-heap by fire time).
#[derive(Debug, Clone, Copy)]
struct TimerQueueEntry {
    id: TimerId,
    fire_time: Instant,
    /// Insertion order, so timers due at the same instant fire FIFO.
    sequence: u64,
}

impl PartialEq for TimerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TimerQueueEntry {}

impl PartialOrd for TimerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other
            .fire_time
            .cmp(&self.fire_time)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

#[derive(Default)]
struct TimerState {
    /// All pending timers.
    timers: SlotMap<TimerId, TimerData>,
    /// Priority queue of pending timer fires.
    queue: BinaryHeap<TimerQueueEntry>,
    next_sequence: u64,
}

/// Manages pending one-shot timers.
///
/// Cloning the `Arc` around a queue is the intended way to share it between
/// the host loop and the components that schedule work on it.
pub struct TimerQueue {
    clock: Arc<dyn Clock>,
    state: Mutex<TimerState>,
}

impl TimerQueue {
    /// Create a timer queue driven by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a timer queue driven by the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: Mutex::new(TimerState::default()),
        }
    }

    /// The clock this queue reads time from.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Start a one-shot timer that runs `callback` after `duration`.
    ///
    /// Returns the timer ID that can be used to cancel the timer.
    pub fn start_one_shot<F>(&self, duration: Duration, callback: F) -> TimerId
    where
        F: FnOnce() + Send + 'static,
    {
        let fire_time = self.clock.now() + duration;
        let mut state = self.state.lock();

        let id = state.timers.insert(TimerData {
            fire_time,
            callback: Box::new(callback),
        });
        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.queue.push(TimerQueueEntry {
            id,
            fire_time,
            sequence,
        });

        tracing::trace!(target: targets::TIMER, ?id, ?duration, "timer started");
        id
    }

    /// Stop and remove a timer before it fires.
    ///
    /// Returns an error if the timer has already fired or was never started.
    pub fn stop(&self, id: TimerId) -> Result<()> {
        if self.state.lock().timers.remove(id).is_some() {
            tracing::trace!(target: targets::TIMER, ?id, "timer stopped");
            Ok(())
        } else {
            Err(TimerError::InvalidTimerId.into())
        }
    }

    /// Check if a timer is still pending.
    pub fn is_active(&self, id: TimerId) -> bool {
        self.state.lock().timers.contains_key(id)
    }

    /// Get the duration until the next timer fires, if any.
    ///
    /// Returns `None` if there are no pending timers.
    pub fn time_until_next(&self) -> Option<Duration> {
        let mut state = self.state.lock();

        // Drop stopped timers from the front of the queue.
        while let Some(entry) = state.queue.peek() {
            if state.timers.contains_key(entry.id) {
                break;
            }
            state.queue.pop();
        }

        let now = self.clock.now();
        state
            .queue
            .peek()
            .map(|entry| entry.fire_time.saturating_duration_since(now))
    }

    /// Run the callbacks of every timer that is due.
    ///
    /// Callbacks run after the queue lock is released, in fire-time order, so
    /// they may start or stop timers. Timers started by a callback are not
    /// run in the same pass. Returns the number of callbacks run.
    #[tracing::instrument(skip(self), target = "grail_core::timer", level = "trace")]
    pub fn process_expired(&self) -> usize {
        let now = self.clock.now();
        let mut due = Vec::new();

        {
            let mut state = self.state.lock();
            while let Some(entry) = state.queue.peek() {
                if entry.fire_time > now {
                    break;
                }
                let Some(entry) = state.queue.pop() else {
                    break;
                };
                // Stopped timers leave stale queue entries behind.
                if let Some(timer) = state.timers.remove(entry.id) {
                    tracing::trace!(target: targets::TIMER, id = ?entry.id, "timer fired");
                    due.push(timer.callback);
                }
            }
        }

        let count = due.len();
        for callback in due {
            callback();
        }
        count
    }

    /// Get the number of pending timers.
    pub fn active_count(&self) -> usize {
        self.state.lock().timers.len()
    }
}

impl Default for TimerQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TimerQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerQueue")
            .field("active_count", &self.active_count())
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(TimerQueue: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    fn manual_queue() -> (Arc<ManualClock>, TimerQueue) {
        let clock = Arc::new(ManualClock::new());
        let queue = TimerQueue::with_clock(clock.clone());
        (clock, queue)
    }

    #[test]
    fn test_one_shot_fires_after_duration() {
        let (clock, queue) = manual_queue();
        let fired = Arc::new(Mutex::new(0));

        let fired_clone = fired.clone();
        let id = queue.start_one_shot(Duration::from_millis(200), move || {
            *fired_clone.lock() += 1;
        });

        clock.advance(Duration::from_millis(199));
        assert_eq!(queue.process_expired(), 0);
        assert!(queue.is_active(id));

        clock.advance(Duration::from_millis(1));
        assert_eq!(queue.process_expired(), 1);
        assert_eq!(*fired.lock(), 1);
        assert!(!queue.is_active(id));

        // One-shot timers never fire twice.
        clock.advance(Duration::from_secs(1));
        assert_eq!(queue.process_expired(), 0);
    }

    #[test]
    fn test_stop_cancels_timer() {
        let (clock, queue) = manual_queue();
        let fired = Arc::new(Mutex::new(false));

        let fired_clone = fired.clone();
        let id = queue.start_one_shot(Duration::from_millis(10), move || {
            *fired_clone.lock() = true;
        });

        assert!(queue.stop(id).is_ok());
        assert!(queue.stop(id).is_err());

        clock.advance(Duration::from_millis(20));
        assert_eq!(queue.process_expired(), 0);
        assert!(!*fired.lock());
        assert_eq!(queue.active_count(), 0);
    }

    #[test]
    fn test_fire_order() {
        let (clock, queue) = manual_queue();
        let order = Arc::new(Mutex::new(Vec::new()));

        for (delay, label) in [(30, "c"), (10, "a"), (20, "b"), (10, "a2")] {
            let order = order.clone();
            queue.start_one_shot(Duration::from_millis(delay), move || {
                order.lock().push(label);
            });
        }

        clock.advance(Duration::from_millis(30));
        assert_eq!(queue.process_expired(), 4);
        assert_eq!(*order.lock(), vec!["a", "a2", "b", "c"]);
    }

    #[test]
    fn test_time_until_next_skips_stopped() {
        let (clock, queue) = manual_queue();
        assert_eq!(queue.time_until_next(), None);

        let first = queue.start_one_shot(Duration::from_millis(10), || {});
        queue.start_one_shot(Duration::from_millis(50), || {});
        queue.stop(first).unwrap();

        clock.advance(Duration::from_millis(20));
        assert_eq!(queue.time_until_next(), Some(Duration::from_millis(30)));
    }

    #[test]
    fn test_callback_can_schedule_more_work() {
        let (clock, queue) = manual_queue();
        let queue = Arc::new(queue);
        let fired = Arc::new(Mutex::new(Vec::new()));

        let queue_clone = queue.clone();
        let fired_clone = fired.clone();
        queue.start_one_shot(Duration::from_millis(5), move || {
            fired_clone.lock().push("outer");
            let fired_inner = fired_clone.clone();
            queue_clone.start_one_shot(Duration::ZERO, move || {
                fired_inner.lock().push("inner");
            });
        });

        clock.advance(Duration::from_millis(5));
        assert_eq!(queue.process_expired(), 1);
        assert_eq!(queue.process_expired(), 1);
        assert_eq!(*fired.lock(), vec!["outer", "inner"]);
    }
}
