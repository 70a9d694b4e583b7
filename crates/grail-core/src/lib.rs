//! Core systems for Grail.
//!
//! This crate provides the foundational pieces the Grail widget behaviors are
//! built from:
//!
//! - **Signal/Slot System**: Synchronous, ordered change notification
//! - **Stores**: Observable values with a current-value accessor
//! - **Timers**: Cancellable one-shot timers driven by the host loop
//! - **Ids**: Per-application unique DOM id generation
//!
//! # Signal/Slot Example
//!
//! ```
//! use grail_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//!
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Timer Example
//!
//! ```
//! use grail_core::{ManualClock, TimerQueue};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let clock = Arc::new(ManualClock::new());
//! let timers = TimerQueue::with_clock(clock.clone());
//!
//! timers.start_one_shot(Duration::from_millis(200), || println!("fired"));
//!
//! clock.advance(Duration::from_millis(200));
//! assert_eq!(timers.process_expired(), 1);
//! ```

mod error;
pub mod id;
pub mod logging;
pub mod signal;
pub mod store;
pub mod timer;

pub use error::{CoreError, Result, TimerError};
pub use id::IdGenerator;
pub use logging::PerfSpan;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use store::Store;
pub use timer::{Clock, ManualClock, SystemClock, TimerId, TimerQueue};
