//! Logging facilities for Grail.
//!
//! Grail uses the `tracing` crate for instrumentation. To see logs, install a
//! tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("grail=trace,grail_core=debug")
//!         .init();
//!
//!     // Your application code...
//! }
//! ```
//!
//! Every event is emitted under one of the [`targets`], so a subsystem can be
//! enabled on its own.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "grail_core";
    /// Timer system target.
    pub const TIMER: &str = "grail_core::timer";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "grail_core::signal";
    /// Keyboard navigation target.
    pub const KEY_MANAGER: &str = "grail::key_manager";
    /// Selection model target.
    pub const SELECTION: &str = "grail::selection";
    /// Widget behavior target.
    pub const WIDGETS: &str = "grail::widgets";
    /// Performance span target.
    pub const PERF: &str = "grail::perf";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Useful for timing an operation such as a full keyboard dispatch.
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::debug_span!(target: targets::PERF, "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}

/// Trace-level event under the core target.
#[macro_export]
macro_rules! grail_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: $crate::logging::targets::CORE, $($arg)*)
    };
}
