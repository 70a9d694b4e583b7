//! Unique DOM-id generation.
//!
//! Widgets need ids that are unique within one application so that ARIA
//! relationships (`aria-controls`, `aria-labelledby`) can point at each other.
//! [`IdGenerator`] hands out `"{prefix}_{n}"` ids with an independent counter
//! per prefix. It is an owned service: create one per application (or per
//! test) and pass it to the widgets you build.

use std::collections::HashMap;

use parking_lot::Mutex;

/// Generates ids that are unique for the lifetime of the generator.
#[derive(Debug, Default)]
pub struct IdGenerator {
    counters: Mutex<HashMap<String, u64>>,
}

impl IdGenerator {
    /// The prefix used by [`IdGenerator::next_default`].
    pub const DEFAULT_PREFIX: &'static str = "uid";

    /// Create a generator with every counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate the next id for `prefix`. Counters start at 1.
    pub fn next(&self, prefix: &str) -> String {
        let mut counters = self.counters.lock();
        let counter = counters.entry(prefix.to_owned()).or_insert(0);
        *counter += 1;
        format!("{prefix}_{counter}")
    }

    /// Generate the next id with the default prefix.
    pub fn next_default(&self) -> String {
        self.next(Self::DEFAULT_PREFIX)
    }
}
