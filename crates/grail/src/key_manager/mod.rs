//! Keyboard navigation for lists of items.
//!
//! [`ListKeyManager`] tracks which item of a list is active and moves it in
//! response to arrow keys, Home/End and typed characters. [`Typeahead`] is
//! the debounced buffer behind the type-to-search behavior.

mod list_key_manager;
mod typeahead;

pub use list_key_manager::{
    ActivateCallback, ActiveItem, Direction, LabelResolver, ListKeyManager, ListKeyManagerConfig,
    SkipPredicate, TabOutCallback,
};
pub use typeahead::{DEFAULT_DEBOUNCE_INTERVAL, Typeahead};
