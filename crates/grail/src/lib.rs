//! Grail - headless keyboard navigation and selection for composite widgets.
//!
//! Grail computes the state of accordions, tabs, toggle groups, menus,
//! pagination, number inputs and progress bars without rendering anything.
//! The host owns a [`Document`] of elements, forwards keyboard and pointer
//! events to a behavior, and renders the typed attribute records the
//! behavior returns.
//!
//! The building blocks are usable on their own:
//!
//! - [`SelectionModel`]: single or multiple selection with change records
//! - [`ListKeyManager`]: active-item tracking with arrow keys, Home/End,
//!   wrapping, skipping and typeahead
//! - [`Typeahead`]: the debounced type-to-search buffer
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use grail::{Accordion, AccordionConfig, Document, ElementKind, IdGenerator};
//!
//! let document = Arc::new(Document::new());
//! let root = document.create_element(ElementKind::Generic, None);
//! let item = document.create_element(ElementKind::AccordionItem, Some(root));
//! let trigger = document.create_element(ElementKind::AccordionTrigger, Some(item));
//! document.set_value(trigger, "a");
//!
//! let accordion =
//!     Accordion::new(document.clone(), &IdGenerator::new(), AccordionConfig::single());
//! accordion.mount(root);
//! accordion.toggle("a");
//! assert!(accordion.is_expanded("a"));
//! ```

pub mod collections;
pub mod dom;
pub mod error;
pub mod event;
pub mod key_manager;
pub mod widgets;

pub use grail_core;
pub use grail_core::{IdGenerator, ManualClock, Signal, Store, TimerQueue};

pub use collections::{SelectionChange, SelectionModel, SelectionModelConfig};
pub use dom::{Document, Element, ElementId, ElementKind};
pub use error::{GrailError, Result, SelectionError};
pub use event::{
    ClickEvent, EventBase, FocusInEvent, FocusOutEvent, Key, KeyPressEvent, KeyboardModifiers,
    PasteEvent, PointerDownEvent, PointerOverEvent, PointerUpEvent, WheelEvent,
};
pub use key_manager::{ActiveItem, Direction, ListKeyManager, ListKeyManagerConfig, Typeahead};
pub use widgets::{
    Accordion, AccordionConfig, AccordionType, ActivationMode, AriaRole, Menu, MenuConfig,
    NumberInput, NumberInputConfig, Orientation, Pagination, PaginationConfig, Progress,
    ProgressConfig, Tabs, TabsConfig, ToggleGroup, ToggleGroupConfig,
};
