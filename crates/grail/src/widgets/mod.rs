//! Headless widget behaviors.
//!
//! Each behavior composes a [`ListKeyManager`] over element handles with
//! either a [`SelectionModel`](crate::collections::SelectionModel) or a
//! simple active value, and computes typed attribute records for the host to
//! render.
//!
//! A behavior is created detached. [`mount`](accordion::Accordion::mount)
//! binds it to a live subtree of a [`Document`]; until then every event
//! handler is a no-op, which lets the same code run where no document
//! exists.
//!
//! # Event flow
//!
//! The host forwards events for the mounted subtree to the behavior's
//! `handle_*` methods. Enter and Space on an item perform the item action
//! and accept the event. Other keys rebuild the item list from the subtree,
//! make the event target the active item and hand the event to the key
//! manager, which moves document focus as the active item changes.

use std::sync::Arc;

use grail_core::Store;

use crate::dom::{Document, ElementId};
use crate::event::KeyPressEvent;
use crate::key_manager::{ActiveItem, ListKeyManager, ListKeyManagerConfig};

pub mod accordion;
pub mod menu;
pub mod number_input;
pub mod pagination;
pub mod progress;
pub mod tabs;
pub mod toggle_group;

pub use accordion::{
    Accordion, AccordionConfig, AccordionContentAttrs, AccordionItemAttrs, AccordionItemParams,
    AccordionItemState, AccordionTriggerAttrs, AccordionType,
};
pub use menu::{
    Menu, MenuAttrs, MenuConfig, MenuItemAttrs, MenuItemParams, MenuTriggerAttrs, SeparatorAttrs,
};
pub use number_input::{
    InputMode, NumberInput, NumberInputButtonAttrs, NumberInputConfig, NumberInputFieldAttrs,
    NumberInputLabelAttrs, SPIN_DELAY, SPIN_INTERVAL, Step, StepDirection, snap_value_to_step,
};
pub use pagination::{
    PageAriaLabel, PageChangeCallback, Pagination, PaginationConfig, PaginationItem,
    PaginationItemKind, PaginationNavAttrs, PaginationPageAttrs,
};
pub use progress::{
    Progress, ProgressAttrs, ProgressConfig, ProgressLabelFormatter, ProgressLabelParams,
};
pub use tabs::{
    ActivationMode, TabChangeCallback, Tabs, TabsConfig, TabsContentAttrs, TabsListAttrs,
    TabsRootAttrs, TabsTriggerAttrs, TabsTriggerParams,
};
pub use toggle_group::{
    Disabled, ToggleGroup, ToggleGroupConfig, ToggleGroupItemAttrs, ToggleGroupRootAttrs,
    ToggleItemState,
};

/// Callback receiving a widget's new value list.
pub type ValueChangeCallback = Arc<dyn Fn(&[String]) + Send + Sync>;

/// `(name, value)` attribute pairs, in a stable order.
pub type AttrPairs = Vec<(&'static str, String)>;

/// Layout direction of a widget's items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    /// Items are laid out left to right.
    #[default]
    Horizontal,
    /// Items are laid out top to bottom.
    Vertical,
}

impl Orientation {
    /// The attribute value for this orientation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

/// ARIA roles the behaviors assign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AriaRole {
    /// A labelled section of content.
    Region,
    /// A set of related controls.
    Group,
    /// A container of tabs.
    TabList,
    /// A single tab.
    Tab,
    /// The content of a tab.
    TabPanel,
    /// One of a set of mutually exclusive options.
    Radio,
    /// A list of actions.
    Menu,
    /// An action in a menu.
    MenuItem,
    /// A divider between groups of items.
    Separator,
    /// A set of navigation links.
    Navigation,
    /// The completion of a task.
    ProgressBar,
}

impl AriaRole {
    /// The attribute value for this role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Region => "region",
            Self::Group => "group",
            Self::TabList => "tablist",
            Self::Tab => "tab",
            Self::TabPanel => "tabpanel",
            Self::Radio => "radio",
            Self::Menu => "menu",
            Self::MenuItem => "menuitem",
            Self::Separator => "separator",
            Self::Navigation => "navigation",
            Self::ProgressBar => "progressbar",
        }
    }
}

/// Builds [`AttrPairs`] from optional fields.
#[derive(Debug, Default)]
pub(crate) struct PairsBuilder {
    pairs: AttrPairs,
}

impl PairsBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.pairs.push((name, value.into()));
        self
    }

    pub(crate) fn opt<V: ToString>(mut self, name: &'static str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.pairs.push((name, value.to_string()));
        }
        self
    }

    /// Presence attribute: emitted with an empty value when `on`.
    pub(crate) fn flag(self, name: &'static str, on: bool) -> Self {
        if on { self.attr(name, "") } else { self }
    }

    pub(crate) fn build(self) -> AttrPairs {
        self.pairs
    }
}

/// Formats a number the way it appears in an attribute: integers without a
/// fractional part, and no negative zero.
pub(crate) fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}

pub(crate) fn trigger_id(base_id: &str, value: &str) -> String {
    format!("{base_id}-trigger-{value}")
}

pub(crate) fn content_id(base_id: &str, value: &str) -> String {
    format!("{base_id}-content-{value}")
}

/// A key manager over the items of a mounted subtree.
///
/// Disabled elements are skipped, element labels drive typeahead, and the
/// active element receives document focus.
pub(crate) struct RovingFocus {
    root: ElementId,
    items: Arc<Store<Vec<ElementId>>>,
    key_manager: ListKeyManager<ElementId>,
}

impl RovingFocus {
    pub(crate) fn new<F>(
        document: &Arc<Document>,
        root: ElementId,
        config: ListKeyManagerConfig<ElementId>,
        widget_disabled: F,
    ) -> Self
    where
        F: Fn(&Document, ElementId) -> bool + Send + Sync + 'static,
    {
        let items = Arc::new(Store::new(Vec::new()));
        let config = element_navigation(document, config, widget_disabled);
        let key_manager = ListKeyManager::new(items.clone(), config);
        Self {
            root,
            items,
            key_manager,
        }
    }

    pub(crate) fn root(&self) -> ElementId {
        self.root
    }

    pub(crate) fn key_manager(&self) -> &ListKeyManager<ElementId> {
        &self.key_manager
    }

    /// Replace the items, make `target` active and let the key manager
    /// handle the event.
    pub(crate) fn navigate(
        &self,
        collection: Vec<ElementId>,
        target: ElementId,
        event: &mut KeyPressEvent,
    ) {
        let active = collection
            .iter()
            .position(|item| *item == target)
            .map_or(ActiveItem::None, ActiveItem::Index);
        self.items.set(collection);
        self.key_manager.set_active_item(active);
        self.key_manager.on_keydown(event);
    }

    pub(crate) fn destroy(&self) {
        self.key_manager.destroy();
    }
}

/// Adds the element-backed skip, label and focus behavior to a key manager
/// configuration.
///
/// An element is skipped when the document marks it disabled or when
/// `widget_disabled` reports it disabled through the widget's own state.
pub(crate) fn element_navigation<F>(
    document: &Arc<Document>,
    config: ListKeyManagerConfig<ElementId>,
    widget_disabled: F,
) -> ListKeyManagerConfig<ElementId>
where
    F: Fn(&Document, ElementId) -> bool + Send + Sync + 'static,
{
    let skip_doc = Arc::downgrade(document);
    let label_doc = Arc::downgrade(document);
    let focus_doc = Arc::downgrade(document);
    config
        .with_skip_predicate(move |id| {
            skip_doc
                .upgrade()
                .is_none_or(|doc| doc.is_disabled(*id) || widget_disabled(doc.as_ref(), *id))
        })
        .with_label(move |id| label_doc.upgrade().and_then(|doc| doc.label(*id)))
        .with_on_activate(move |id| {
            if let Some(doc) = focus_doc.upgrade() {
                doc.focus(*id);
            }
        })
}
