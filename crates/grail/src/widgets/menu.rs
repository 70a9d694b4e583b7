//! Menu behavior: a trigger button opening a list of actions.
//!
//! The menu owns its key manager for its whole lifetime. While open, the
//! items are the [`ElementKind::MenuItem`] elements of the mounted menu
//! element. Closing the menu clears the active item.
//!
//! # Keyboard
//!
//! On the trigger:
//!
//! | Key | Action |
//! |-----|--------|
//! | Enter, Space | Toggle the menu |
//! | Down, Up | Open and activate the first/last item |
//! | Escape, Tab | Close |
//!
//! In the menu: Escape closes and returns focus to the trigger, Enter
//! selects the focused item, Up/Down/Home/End navigate without wrapping,
//! typed characters search item labels and Tab closes. A pointer press
//! outside the menu and the trigger closes without moving focus.

use std::fmt;
use std::sync::{Arc, Weak};

use grail_core::logging::targets;
use grail_core::{IdGenerator, Store, TimerQueue};
use parking_lot::Mutex;

use super::{AriaRole, AttrPairs, Orientation, PairsBuilder, element_navigation};
use crate::dom::{Document, ElementId, ElementKind};
use crate::event::{
    ClickEvent, EventBase, Key, KeyPressEvent, PointerDownEvent, PointerOverEvent,
};
use crate::key_manager::{ActiveItem, ListKeyManager, ListKeyManagerConfig};

/// Callback receiving the new open state.
pub type OpenChangeCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Callback receiving a selected item id; returns whether the menu closes.
pub type SelectCallback = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Configuration for a [`Menu`].
#[derive(Clone)]
pub struct MenuConfig {
    /// Whether the menu starts open.
    pub open: bool,
    /// Accessible name of the menu.
    pub aria_label: String,
    /// Called when the menu opens or closes.
    pub on_open_change: Option<OpenChangeCallback>,
    /// Called when an item is selected.
    pub on_select: Option<SelectCallback>,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            open: false,
            aria_label: "Menu".to_string(),
            on_open_change: None,
            on_select: None,
        }
    }
}

impl MenuConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start open.
    pub fn with_open(mut self, open: bool) -> Self {
        self.open = open;
        self
    }

    /// Set the accessible name.
    pub fn with_aria_label(mut self, label: impl Into<String>) -> Self {
        self.aria_label = label.into();
        self
    }

    /// Set the open change callback.
    pub fn with_on_open_change<F>(mut self, f: F) -> Self
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.on_open_change = Some(Arc::new(f));
        self
    }

    /// Set the select callback.
    pub fn with_on_select<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.on_select = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for MenuConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuConfig")
            .field("open", &self.open)
            .field("aria_label", &self.aria_label)
            .finish_non_exhaustive()
    }
}

/// Identifies a menu item when computing attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItemParams {
    /// The item id passed to `on_select`.
    pub id: String,
    /// The label typeahead matches against.
    pub label: String,
}

impl MenuItemParams {
    /// Parameters with a separate id and label.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

impl From<&str> for MenuItemParams {
    fn from(id: &str) -> Self {
        Self::new(id, id)
    }
}

/// Attributes for the menu trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuTriggerAttrs {
    /// The trigger's DOM id.
    pub id: String,
    /// Always true.
    pub aria_haspopup: bool,
    /// Whether the menu is open.
    pub aria_expanded: bool,
}

impl MenuTriggerAttrs {
    /// Attribute pairs for hosts that bind strings.
    pub fn to_pairs(&self) -> AttrPairs {
        PairsBuilder::new()
            .attr("id", &self.id)
            .attr("aria-haspopup", self.aria_haspopup.to_string())
            .attr("aria-expanded", self.aria_expanded.to_string())
            .build()
    }
}

/// Attributes for the menu element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuAttrs {
    /// Always [`AriaRole::Menu`].
    pub role: AriaRole,
    /// Accessible name.
    pub aria_label: String,
    /// Always `-1`.
    pub tabindex: i32,
}

impl MenuAttrs {
    /// Attribute pairs for hosts that bind strings.
    pub fn to_pairs(&self) -> AttrPairs {
        PairsBuilder::new()
            .attr("role", self.role.as_str())
            .attr("aria-label", &self.aria_label)
            .attr("tabindex", self.tabindex.to_string())
            .build()
    }
}

/// Attributes for a menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItemAttrs {
    /// Always [`AriaRole::MenuItem`].
    pub role: AriaRole,
    /// The item's DOM id.
    pub id: String,
    /// `0` for the active item, `-1` otherwise.
    pub tabindex: i32,
    /// The item id passed to `on_select`.
    pub item_id: String,
    /// The typeahead label.
    pub label: String,
}

impl MenuItemAttrs {
    /// Attribute pairs for hosts that bind strings.
    pub fn to_pairs(&self) -> AttrPairs {
        PairsBuilder::new()
            .attr("role", self.role.as_str())
            .attr("id", &self.id)
            .attr("tabindex", self.tabindex.to_string())
            .attr("data-item-id", &self.item_id)
            .attr("data-label", &self.label)
            .build()
    }
}

/// Attributes for a separator between menu items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeparatorAttrs {
    /// Always [`AriaRole::Separator`].
    pub role: AriaRole,
    /// Always horizontal.
    pub aria_orientation: Orientation,
    /// Always `-1`.
    pub tabindex: i32,
}

impl SeparatorAttrs {
    /// Attribute pairs for hosts that bind strings.
    pub fn to_pairs(&self) -> AttrPairs {
        PairsBuilder::new()
            .attr("role", self.role.as_str())
            .attr("aria-orientation", self.aria_orientation.as_str())
            .attr("tabindex", self.tabindex.to_string())
            .build()
    }
}

struct MenuInner {
    document: Arc<Document>,
    id: String,
    aria_label: String,
    open: Store<bool>,
    items: Arc<Store<Vec<ElementId>>>,
    key_manager: ListKeyManager<ElementId>,
    trigger: Mutex<Option<ElementId>>,
    menu: Mutex<Option<ElementId>>,
    on_open_change: Option<OpenChangeCallback>,
    on_select: Option<SelectCallback>,
}

impl MenuInner {
    fn set_open(&self, open: bool) {
        if !self.open.set(open) {
            return;
        }
        tracing::trace!(target: targets::WIDGETS, id = %self.id, open, "menu open changed");

        self.sync_items();
        let menu = *self.menu.lock();
        if let (true, Some(menu)) = (open, menu) {
            self.document.focus(menu);
        }
        if let Some(callback) = &self.on_open_change {
            callback(open);
        }
    }

    fn hide(&self, return_focus: bool) {
        self.set_open(false);
        if return_focus {
            let trigger = *self.trigger.lock();
            if let Some(trigger) = trigger {
                self.document.focus(trigger);
            }
        }
    }

    /// Load the items of the open menu, or clear the active item when closed.
    fn sync_items(&self) {
        let menu = *self.menu.lock();
        match menu.filter(|_| self.open.get()) {
            Some(menu) => {
                self.items
                    .set(self.document.descendants_of_kind(menu, ElementKind::MenuItem));
            }
            None => self.key_manager.set_active_item(ActiveItem::None),
        }
    }

    fn menu_item(&self, target: ElementId) -> Option<ElementId> {
        let menu = (*self.menu.lock())?;
        self.document
            .closest_of_kind(target, ElementKind::MenuItem)
            .filter(|item| self.document.is_within(*item, menu))
    }

    fn select_from(&self, target: Option<ElementId>, base: &mut EventBase) {
        let Some(on_select) = &self.on_select else {
            return;
        };
        let Some(item) = target.and_then(|target| self.menu_item(target)) else {
            return;
        };
        base.accept();
        if self.document.is_disabled(item) {
            return;
        }
        let Some(item_id) = self.document.value(item) else {
            return;
        };

        tracing::trace!(target: targets::WIDGETS, id = %self.id, %item_id, "menu item selected");
        if on_select(&item_id) {
            self.hide(true);
        }
    }
}

/// Menu behavior.
pub struct Menu {
    inner: Arc<MenuInner>,
}

impl Menu {
    /// Create a detached menu. Typeahead is debounced on `timers`.
    pub fn new(
        document: Arc<Document>,
        ids: &IdGenerator,
        timers: Arc<TimerQueue>,
        config: MenuConfig,
    ) -> Self {
        let inner = Arc::new_cyclic(|weak: &Weak<MenuInner>| {
            let weak = weak.clone();
            let navigation = ListKeyManagerConfig::new()
                .with_typeahead(timers)
                .with_home_and_end(true)
                .with_wrap(false)
                .with_vertical(true)
                .with_tab_out(move || {
                    if let Some(inner) = weak.upgrade() {
                        inner.hide(false);
                    }
                });
            let items = Arc::new(Store::new(Vec::new()));
            let navigation = element_navigation(&document, navigation, |_, _| false);
            let key_manager = ListKeyManager::new(items.clone(), navigation);

            MenuInner {
                id: ids.next("menu"),
                aria_label: config.aria_label,
                open: Store::new(config.open),
                items,
                key_manager,
                trigger: Mutex::new(None),
                menu: Mutex::new(None),
                on_open_change: config.on_open_change,
                on_select: config.on_select,
                document,
            }
        });
        Self { inner }
    }

    /// The DOM id of the trigger, also the prefix of item ids.
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    // =========================================================================
    // Open state
    // =========================================================================

    /// Store of the open state.
    pub fn open_store(&self) -> &Store<bool> {
        &self.inner.open
    }

    /// Whether the menu is open.
    pub fn is_open(&self) -> bool {
        self.inner.open.get()
    }

    /// Open or close the menu.
    pub fn set_open(&self, open: bool) {
        self.inner.set_open(open);
    }

    /// Flip the open state.
    pub fn toggle(&self) {
        self.inner.set_open(!self.is_open());
    }

    /// Close the menu, optionally focusing the trigger.
    pub fn hide(&self, return_focus: bool) {
        self.inner.hide(return_focus);
    }

    /// The active menu item.
    pub fn active_item(&self) -> Option<ElementId> {
        self.inner.key_manager.current_active_item()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Bind the trigger element.
    pub fn mount_trigger(&self, trigger: ElementId) {
        *self.inner.trigger.lock() = Some(trigger);
        tracing::debug!(target: targets::WIDGETS, id = %self.inner.id, "menu trigger mounted");
    }

    /// Bind the menu element and load its items if open.
    pub fn mount_menu(&self, menu: ElementId) {
        *self.inner.menu.lock() = Some(menu);
        self.inner.sync_items();
        tracing::debug!(target: targets::WIDGETS, id = %self.inner.id, "menu mounted");
    }

    /// Unbind the menu element.
    pub fn unmount_menu(&self) {
        *self.inner.menu.lock() = None;
        self.inner.sync_items();
    }

    /// Close the menu and unbind everything.
    ///
    /// Item list tracking and typeahead stop for good.
    pub fn destroy(&self) {
        self.inner.key_manager.destroy();
        self.inner.hide(false);
        *self.inner.menu.lock() = None;
        *self.inner.trigger.lock() = None;
        tracing::debug!(target: targets::WIDGETS, id = %self.inner.id, "menu destroyed");
    }

    fn trigger(&self) -> Option<ElementId> {
        *self.inner.trigger.lock()
    }

    fn menu(&self) -> Option<ElementId> {
        *self.inner.menu.lock()
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Handle a key press on the trigger.
    pub fn handle_trigger_keydown(&self, event: &mut KeyPressEvent) {
        if self.trigger().is_none() {
            return;
        }
        match event.key {
            Key::Enter | Key::Space => {
                event.base.accept();
                self.toggle();
            }
            Key::Escape => {
                event.base.accept();
                self.inner.hide(false);
            }
            Key::Tab => self.inner.hide(false),
            Key::ArrowDown | Key::ArrowUp => {
                event.base.accept();
                self.inner.set_open(true);
                if event.key == Key::ArrowDown {
                    self.inner.key_manager.set_first_item_active();
                } else {
                    self.inner.key_manager.set_last_item_active();
                }
            }
            _ => {}
        }
    }

    /// Handle a click on the trigger.
    pub fn handle_trigger_click(&self, _event: &mut ClickEvent) {
        if self.trigger().is_some() {
            self.toggle();
        }
    }

    /// Handle a key press inside the menu.
    pub fn handle_menu_keydown(&self, event: &mut KeyPressEvent) {
        if self.menu().is_none() {
            return;
        }
        match event.key {
            Key::Escape => {
                self.inner.hide(true);
                return;
            }
            Key::Enter => self.inner.select_from(event.target, &mut event.base),
            _ => {}
        }
        self.inner.key_manager.on_keydown(event);
    }

    /// Handle a click inside the menu.
    pub fn handle_menu_click(&self, event: &mut ClickEvent) {
        if self.menu().is_some() {
            self.inner.select_from(Some(event.target), &mut event.base);
        }
    }

    /// Handle a pointer press anywhere in the document.
    ///
    /// While open, a press outside both the menu and the trigger closes the
    /// menu without moving focus. Presses another handler already accepted
    /// are left alone, as are presses on the trigger, whose click toggles.
    pub fn handle_pointer_down_outside(&self, event: &mut PointerDownEvent) {
        let Some(menu) = self.menu() else {
            return;
        };
        if !self.is_open() || event.base.is_accepted() {
            return;
        }
        let document = &self.inner.document;
        let inside_trigger = self
            .trigger()
            .is_some_and(|trigger| document.is_within(event.target, trigger));
        if document.is_within(event.target, menu) || inside_trigger {
            return;
        }
        tracing::trace!(target: targets::WIDGETS, id = %self.inner.id, "pointer down outside menu");
        self.inner.hide(false);
    }

    /// Handle the pointer moving over an element inside the menu.
    pub fn handle_menu_pointer_over(&self, event: &mut PointerOverEvent) {
        if self.menu().is_none() {
            return;
        }
        if self.inner.document.kind(event.target) == Some(ElementKind::MenuItem) {
            self.inner
                .key_manager
                .set_active_item(ActiveItem::Item(event.target));
        }
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    /// Attributes for the trigger.
    pub fn trigger_attrs(&self) -> MenuTriggerAttrs {
        MenuTriggerAttrs {
            id: self.inner.id.clone(),
            aria_haspopup: true,
            aria_expanded: self.is_open(),
        }
    }

    /// Attributes for the menu element.
    pub fn menu_attrs(&self) -> MenuAttrs {
        MenuAttrs {
            role: AriaRole::Menu,
            aria_label: self.inner.aria_label.clone(),
            tabindex: -1,
        }
    }

    /// Attributes for a menu item.
    pub fn item_attrs(&self, params: impl Into<MenuItemParams>) -> MenuItemAttrs {
        let MenuItemParams { id, label } = params.into();
        let dom_id = format!("{}_item_{}", self.inner.id, id);
        let active = self
            .active_item()
            .and_then(|item| {
                self.inner
                    .document
                    .with_element(item, |e| e.dom_id.clone())
            })
            .flatten()
            .is_some_and(|active_id| active_id == dom_id);

        MenuItemAttrs {
            role: AriaRole::MenuItem,
            id: dom_id,
            tabindex: if active { 0 } else { -1 },
            item_id: id,
            label,
        }
    }

    /// Attributes for a separator.
    pub fn separator_attrs(&self) -> SeparatorAttrs {
        SeparatorAttrs {
            role: AriaRole::Separator,
            aria_orientation: Orientation::Horizontal,
            tabindex: -1,
        }
    }
}

impl fmt::Debug for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Menu")
            .field("id", &self.inner.id)
            .field("open", &self.is_open())
            .field("active_item", &self.active_item())
            .finish()
    }
}
