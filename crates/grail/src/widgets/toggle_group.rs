//! Toggle group behavior: a set of two-state buttons.
//!
//! A single toggle group behaves like a radio group (at most one item
//! pressed, rendered as `role="radio"`); a multiple toggle group is a row of
//! independent pressed buttons.

use std::fmt;
use std::sync::Arc;

use grail_core::logging::targets;
use grail_core::{ConnectionId, Store};
use parking_lot::Mutex;

use super::{AriaRole, AttrPairs, Orientation, PairsBuilder, RovingFocus, ValueChangeCallback};
use crate::collections::{SelectionModel, SelectionModelConfig};
use crate::dom::{Document, ElementId, ElementKind};
use crate::error::Result;
use crate::event::{ClickEvent, KeyPressEvent};
use crate::key_manager::{Direction, ListKeyManagerConfig};

/// Pressed state of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToggleItemState {
    /// Pressed.
    On,
    /// Not pressed.
    Off,
}

impl ToggleItemState {
    fn from_pressed(pressed: bool) -> Self {
        if pressed { Self::On } else { Self::Off }
    }

    /// The `data-state` value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

/// Which items are disabled.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Disabled {
    /// No item.
    #[default]
    None,
    /// Every item.
    All,
    /// The items with these keys.
    Keys(Vec<String>),
}

impl Disabled {
    /// Returns true if the item with `key` is disabled.
    pub fn contains(&self, key: &str) -> bool {
        match self {
            Self::None => false,
            Self::All => true,
            Self::Keys(keys) => keys.iter().any(|k| k == key),
        }
    }
}

/// Configuration for a [`ToggleGroup`].
#[derive(Clone, Default)]
pub struct ToggleGroupConfig {
    /// Arrow keys follow this orientation.
    pub orientation: Orientation,
    /// Allow several items to be pressed at once.
    pub multiple: bool,
    /// Initially pressed items. A single group keeps only the first.
    pub value: Vec<String>,
    /// Disabled items.
    pub disabled: Disabled,
    /// Called with the pressed keys while mounted: once on mount, then after
    /// every change.
    pub on_value_change: Option<ValueChangeCallback>,
}

impl ToggleGroupConfig {
    /// Create a single-press configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the orientation.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Allow several pressed items.
    pub fn with_multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    /// Set the initially pressed items.
    pub fn with_value<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.value = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Set the disabled items.
    pub fn with_disabled(mut self, disabled: Disabled) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set the value change callback.
    pub fn with_on_value_change<F>(mut self, f: F) -> Self
    where
        F: Fn(&[String]) + Send + Sync + 'static,
    {
        self.on_value_change = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for ToggleGroupConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToggleGroupConfig")
            .field("orientation", &self.orientation)
            .field("multiple", &self.multiple)
            .field("value", &self.value)
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}

/// Attributes for the group root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleGroupRootAttrs {
    /// Always [`AriaRole::Group`].
    pub role: AriaRole,
}

impl ToggleGroupRootAttrs {
    /// Attribute pairs for hosts that bind strings.
    pub fn to_pairs(&self) -> AttrPairs {
        PairsBuilder::new()
            .attr("data-toggle-group-root", "")
            .attr("role", self.role.as_str())
            .build()
    }
}

/// Attributes for a toggle item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleGroupItemAttrs {
    /// The item key.
    pub key: String,
    /// Pressed state.
    pub state: ToggleItemState,
    /// `0` when pressed, `-1` otherwise.
    pub tabindex: i32,
    /// `Some(Radio)` in a single group.
    pub role: Option<AriaRole>,
    /// `aria-pressed`, set in a multiple group.
    pub aria_pressed: Option<bool>,
    /// `aria-checked`, set in a single group.
    pub aria_checked: Option<bool>,
    /// Whether the item is disabled.
    pub disabled: bool,
}

impl ToggleGroupItemAttrs {
    /// Attribute pairs for hosts that bind strings.
    pub fn to_pairs(&self) -> AttrPairs {
        PairsBuilder::new()
            .attr("data-toggle-group-item", &self.key)
            .attr("data-state", self.state.as_str())
            .attr("type", "button")
            .attr("tabindex", self.tabindex.to_string())
            .opt("aria-pressed", self.aria_pressed)
            .opt("role", self.role.map(AriaRole::as_str))
            .opt("aria-checked", self.aria_checked)
            .opt("disabled", self.disabled.then_some("true"))
            .flag("data-disabled", self.disabled)
            .build()
    }
}

struct Mounted {
    focus: RovingFocus,
    value_connection: Option<ConnectionId>,
}

/// Toggle group behavior.
pub struct ToggleGroup {
    document: Arc<Document>,
    orientation: Orientation,
    multiple: bool,
    disabled: Arc<Mutex<Disabled>>,
    selection: Mutex<SelectionModel<String>>,
    pressed: Store<Vec<String>>,
    on_value_change: Option<ValueChangeCallback>,
    mounted: Mutex<Option<Arc<Mounted>>>,
}

impl ToggleGroup {
    /// Create a detached toggle group.
    pub fn new(document: Arc<Document>, config: ToggleGroupConfig) -> Self {
        let selection = SelectionModel::new(
            SelectionModelConfig {
                multiple: config.multiple,
                ..SelectionModelConfig::default()
            }
            .with_initially_selected(config.value),
        );
        let pressed = Store::new(selection.selected().to_vec());

        Self {
            document,
            orientation: config.orientation,
            multiple: config.multiple,
            disabled: Arc::new(Mutex::new(config.disabled)),
            selection: Mutex::new(selection),
            pressed,
            on_value_change: config.on_value_change,
            mounted: Mutex::new(None),
        }
    }

    /// Whether several items may be pressed.
    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    /// The disabled items.
    pub fn disabled(&self) -> Disabled {
        self.disabled.lock().clone()
    }

    /// Replace the disabled items.
    pub fn set_disabled(&self, disabled: Disabled) {
        *self.disabled.lock() = disabled;
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Bind to the subtree rooted at `root`.
    pub fn mount(&self, root: ElementId) {
        self.destroy();

        let horizontal = match self.orientation {
            Orientation::Horizontal => Some(Direction::Ltr),
            Orientation::Vertical => None,
        };
        let config = ListKeyManagerConfig::new()
            .with_home_and_end(true)
            .with_wrap(true)
            .with_horizontal(horizontal)
            .with_vertical(self.orientation == Orientation::Vertical);
        let disabled = self.disabled.clone();
        let focus = RovingFocus::new(&self.document, root, config, move |document, id| {
            document
                .value(id)
                .is_some_and(|key| disabled.lock().contains(&key))
        });
        let value_connection = self.on_value_change.clone().map(|callback| {
            self.pressed
                .subscribe(move |keys: &Vec<String>| callback(keys.as_slice()))
        });

        *self.mounted.lock() = Some(Arc::new(Mounted {
            focus,
            value_connection,
        }));
        tracing::debug!(target: targets::WIDGETS, multiple = self.multiple, "toggle group mounted");
    }

    /// Unbind from the document. Safe to call when not mounted.
    pub fn destroy(&self) {
        let Some(mounted) = self.mounted.lock().take() else {
            return;
        };
        mounted.focus.destroy();
        if let Some(id) = mounted.value_connection {
            self.pressed.unsubscribe(id);
        }
        tracing::debug!(target: targets::WIDGETS, "toggle group destroyed");
    }

    /// Returns true while bound to a document subtree.
    pub fn is_mounted(&self) -> bool {
        self.mounted.lock().is_some()
    }

    fn mounted(&self) -> Option<Arc<Mounted>> {
        self.mounted.lock().clone()
    }

    // =========================================================================
    // Pressed state
    // =========================================================================

    /// Store of the pressed keys, in press order.
    pub fn pressed_store(&self) -> &Store<Vec<String>> {
        &self.pressed
    }

    /// The pressed keys.
    pub fn pressed(&self) -> Vec<String> {
        self.pressed.get()
    }

    /// Returns true if the item is pressed.
    pub fn is_pressed(&self, key: &str) -> bool {
        self.pressed.with(|keys| keys.iter().any(|k| k == key))
    }

    fn update_selection<R>(&self, f: impl FnOnce(&mut SelectionModel<String>) -> R) -> R {
        let (result, selected) = {
            let mut selection = self.selection.lock();
            let result = f(&mut selection);
            (result, selection.selected().to_vec())
        };
        self.pressed.set(selected);
        result
    }

    /// Toggle an item.
    pub fn toggle(&self, key: impl Into<String>) {
        let key = key.into();
        self.update_selection(|selection| selection.toggle(key));
    }

    /// Press items. A single group rejects more than one key.
    pub fn press(&self, keys: &[String]) -> Result<()> {
        self.update_selection(|selection| selection.select(keys))?;
        Ok(())
    }

    /// Release items.
    pub fn unpress(&self, keys: &[String]) -> Result<()> {
        self.update_selection(|selection| selection.deselect(keys))?;
        Ok(())
    }

    // =========================================================================
    // Events
    // =========================================================================

    fn items(&self, root: ElementId) -> Vec<ElementId> {
        self.document
            .descendants_of_kind(root, ElementKind::ToggleGroupItem)
    }

    /// The toggle item containing `target`, if it belongs to this group.
    fn item_for(&self, focus: &RovingFocus, target: ElementId) -> Option<ElementId> {
        self.document
            .closest_of_kind(target, ElementKind::ToggleGroupItem)
            .filter(|item| self.document.is_within(*item, focus.root()))
    }

    fn toggle_item(&self, item: ElementId) {
        if self.document.is_disabled(item) {
            return;
        }
        let Some(key) = self.document.value(item) else {
            return;
        };
        if self.disabled.lock().contains(&key) {
            return;
        }
        self.toggle(key);
    }

    /// Handle a key press inside the mounted subtree.
    pub fn handle_keydown(&self, event: &mut KeyPressEvent) {
        let (Some(mounted), Some(target)) = (self.mounted(), event.target) else {
            return;
        };
        let Some(item) = self.item_for(&mounted.focus, target) else {
            return;
        };

        if event.key.is_activation() {
            event.base.accept();
            self.toggle_item(item);
            return;
        }

        let collection = self.items(mounted.focus.root());
        mounted.focus.navigate(collection, item, event);
    }

    /// Handle a click inside the mounted subtree.
    pub fn handle_click(&self, event: &mut ClickEvent) {
        let Some(mounted) = self.mounted() else {
            return;
        };
        if let Some(item) = self.item_for(&mounted.focus, event.target) {
            self.toggle_item(item);
        }
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    /// Attributes for the group root.
    pub fn root_attrs(&self) -> ToggleGroupRootAttrs {
        ToggleGroupRootAttrs {
            role: AriaRole::Group,
        }
    }

    /// Attributes for the item with `key`.
    pub fn item_attrs(&self, key: &str) -> ToggleGroupItemAttrs {
        let pressed = self.is_pressed(key);
        let (role, aria_pressed, aria_checked) = if self.multiple {
            (None, Some(pressed), None)
        } else {
            (Some(AriaRole::Radio), None, Some(pressed))
        };

        ToggleGroupItemAttrs {
            key: key.to_string(),
            state: ToggleItemState::from_pressed(pressed),
            tabindex: if pressed { 0 } else { -1 },
            role,
            aria_pressed,
            aria_checked,
            disabled: self.disabled.lock().contains(key),
        }
    }
}

impl fmt::Debug for ToggleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToggleGroup")
            .field("multiple", &self.multiple)
            .field("pressed", &self.pressed.get())
            .field("mounted", &self.is_mounted())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_variants() {
        assert!(!Disabled::None.contains("a"));
        assert!(Disabled::All.contains("a"));
        let keys = Disabled::Keys(vec!["b".into()]);
        assert!(keys.contains("b"));
        assert!(!keys.contains("a"));
    }

    #[test]
    fn test_single_group_renders_radios() {
        let group = ToggleGroup::new(
            Arc::new(Document::new()),
            ToggleGroupConfig::new().with_value(["bold"]),
        );

        let attrs = group.item_attrs("bold");
        assert_eq!(attrs.role, Some(AriaRole::Radio));
        assert_eq!(attrs.aria_checked, Some(true));
        assert_eq!(attrs.aria_pressed, None);
        assert_eq!(attrs.tabindex, 0);
        assert_eq!(group.item_attrs("italic").tabindex, -1);
    }

    #[test]
    fn test_multiple_group_renders_pressed() {
        let group = ToggleGroup::new(
            Arc::new(Document::new()),
            ToggleGroupConfig::new()
                .with_multiple(true)
                .with_disabled(Disabled::Keys(vec!["underline".into()])),
        );

        group.press(&["bold".to_string(), "italic".to_string()]).unwrap();
        let pairs = group.item_attrs("italic").to_pairs();
        assert!(pairs.contains(&("aria-pressed", "true".to_string())));
        assert!(!pairs.iter().any(|(name, _)| *name == "role"));
        assert!(group.item_attrs("underline").disabled);
    }

    #[test]
    fn test_single_press_rejects_two_keys() {
        let group = ToggleGroup::new(Arc::new(Document::new()), ToggleGroupConfig::new());
        assert!(group.press(&["a".to_string(), "b".to_string()]).is_err());
        assert!(group.pressed().is_empty());
    }
}
