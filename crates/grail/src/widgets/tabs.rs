//! Tabs behavior: a tab list selecting one visible panel.
//!
//! The active tab is a single value. In [`ActivationMode::Automatic`] a tab
//! activates as soon as it receives focus; in [`ActivationMode::Manual`] it
//! activates on click, Enter or Space.

use std::fmt;
use std::sync::Arc;

use grail_core::logging::targets;
use grail_core::{IdGenerator, Store};
use parking_lot::Mutex;

use super::{AriaRole, AttrPairs, Orientation, PairsBuilder, RovingFocus, content_id, trigger_id};
use crate::dom::{Document, ElementId, ElementKind};
use crate::event::{ClickEvent, FocusInEvent, KeyPressEvent};
use crate::key_manager::{Direction, ListKeyManagerConfig};

/// Callback receiving the newly active tab.
pub type TabChangeCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// When focusing a tab activates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActivationMode {
    /// Focus activates.
    #[default]
    Automatic,
    /// Only click, Enter or Space activate.
    Manual,
}

/// Configuration for [`Tabs`].
#[derive(Clone, Default)]
pub struct TabsConfig {
    /// Arrow keys follow this orientation.
    pub orientation: Orientation,
    /// When focus activates a tab.
    pub activation_mode: ActivationMode,
    /// The initially active tab.
    pub default_value: Option<String>,
    /// Called when the active tab changes.
    pub on_value_change: Option<TabChangeCallback>,
}

impl TabsConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the orientation.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the activation mode.
    pub fn with_activation_mode(mut self, mode: ActivationMode) -> Self {
        self.activation_mode = mode;
        self
    }

    /// Set the initially active tab.
    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Set the value change callback.
    pub fn with_on_value_change<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_value_change = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for TabsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabsConfig")
            .field("orientation", &self.orientation)
            .field("activation_mode", &self.activation_mode)
            .field("default_value", &self.default_value)
            .finish_non_exhaustive()
    }
}

/// Identifies a tab when computing trigger attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabsTriggerParams {
    /// The tab value.
    pub value: String,
    /// Disables this tab.
    pub disabled: bool,
}

impl TabsTriggerParams {
    /// Parameters for an enabled tab.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            disabled: false,
        }
    }

    /// Set whether the tab is disabled.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

impl From<&str> for TabsTriggerParams {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TabsTriggerParams {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Attributes for the tabs root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabsRootAttrs {
    /// The tabs orientation.
    pub orientation: Orientation,
}

impl TabsRootAttrs {
    /// Attribute pairs for hosts that bind strings.
    pub fn to_pairs(&self) -> AttrPairs {
        PairsBuilder::new()
            .attr("data-tabs-root", "")
            .attr("data-orientation", self.orientation.as_str())
            .build()
    }
}

/// Attributes for the tab list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabsListAttrs {
    /// Always [`AriaRole::TabList`].
    pub role: AriaRole,
    /// The list orientation.
    pub aria_orientation: Orientation,
}

impl TabsListAttrs {
    /// Attribute pairs for hosts that bind strings.
    pub fn to_pairs(&self) -> AttrPairs {
        PairsBuilder::new()
            .attr("data-tabs-list", "")
            .attr("aria-orientation", self.aria_orientation.as_str())
            .attr("data-orientation", self.aria_orientation.as_str())
            .attr("role", self.role.as_str())
            .build()
    }
}

/// Attributes for a tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabsTriggerAttrs {
    /// The tab value.
    pub value: String,
    /// Always [`AriaRole::Tab`].
    pub role: AriaRole,
    /// The tab's DOM id.
    pub id: String,
    /// The DOM id of its panel.
    pub aria_controls: String,
    /// Whether the tab is active.
    pub aria_selected: bool,
    /// `0` for the active tab, `-1` otherwise.
    pub tabindex: i32,
    /// The tabs orientation.
    pub orientation: Orientation,
    /// Whether the tab is disabled.
    pub disabled: bool,
}

impl TabsTriggerAttrs {
    /// Attribute pairs for hosts that bind strings.
    pub fn to_pairs(&self) -> AttrPairs {
        PairsBuilder::new()
            .attr("data-tabs-trigger", "")
            .attr("data-orientation", self.orientation.as_str())
            .attr("data-state", state_str(self.aria_selected))
            .attr("data-value", &self.value)
            .attr("role", self.role.as_str())
            .attr("id", &self.id)
            .attr("aria-controls", &self.aria_controls)
            .attr("aria-selected", self.aria_selected.to_string())
            .attr("tabindex", self.tabindex.to_string())
            .flag("data-disabled", self.disabled)
            .opt("disabled", self.disabled.then_some("true"))
            .build()
    }
}

/// Attributes for a tab panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabsContentAttrs {
    /// The tab value.
    pub value: String,
    /// Always [`AriaRole::TabPanel`].
    pub role: AriaRole,
    /// The panel's DOM id.
    pub id: String,
    /// The DOM id of its tab.
    pub aria_labelledby: String,
    /// Whether the panel's tab is active.
    pub active: bool,
    /// The tabs orientation.
    pub orientation: Orientation,
}

impl TabsContentAttrs {
    /// Attribute pairs for hosts that bind strings.
    pub fn to_pairs(&self) -> AttrPairs {
        PairsBuilder::new()
            .attr("data-tabs-content", &self.value)
            .attr("data-orientation", self.orientation.as_str())
            .attr("data-state", state_str(self.active))
            .attr("data-value", &self.value)
            .attr("role", self.role.as_str())
            .attr("id", &self.id)
            .attr("aria-labelledby", &self.aria_labelledby)
            .attr("tabindex", "0")
            .opt("hidden", (!self.active).then_some("true"))
            .build()
    }
}

fn state_str(active: bool) -> &'static str {
    if active { "active" } else { "inactive" }
}

/// Tabs behavior.
pub struct Tabs {
    document: Arc<Document>,
    base_id: String,
    orientation: Orientation,
    activation_mode: Mutex<ActivationMode>,
    active: Store<Option<String>>,
    on_value_change: Option<TabChangeCallback>,
    mounted: Mutex<Option<Arc<RovingFocus>>>,
}

impl Tabs {
    /// Create detached tabs.
    pub fn new(document: Arc<Document>, ids: &IdGenerator, config: TabsConfig) -> Self {
        Self {
            document,
            base_id: ids.next("tabs"),
            orientation: config.orientation,
            activation_mode: Mutex::new(config.activation_mode),
            active: Store::new(config.default_value),
            on_value_change: config.on_value_change,
            mounted: Mutex::new(None),
        }
    }

    /// The id prefix of these tabs' elements.
    pub fn base_id(&self) -> &str {
        &self.base_id
    }

    /// The tabs orientation.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// The activation mode.
    pub fn activation_mode(&self) -> ActivationMode {
        *self.activation_mode.lock()
    }

    /// Change the activation mode.
    pub fn set_activation_mode(&self, mode: ActivationMode) {
        *self.activation_mode.lock() = mode;
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
        let focus = RovingFocus::new(&self.document, root, config, |_, _| false);
        focus
            .key_manager()
            .items()
            .set(self.document.descendants_of_kind(root, ElementKind::TabsTrigger));

        *self.mounted.lock() = Some(Arc::new(focus));
        tracing::debug!(target: targets::WIDGETS, base_id = %self.base_id, "tabs mounted");
    }

    /// Unbind from the document. Safe to call when not mounted.
    pub fn destroy(&self) {
        if let Some(focus) = self.mounted.lock().take() {
            focus.destroy();
            tracing::debug!(target: targets::WIDGETS, base_id = %self.base_id, "tabs destroyed");
        }
    }

    /// Returns true while bound to a document subtree.
    pub fn is_mounted(&self) -> bool {
        self.mounted.lock().is_some()
    }

    fn mounted(&self) -> Option<Arc<RovingFocus>> {
        self.mounted.lock().clone()
    }

    // =========================================================================
    // Active tab
    // =========================================================================

    /// Store of the active tab.
    pub fn active_store(&self) -> &Store<Option<String>> {
        &self.active
    }

    /// The active tab.
    pub fn active(&self) -> Option<String> {
        self.active.get()
    }

    /// Activate a tab. The change callback runs only if the tab was not
    /// already active.
    pub fn activate(&self, value: impl Into<String>) {
        let value = value.into();
        if self.active.set(Some(value.clone())) {
            tracing::trace!(target: targets::WIDGETS, base_id = %self.base_id, %value, "tab activated");
            if let Some(callback) = &self.on_value_change {
                callback(&value);
            }
        }
    }

    // =========================================================================
    // Events
    // =========================================================================

    fn trigger_at(&self, focus: &RovingFocus, target: ElementId) -> Option<Vec<ElementId>> {
        let triggers = self
            .document
            .descendants_of_kind(focus.root(), ElementKind::TabsTrigger);
        triggers.contains(&target).then_some(triggers)
    }

    fn activate_trigger(&self, trigger: ElementId) {
        if self.document.is_disabled(trigger) {
            return;
        }
        if let Some(value) = self.document.value(trigger) {
            self.activate(value);
        }
    }

    /// Handle a key press inside the mounted subtree.
    pub fn handle_keydown(&self, event: &mut KeyPressEvent) {
        let (Some(focus), Some(target)) = (self.mounted(), event.target) else {
            return;
        };
        let Some(triggers) = self.trigger_at(&focus, target) else {
            return;
        };

        if event.key.is_activation() {
            event.base.accept();
            self.activate_trigger(target);
            return;
        }

        self.document.focus(target);
        focus.navigate(triggers, target, event);
    }

    /// Handle focus moving onto a tab.
    pub fn handle_focus_in(&self, event: &mut FocusInEvent) {
        if self.activation_mode() != ActivationMode::Automatic {
            return;
        }
        let Some(focus) = self.mounted() else {
            return;
        };
        if self.trigger_at(&focus, event.target).is_some() {
            self.activate_trigger(event.target);
        }
    }

    /// Handle a click inside the mounted subtree.
    pub fn handle_click(&self, event: &mut ClickEvent) {
        let Some(focus) = self.mounted() else {
            return;
        };
        if self.trigger_at(&focus, event.target).is_some() {
            self.activate_trigger(event.target);
        }
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    /// Attributes for the tabs root.
    pub fn root_attrs(&self) -> TabsRootAttrs {
        TabsRootAttrs {
            orientation: self.orientation,
        }
    }

    /// Attributes for the tab list.
    pub fn list_attrs(&self) -> TabsListAttrs {
        TabsListAttrs {
            role: AriaRole::TabList,
            aria_orientation: self.orientation,
        }
    }

    /// Attributes for a tab.
    ///
    /// While no tab is active, the first tab asked for becomes active.
    pub fn trigger_attrs(&self, params: impl Into<TabsTriggerParams>) -> TabsTriggerAttrs {
        let params = params.into();
        if self.active.with(Option::is_none) {
            self.activate(params.value.clone());
        }
        let selected = self
            .active
            .with(|active| active.as_deref() == Some(params.value.as_str()));

        TabsTriggerAttrs {
            role: AriaRole::Tab,
            id: trigger_id(&self.base_id, &params.value),
            aria_controls: content_id(&self.base_id, &params.value),
            aria_selected: selected,
            tabindex: if selected { 0 } else { -1 },
            orientation: self.orientation,
            disabled: params.disabled,
            value: params.value,
        }
    }

    /// Attributes for a tab panel.
    pub fn content_attrs(&self, value: &str) -> TabsContentAttrs {
        TabsContentAttrs {
            value: value.to_string(),
            role: AriaRole::TabPanel,
            id: content_id(&self.base_id, value),
            aria_labelledby: trigger_id(&self.base_id, value),
            active: self.active.with(|active| active.as_deref() == Some(value)),
            orientation: self.orientation,
        }
    }
}

impl fmt::Debug for Tabs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tabs")
            .field("base_id", &self.base_id)
            .field("orientation", &self.orientation)
            .field("active", &self.active.get())
            .field("mounted", &self.is_mounted())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_trigger_rendered_becomes_active() {
        let tabs = Tabs::new(Arc::new(Document::new()), &IdGenerator::new(), TabsConfig::new());

        let one = tabs.trigger_attrs("one");
        let two = tabs.trigger_attrs("two");

        assert_eq!(tabs.active().as_deref(), Some("one"));
        assert!(one.aria_selected);
        assert_eq!(one.tabindex, 0);
        assert_eq!(two.tabindex, -1);
        assert!(tabs.content_attrs("two").to_pairs().contains(&("hidden", "true".to_string())));
    }

    #[test]
    fn test_activate_reports_changes_only() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let tabs = Tabs::new(
            Arc::new(Document::new()),
            &IdGenerator::new(),
            TabsConfig::new()
                .with_default_value("a")
                .with_on_value_change(move |v| seen_clone.lock().push(v.to_string())),
        );

        tabs.activate("a");
        tabs.activate("b");
        tabs.activate("b");

        assert_eq!(*seen.lock(), vec!["b".to_string()]);
    }

    #[test]
    fn test_list_attrs() {
        let tabs = Tabs::new(
            Arc::new(Document::new()),
            &IdGenerator::new(),
            TabsConfig::new().with_orientation(Orientation::Vertical),
        );
        let pairs = tabs.list_attrs().to_pairs();
        assert!(pairs.contains(&("role", "tablist".to_string())));
        assert!(pairs.contains(&("aria-orientation", "vertical".to_string())));
    }
}
