//! Accordion behavior: a stack of headings that each expand a content
//! section.
//!
//! Expansion state lives in a [`SelectionModel`] over item values, so a
//! single-type accordion keeps at most one section open. Triggers are the
//! [`ElementKind::AccordionTrigger`] elements nested inside
//! [`ElementKind::AccordionItem`] elements of the mounted root.
//!
//! # Keyboard
//!
//! | Key | Action |
//! |-----|--------|
//! | Enter, Space | Toggle the focused section |
//! | Up, Down | Focus the previous/next trigger, wrapping |
//! | Home, End | Focus the first/last trigger |

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use grail_core::logging::targets;
use grail_core::{ConnectionId, IdGenerator, Store};
use parking_lot::Mutex;

use super::{
    AriaRole, AttrPairs, PairsBuilder, RovingFocus, ValueChangeCallback, content_id, trigger_id,
};
use crate::collections::{SelectionModel, SelectionModelConfig};
use crate::dom::{Document, ElementId, ElementKind};
use crate::error::Result;
use crate::event::{ClickEvent, KeyPressEvent};
use crate::key_manager::ListKeyManagerConfig;

/// Whether one or several sections may be open at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccordionType {
    /// At most one section is open.
    #[default]
    Single,
    /// Any number of sections may be open.
    Multiple,
}

/// Open state of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccordionItemState {
    /// The section is expanded.
    Open,
    /// The section is collapsed.
    Closed,
}

impl AccordionItemState {
    fn from_open(open: bool) -> Self {
        if open { Self::Open } else { Self::Closed }
    }

    /// The `data-state` value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

/// Configuration for an [`Accordion`].
#[derive(Clone, Default)]
pub struct AccordionConfig {
    /// Single or multiple expansion.
    pub kind: AccordionType,
    /// Disables every section.
    pub disabled: bool,
    /// Sections expanded initially. A single accordion keeps only the first.
    pub default_value: Vec<String>,
    /// Called with the expanded values while mounted: once on mount, then
    /// after every change.
    pub on_value_change: Option<ValueChangeCallback>,
}

impl AccordionConfig {
    /// A single-expansion accordion.
    pub fn single() -> Self {
        Self::default()
    }

    /// A multiple-expansion accordion.
    pub fn multiple() -> Self {
        Self {
            kind: AccordionType::Multiple,
            ..Self::default()
        }
    }

    /// Disable every section.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set the initially expanded sections.
    pub fn with_default_value<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_value = values.into_iter().map(Into::into).collect();
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

impl fmt::Debug for AccordionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccordionConfig")
            .field("kind", &self.kind)
            .field("disabled", &self.disabled)
            .field("default_value", &self.default_value)
            .field("on_value_change", &self.on_value_change.is_some())
            .finish()
    }
}

/// Identifies a section when computing attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccordionItemParams {
    /// The section value.
    pub value: String,
    /// Disables this section only.
    pub disabled: bool,
}

impl AccordionItemParams {
    /// Parameters for an enabled section.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            disabled: false,
        }
    }

    /// Set whether the section is disabled.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

impl From<&str> for AccordionItemParams {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AccordionItemParams {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Attributes for a section wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccordionItemAttrs {
    /// The section value.
    pub value: String,
    /// Open state.
    pub state: AccordionItemState,
    /// Whether the section is disabled.
    pub disabled: bool,
}

impl AccordionItemAttrs {
    /// Attribute pairs for hosts that bind strings.
    pub fn to_pairs(&self) -> AttrPairs {
        PairsBuilder::new()
            .attr("data-accordion-item", &self.value)
            .attr("data-state", self.state.as_str())
            .attr("data-value", &self.value)
            .flag("data-disabled", self.disabled)
            .opt("disabled", self.disabled.then_some("true"))
            .build()
    }
}

/// Attributes for a section trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccordionTriggerAttrs {
    /// The section value.
    pub value: String,
    /// Open state.
    pub state: AccordionItemState,
    /// The trigger's DOM id.
    pub id: String,
    /// The DOM id of the content it controls.
    pub aria_controls: String,
    /// Whether the content is expanded.
    pub aria_expanded: bool,
    /// Whether the trigger is disabled.
    pub disabled: bool,
}

impl AccordionTriggerAttrs {
    /// Attribute pairs for hosts that bind strings.
    pub fn to_pairs(&self) -> AttrPairs {
        PairsBuilder::new()
            .attr("data-accordion-trigger", &self.value)
            .attr("data-state", self.state.as_str())
            .attr("data-value", &self.value)
            .attr("id", &self.id)
            .attr("aria-controls", &self.aria_controls)
            .attr("aria-expanded", self.aria_expanded.to_string())
            .flag("data-disabled", self.disabled)
            .opt("disabled", self.disabled.then_some("true"))
            .build()
    }
}

/// Attributes for a section's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccordionContentAttrs {
    /// The section value.
    pub value: String,
    /// Open state.
    pub state: AccordionItemState,
    /// Always [`AriaRole::Region`].
    pub role: AriaRole,
    /// The content's DOM id.
    pub id: String,
    /// The DOM id of the trigger labelling it.
    pub aria_labelledby: String,
    /// Whether the section is disabled.
    pub disabled: bool,
    /// Whether the content is inert (closed).
    pub inert: bool,
}

impl AccordionContentAttrs {
    /// Attribute pairs for hosts that bind strings.
    pub fn to_pairs(&self) -> AttrPairs {
        PairsBuilder::new()
            .attr("data-accordion-content", &self.value)
            .attr("data-state", self.state.as_str())
            .attr("data-value", &self.value)
            .attr("role", self.role.as_str())
            .attr("id", &self.id)
            .attr("aria-labelledby", &self.aria_labelledby)
            .flag("data-disabled", self.disabled)
            .opt("inert", self.inert.then_some("true"))
            .build()
    }
}

struct Mounted {
    focus: RovingFocus,
    value_connection: Option<ConnectionId>,
}

/// Accordion behavior.
pub struct Accordion {
    document: Arc<Document>,
    base_id: String,
    kind: AccordionType,
    disabled: Arc<AtomicBool>,
    selection: Mutex<SelectionModel<String>>,
    expanded: Store<Vec<String>>,
    on_value_change: Option<ValueChangeCallback>,
    mounted: Mutex<Option<Arc<Mounted>>>,
}

impl Accordion {
    /// Create a detached accordion.
    pub fn new(document: Arc<Document>, ids: &IdGenerator, config: AccordionConfig) -> Self {
        let selection_config = match config.kind {
            AccordionType::Single => SelectionModelConfig::single(),
            AccordionType::Multiple => SelectionModelConfig::multiple(),
        }
        .with_initially_selected(config.default_value);
        let selection = SelectionModel::new(selection_config);
        let expanded = Store::new(selection.selected().to_vec());

        Self {
            document,
            base_id: ids.next("accordion"),
            kind: config.kind,
            disabled: Arc::new(AtomicBool::new(config.disabled)),
            selection: Mutex::new(selection),
            expanded,
            on_value_change: config.on_value_change,
            mounted: Mutex::new(None),
        }
    }

    /// The id prefix of this accordion's elements.
    pub fn base_id(&self) -> &str {
        &self.base_id
    }

    /// Single or multiple expansion.
    pub fn kind(&self) -> AccordionType {
        self.kind
    }

    /// Whether every section is disabled.
    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::Acquire)
    }

    /// Disable or enable every section.
    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.store(disabled, Ordering::Release);
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Bind to the subtree rooted at `root`.
    ///
    /// Mounting again rebinds to the new root.
    pub fn mount(&self, root: ElementId) {
        self.destroy();

        let config = ListKeyManagerConfig::new()
            .with_home_and_end(true)
            .with_wrap(true);
        let disabled = self.disabled.clone();
        let focus = RovingFocus::new(&self.document, root, config, move |_, _| {
            disabled.load(Ordering::Acquire)
        });
        let value_connection = self.on_value_change.clone().map(|callback| {
            self.expanded
                .subscribe(move |values: &Vec<String>| callback(values.as_slice()))
        });

        *self.mounted.lock() = Some(Arc::new(Mounted {
            focus,
            value_connection,
        }));
        tracing::debug!(target: targets::WIDGETS, base_id = %self.base_id, "accordion mounted");
    }

    /// Unbind from the document. Safe to call when not mounted.
    pub fn destroy(&self) {
        let Some(mounted) = self.mounted.lock().take() else {
            return;
        };
        mounted.focus.destroy();
        if let Some(id) = mounted.value_connection {
            self.expanded.unsubscribe(id);
        }
        tracing::debug!(target: targets::WIDGETS, base_id = %self.base_id, "accordion destroyed");
    }

    /// Returns true while bound to a document subtree.
    pub fn is_mounted(&self) -> bool {
        self.mounted.lock().is_some()
    }

    fn mounted(&self) -> Option<Arc<Mounted>> {
        self.mounted.lock().clone()
    }

    // =========================================================================
    // Expansion
    // =========================================================================

    /// Store of the expanded values, in expansion order.
    pub fn expanded_store(&self) -> &Store<Vec<String>> {
        &self.expanded
    }

    /// The expanded values.
    pub fn expanded(&self) -> Vec<String> {
        self.expanded.get()
    }

    /// Returns true if the section is expanded.
    pub fn is_expanded(&self, value: &str) -> bool {
        self.expanded.with(|values| values.iter().any(|v| v == value))
    }

    fn update_selection<R>(&self, f: impl FnOnce(&mut SelectionModel<String>) -> R) -> R {
        let (result, selected) = {
            let mut selection = self.selection.lock();
            let result = f(&mut selection);
            (result, selection.selected().to_vec())
        };
        self.expanded.set(selected);
        result
    }

    /// Toggle a section.
    pub fn toggle(&self, value: impl Into<String>) {
        let value = value.into();
        self.update_selection(|selection| selection.toggle(value));
    }

    /// Expand sections.
    ///
    /// A single accordion rejects more than one value.
    pub fn expand(&self, values: &[String]) -> Result<()> {
        self.update_selection(|selection| selection.select(values))?;
        Ok(())
    }

    /// Collapse sections.
    pub fn collapse(&self, values: &[String]) -> Result<()> {
        self.update_selection(|selection| selection.deselect(values))?;
        Ok(())
    }

    /// Toggle every enabled trigger in the mounted subtree.
    ///
    /// Does nothing while unmounted.
    pub fn expand_all(&self) {
        let Some(mounted) = self.mounted() else {
            return;
        };
        for trigger in self.triggers(mounted.focus.root()) {
            self.toggle_trigger(trigger);
        }
    }

    /// Collapse every section.
    pub fn collapse_all(&self) {
        self.update_selection(|selection| selection.clear());
    }

    // =========================================================================
    // Events
    // =========================================================================

    fn triggers(&self, root: ElementId) -> Vec<ElementId> {
        self.document
            .descendants_of_kind(root, ElementKind::AccordionItem)
            .into_iter()
            .flat_map(|item| {
                self.document
                    .descendants_of_kind(item, ElementKind::AccordionTrigger)
            })
            .collect()
    }

    fn toggle_trigger(&self, trigger: ElementId) {
        if self.is_disabled() || self.document.is_disabled(trigger) {
            return;
        }
        if let Some(value) = self.document.value(trigger) {
            self.toggle(value);
        }
    }

    /// Handle a key press inside the mounted subtree.
    pub fn handle_keydown(&self, event: &mut KeyPressEvent) {
        let (Some(mounted), Some(target)) = (self.mounted(), event.target) else {
            return;
        };
        let collection = self.triggers(mounted.focus.root());
        if !collection.contains(&target) {
            return;
        }

        if event.key.is_activation() {
            event.base.accept();
            self.toggle_trigger(target);
            return;
        }

        mounted.focus.navigate(collection, target, event);
    }

    /// Handle a click inside the mounted subtree.
    pub fn handle_click(&self, event: &mut ClickEvent) {
        let Some(mounted) = self.mounted() else {
            return;
        };
        if self
            .triggers(mounted.focus.root())
            .contains(&event.target)
        {
            self.toggle_trigger(event.target);
        }
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    fn resolve(&self, params: AccordionItemParams) -> (String, bool, AccordionItemState) {
        let disabled = self.is_disabled() || params.disabled;
        let state = AccordionItemState::from_open(self.is_expanded(&params.value));
        (params.value, disabled, state)
    }

    /// Attributes for a section wrapper.
    pub fn item_attrs(&self, params: impl Into<AccordionItemParams>) -> AccordionItemAttrs {
        let (value, disabled, state) = self.resolve(params.into());
        AccordionItemAttrs {
            value,
            state,
            disabled,
        }
    }

    /// Attributes for a section trigger.
    pub fn trigger_attrs(&self, params: impl Into<AccordionItemParams>) -> AccordionTriggerAttrs {
        let (value, disabled, state) = self.resolve(params.into());
        AccordionTriggerAttrs {
            id: trigger_id(&self.base_id, &value),
            aria_controls: content_id(&self.base_id, &value),
            aria_expanded: state == AccordionItemState::Open,
            value,
            state,
            disabled,
        }
    }

    /// Attributes for a section's content.
    pub fn content_attrs(&self, params: impl Into<AccordionItemParams>) -> AccordionContentAttrs {
        let (value, disabled, state) = self.resolve(params.into());
        AccordionContentAttrs {
            role: AriaRole::Region,
            id: content_id(&self.base_id, &value),
            aria_labelledby: trigger_id(&self.base_id, &value),
            inert: state == AccordionItemState::Closed,
            value,
            state,
            disabled,
        }
    }
}

impl fmt::Debug for Accordion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accordion")
            .field("base_id", &self.base_id)
            .field("kind", &self.kind)
            .field("expanded", &self.expanded.get())
            .field("mounted", &self.is_mounted())
            .finish()
    }
}
