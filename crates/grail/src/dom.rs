//! A minimal live element tree for widget behaviors to operate on.
//!
//! The host mirrors the parts of its view tree that widgets care about into a
//! [`Document`]: an arena of elements addressed by [`ElementId`] handles.
//! Handles are compared by equality, which stands in for DOM node identity;
//! a handle stays valid until its element is removed.
//!
//! Each element carries the small amount of typed data the behaviors read
//! (what kind of widget part it is, its value, label and disabled state) and
//! the document tracks which element has focus.
//!
//! # Example
//!
//! ```
//! use grail::dom::{Document, ElementKind};
//!
//! let doc = Document::new();
//! let root = doc.create_element(ElementKind::Generic, None);
//! let item = doc.create_element(ElementKind::MenuItem, Some(root));
//! doc.set_label(item, "Copy");
//!
//! assert_eq!(doc.descendants_of_kind(root, ElementKind::MenuItem), vec![item]);
//! ```

use std::fmt;

use parking_lot::RwLock;
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// A stable handle to an element in a [`Document`].
    pub struct ElementId;
}

/// Which widget part an element plays.
///
/// This replaces the marker attributes a DOM implementation would query for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ElementKind {
    /// An element with no widget role.
    #[default]
    Generic,
    /// An accordion item wrapper.
    AccordionItem,
    /// The button that toggles an accordion item.
    AccordionTrigger,
    /// The button that selects a tab.
    TabsTrigger,
    /// A toggle-group button.
    ToggleGroupItem,
    /// The button that opens a menu.
    MenuTrigger,
    /// An item inside an open menu.
    MenuItem,
    /// The text field of a number input.
    NumberInputField,
    /// The button that steps a number input up.
    NumberInputIncrement,
    /// The button that steps a number input down.
    NumberInputDecrement,
}

/// Element data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Parent element, `None` for roots.
    pub parent: Option<ElementId>,
    /// Children in document order.
    pub children: Vec<ElementId>,
    /// The widget part this element plays.
    pub kind: ElementKind,
    /// The widget value associated with the element.
    pub value: Option<String>,
    /// Text used for typeahead matching.
    pub label: Option<String>,
    /// The element's DOM id.
    pub dom_id: Option<String>,
    /// Whether the element is disabled.
    pub disabled: bool,
}

#[derive(Default)]
struct DocumentState {
    elements: SlotMap<ElementId, Element>,
    focused: Option<ElementId>,
}

/// An arena of elements with document focus.
///
/// All methods take `&self`; share a document between widgets with `Arc`.
/// Mutating methods on unknown handles are no-ops, and queries on unknown
/// handles return empty results.
pub struct Document {
    state: RwLock<DocumentState>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(DocumentState::default()),
        }
    }

    /// Create an element, appended as the last child of `parent`.
    pub fn create_element(&self, kind: ElementKind, parent: Option<ElementId>) -> ElementId {
        let mut state = self.state.write();
        let parent = parent.filter(|p| state.elements.contains_key(*p));
        let id = state.elements.insert(Element {
            parent,
            kind,
            ..Element::default()
        });
        if let Some(parent) = parent {
            state.elements[parent].children.push(id);
        }
        id
    }

    /// Create an element as a child of `parent` and insert it at `index`
    /// among its siblings.
    pub fn insert_element(&self, kind: ElementKind, parent: ElementId, index: usize) -> ElementId {
        let id = self.create_element(kind, Some(parent));
        let mut state = self.state.write();
        if let Some(element) = state.elements.get_mut(parent) {
            element.children.retain(|child| *child != id);
            let index = index.min(element.children.len());
            element.children.insert(index, id);
        }
        id
    }

    /// Remove an element and its whole subtree.
    ///
    /// Focus is cleared if it was inside the removed subtree.
    pub fn remove(&self, id: ElementId) {
        let mut state = self.state.write();
        let Some(parent) = state.elements.get(id).map(|e| e.parent) else {
            return;
        };
        if let Some(parent) = parent.and_then(|p| state.elements.get_mut(p)) {
            parent.children.retain(|child| *child != id);
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(element) = state.elements.remove(current) {
                stack.extend(element.children);
            }
            if state.focused == Some(current) {
                state.focused = None;
            }
        }
    }

    /// Returns true if the element exists.
    pub fn contains(&self, id: ElementId) -> bool {
        self.state.read().elements.contains_key(id)
    }

    /// A snapshot of an element's data.
    pub fn element(&self, id: ElementId) -> Option<Element> {
        self.state.read().elements.get(id).cloned()
    }

    /// Read an element through a closure without cloning.
    pub fn with_element<F, R>(&self, id: ElementId, f: F) -> Option<R>
    where
        F: FnOnce(&Element) -> R,
    {
        self.state.read().elements.get(id).map(f)
    }

    fn modify(&self, id: ElementId, f: impl FnOnce(&mut Element)) {
        if let Some(element) = self.state.write().elements.get_mut(id) {
            f(element);
        }
    }

    // =========================================================================
    // Element data
    // =========================================================================

    /// Set the element's widget value.
    pub fn set_value(&self, id: ElementId, value: impl Into<String>) {
        let value = value.into();
        self.modify(id, |e| e.value = Some(value));
    }

    /// Set the element's typeahead label.
    pub fn set_label(&self, id: ElementId, label: impl Into<String>) {
        let label = label.into();
        self.modify(id, |e| e.label = Some(label));
    }

    /// Set the element's DOM id.
    pub fn set_dom_id(&self, id: ElementId, dom_id: impl Into<String>) {
        let dom_id = dom_id.into();
        self.modify(id, |e| e.dom_id = Some(dom_id));
    }

    /// Set whether the element is disabled.
    pub fn set_disabled(&self, id: ElementId, disabled: bool) {
        self.modify(id, |e| e.disabled = disabled);
    }

    /// The element's kind, if it exists.
    pub fn kind(&self, id: ElementId) -> Option<ElementKind> {
        self.with_element(id, |e| e.kind)
    }

    /// The element's value.
    pub fn value(&self, id: ElementId) -> Option<String> {
        self.with_element(id, |e| e.value.clone()).flatten()
    }

    /// The element's label.
    pub fn label(&self, id: ElementId) -> Option<String> {
        self.with_element(id, |e| e.label.clone()).flatten()
    }

    /// Whether the element is disabled. Unknown elements count as disabled.
    pub fn is_disabled(&self, id: ElementId) -> bool {
        self.with_element(id, |e| e.disabled).unwrap_or(true)
    }

    // =========================================================================
    // Tree queries
    // =========================================================================

    /// All descendants of `root` (excluding `root`) in document order.
    pub fn descendants(&self, root: ElementId) -> Vec<ElementId> {
        let state = self.state.read();
        let mut result = Vec::new();
        let Some(element) = state.elements.get(root) else {
            return result;
        };

        let mut stack: Vec<ElementId> = element.children.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            result.push(current);
            if let Some(element) = state.elements.get(current) {
                stack.extend(element.children.iter().rev().copied());
            }
        }
        result
    }

    /// Descendants of `root` of the given kind, in document order.
    pub fn descendants_of_kind(&self, root: ElementId, kind: ElementKind) -> Vec<ElementId> {
        self.descendants(root)
            .into_iter()
            .filter(|id| self.kind(*id) == Some(kind))
            .collect()
    }

    /// The closest element of the given kind, starting at `id` and walking up.
    pub fn closest_of_kind(&self, id: ElementId, kind: ElementKind) -> Option<ElementId> {
        let state = self.state.read();
        let mut current = Some(id);
        while let Some(candidate) = current {
            let element = state.elements.get(candidate)?;
            if element.kind == kind {
                return Some(candidate);
            }
            current = element.parent;
        }
        None
    }

    /// Returns true if `id` is `ancestor` or lies inside it.
    pub fn is_within(&self, id: ElementId, ancestor: ElementId) -> bool {
        let state = self.state.read();
        let mut current = Some(id);
        while let Some(candidate) = current {
            if candidate == ancestor {
                return true;
            }
            current = state.elements.get(candidate).and_then(|e| e.parent);
        }
        false
    }

    /// Find an element by DOM id.
    pub fn find_by_dom_id(&self, dom_id: &str) -> Option<ElementId> {
        self.state
            .read()
            .elements
            .iter()
            .find(|(_, e)| e.dom_id.as_deref() == Some(dom_id))
            .map(|(id, _)| id)
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Move focus to an element. Unknown elements are ignored.
    pub fn focus(&self, id: ElementId) {
        let mut state = self.state.write();
        if state.elements.contains_key(id) {
            state.focused = Some(id);
        }
    }

    /// Clear focus if `id` has it.
    pub fn blur(&self, id: ElementId) {
        let mut state = self.state.write();
        if state.focused == Some(id) {
            state.focused = None;
        }
    }

    /// The focused element.
    pub fn focused(&self) -> Option<ElementId> {
        self.state.read().focused
    }

    /// The number of elements in the document.
    pub fn len(&self) -> usize {
        self.state.read().elements.len()
    }

    /// Returns true if the document has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Document")
            .field("elements", &state.elements.len())
            .field("focused", &state.focused)
            .finish()
    }
}

static_assertions::assert_impl_all!(Document: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_order() {
        let doc = Document::new();
        let root = doc.create_element(ElementKind::Generic, None);
        let a = doc.create_element(ElementKind::Generic, Some(root));
        let a1 = doc.create_element(ElementKind::Generic, Some(a));
        let b = doc.create_element(ElementKind::Generic, Some(root));
        let zero = doc.insert_element(ElementKind::Generic, root, 0);

        assert_eq!(doc.descendants(root), vec![zero, a, a1, b]);
    }

    #[test]
    fn test_remove_subtree_clears_focus() {
        let doc = Document::new();
        let root = doc.create_element(ElementKind::Generic, None);
        let a = doc.create_element(ElementKind::Generic, Some(root));
        let a1 = doc.create_element(ElementKind::MenuItem, Some(a));

        doc.focus(a1);
        doc.remove(a);

        assert!(!doc.contains(a1));
        assert_eq!(doc.focused(), None);
        assert!(doc.descendants(root).is_empty());
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_closest_and_within() {
        let doc = Document::new();
        let root = doc.create_element(ElementKind::Generic, None);
        let item = doc.create_element(ElementKind::MenuItem, Some(root));
        let icon = doc.create_element(ElementKind::Generic, Some(item));

        assert_eq!(doc.closest_of_kind(icon, ElementKind::MenuItem), Some(item));
        assert_eq!(doc.closest_of_kind(root, ElementKind::MenuItem), None);
        assert!(doc.is_within(icon, root));
        assert!(!doc.is_within(root, icon));
    }

    #[test]
    fn test_element_data() {
        let doc = Document::new();
        let el = doc.create_element(ElementKind::TabsTrigger, None);
        doc.set_value(el, "one");
        doc.set_label(el, "One");
        doc.set_dom_id(el, "tabs_1-trigger-one");
        doc.set_disabled(el, true);

        assert_eq!(doc.value(el).as_deref(), Some("one"));
        assert_eq!(doc.label(el).as_deref(), Some("One"));
        assert!(doc.is_disabled(el));
        assert_eq!(doc.find_by_dom_id("tabs_1-trigger-one"), Some(el));
    }
}
