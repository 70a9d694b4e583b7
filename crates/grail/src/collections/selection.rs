//! Selection model for composite widgets.
//!
//! This module provides [`SelectionModel`], which tracks the set of selected
//! values for widgets such as accordions (expanded items) and toggle groups
//! (pressed items).
//!
//! # Example
//!
//! ```
//! use grail::collections::{SelectionModel, SelectionModelConfig};
//!
//! let mut selection = SelectionModel::new(SelectionModelConfig::multiple());
//!
//! // Listen for changes
//! selection.changed().connect(|change| {
//!     println!("Selection changed: +{} -{}", change.added.len(), change.removed.len());
//! });
//!
//! selection.select(&["a", "b"]).unwrap();
//! assert!(selection.is_selected(&"a"));
//! ```
//!
//! # Change Events
//!
//! Every top-level call (`select`, `deselect`, `toggle`, `clear`) publishes at
//! most one [`SelectionChange`], batching everything it added and removed.
//! Calls that change nothing publish nothing. Construction always publishes
//! one event carrying the initial values, which subscribers receive as the
//! store's current value.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use grail_core::Store;
use grail_core::logging::targets;

use crate::error::SelectionError;

/// Event published when the value of a [`SelectionModel`] has changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChange<T> {
    /// The selection after the change, in selection order.
    pub selection: Vec<T>,
    /// Values that were added by the change.
    pub added: Vec<T>,
    /// Values that were removed by the change.
    pub removed: Vec<T>,
}

impl<T> Default for SelectionChange<T> {
    fn default() -> Self {
        Self {
            selection: Vec::new(),
            added: Vec::new(),
            removed: Vec::new(),
        }
    }
}

/// Configuration for a [`SelectionModel`].
#[derive(Debug, Clone)]
pub struct SelectionModelConfig<T> {
    /// Whether multiple values can be selected.
    pub multiple: bool,
    /// Initially selected values. Only the first is used in single mode.
    pub initially_selected: Vec<T>,
}

impl<T> Default for SelectionModelConfig<T> {
    fn default() -> Self {
        Self {
            multiple: false,
            initially_selected: Vec::new(),
        }
    }
}

impl<T> SelectionModelConfig<T> {
    /// Single-selection configuration.
    pub fn single() -> Self {
        Self::default()
    }

    /// Multiple-selection configuration.
    pub fn multiple() -> Self {
        Self {
            multiple: true,
            ..Self::default()
        }
    }

    /// Sets the initially selected values.
    pub fn with_initially_selected(mut self, values: impl IntoIterator<Item = T>) -> Self {
        self.initially_selected = values.into_iter().collect();
        self
    }
}

/// Tracks a set of selected values with single or multiple cardinality.
///
/// Values are unique by equality. The selection is kept in selection order;
/// [`sort`](Self::sort) reorders the view returned by
/// [`selected`](Self::selected) until the next change.
pub struct SelectionModel<T> {
    /// Whether multiple values can be selected.
    multiple: bool,

    /// Set of selected values for O(1) lookup.
    selected_set: HashSet<T>,

    /// Selected values in selection order.
    selected_order: Vec<T>,

    /// Sorted view installed by `sort`, dropped on the next change.
    sorted: Option<Vec<T>>,

    /// Values added since the last published change.
    selected_to_emit: Vec<T>,

    /// Values removed since the last published change.
    deselected_to_emit: Vec<T>,

    /// The last published change.
    changed: Store<SelectionChange<T>>,
}

impl<T> SelectionModel<T>
where
    T: Clone + Eq + Hash + Send + Sync + 'static,
{
    /// Creates a selection model and publishes its initial change event.
    pub fn new(config: SelectionModelConfig<T>) -> Self {
        let SelectionModelConfig {
            multiple,
            initially_selected,
        } = config;

        let mut model = Self {
            multiple,
            selected_set: HashSet::new(),
            selected_order: Vec::new(),
            sorted: None,
            selected_to_emit: Vec::new(),
            deselected_to_emit: Vec::new(),
            changed: Store::new(SelectionChange::default()),
        };

        if multiple {
            for value in initially_selected {
                model.mark_selected(value);
            }
        } else if let Some(value) = initially_selected.into_iter().next() {
            model.mark_selected(value);
        }

        model.emit_change_event(true);
        model
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The change store. Subscribing yields the last published change first.
    pub fn changed(&self) -> &Store<SelectionChange<T>> {
        &self.changed
    }

    /// Selected values, in selection order or in the order of the last `sort`.
    pub fn selected(&self) -> &[T] {
        self.sorted.as_deref().unwrap_or(&self.selected_order)
    }

    /// Checks if a value is selected.
    pub fn is_selected(&self, value: &T) -> bool {
        self.selected_set.contains(value)
    }

    /// Returns true if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected_set.is_empty()
    }

    /// Returns true if any value is selected.
    pub fn has_value(&self) -> bool {
        !self.is_empty()
    }

    /// Returns the number of selected values.
    pub fn len(&self) -> usize {
        self.selected_set.len()
    }

    /// Gets whether multiple values can be selected.
    pub fn is_multiple_selection(&self) -> bool {
        self.multiple
    }

    // =========================================================================
    // Selection Operations
    // =========================================================================

    /// Selects one or more values.
    ///
    /// In single-selection mode, passing more than one value fails and leaves
    /// the selection untouched; selecting a new value deselects the previous
    /// one.
    pub fn select(&mut self, values: &[T]) -> Result<(), SelectionError> {
        self.verify_value_assignment(values)?;
        for value in values {
            self.mark_selected(value.clone());
        }
        self.emit_change_event(false);
        Ok(())
    }

    /// Deselects one or more values.
    pub fn deselect(&mut self, values: &[T]) -> Result<(), SelectionError> {
        self.verify_value_assignment(values)?;
        for value in values {
            self.unmark_selected(value);
        }
        self.emit_change_event(false);
        Ok(())
    }

    /// Toggles a value between selected and deselected.
    pub fn toggle(&mut self, value: T) {
        if self.is_selected(&value) {
            self.unmark_selected(&value);
        } else {
            self.mark_selected(value);
        }
        self.emit_change_event(false);
    }

    /// Clears all of the selected values.
    pub fn clear(&mut self) {
        self.unmark_all();
        self.emit_change_event(false);
    }

    /// Sorts the selected values with a comparator.
    ///
    /// Only applies in multiple-selection mode.
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        if self.multiple {
            let mut sorted = self.selected().to_vec();
            sorted.sort_by(compare);
            self.sorted = Some(sorted);
        }
    }

    /// Sorts the selected values by their natural order.
    ///
    /// Only applies in multiple-selection mode.
    pub fn sort(&mut self)
    where
        T: Ord,
    {
        self.sort_by(T::cmp);
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Publishes the pending change, if any, and invalidates the sorted view.
    fn emit_change_event(&mut self, initial: bool) {
        self.sorted = None;

        if initial || !self.selected_to_emit.is_empty() || !self.deselected_to_emit.is_empty() {
            let change = SelectionChange {
                selection: self.selected_order.clone(),
                added: std::mem::take(&mut self.selected_to_emit),
                removed: std::mem::take(&mut self.deselected_to_emit),
            };
            tracing::trace!(
                target: targets::SELECTION,
                added = change.added.len(),
                removed = change.removed.len(),
                "selection changed"
            );
            self.changed.publish(change);
        }
    }

    fn mark_selected(&mut self, value: T) {
        if self.is_selected(&value) {
            return;
        }
        if !self.multiple {
            self.unmark_all();
        }
        self.selected_set.insert(value.clone());
        self.selected_order.push(value.clone());
        self.selected_to_emit.push(value);
    }

    fn unmark_selected(&mut self, value: &T) {
        if self.selected_set.remove(value) {
            self.selected_order.retain(|selected| selected != value);
            self.deselected_to_emit.push(value.clone());
        }
    }

    fn unmark_all(&mut self) {
        self.selected_set.clear();
        let removed = std::mem::take(&mut self.selected_order);
        self.deselected_to_emit.extend(removed);
    }

    fn verify_value_assignment(&self, values: &[T]) -> Result<(), SelectionError> {
        if values.len() > 1 && !self.multiple {
            tracing::debug!(
                target: targets::SELECTION,
                count = values.len(),
                "rejected multiple values in single-selection mode"
            );
            return Err(SelectionError::MultipleValuesInSingleSelection {
                count: values.len(),
            });
        }
        Ok(())
    }
}

impl<T: fmt::Debug> fmt::Debug for SelectionModel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionModel")
            .field("multiple", &self.multiple)
            .field("selected", &self.selected_order)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Records every change published after subscription, skipping the
    /// current value delivered on subscribe.
    fn record_changes<T>(model: &SelectionModel<T>) -> Arc<Mutex<Vec<SelectionChange<T>>>>
    where
        T: Clone + Eq + Hash + Send + Sync + 'static,
    {
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();
        model.changed().connect(move |change| {
            events_clone.lock().push(change.clone());
        });
        events
    }

    mod single {
        use super::*;

        #[test]
        fn test_select_single_value() {
            let mut model = SelectionModel::new(SelectionModelConfig::single());
            model.select(&[1]).unwrap();

            assert_eq!(model.selected().len(), 1);
            assert!(model.is_selected(&1));
        }

        #[test]
        fn test_select_replaces_previous_value() {
            let mut model = SelectionModel::new(SelectionModelConfig::single());
            let events = record_changes(&model);

            model.select(&[1]).unwrap();
            model.select(&[2]).unwrap();

            assert!(!model.is_selected(&1));
            assert!(model.is_selected(&2));

            let events = events.lock();
            assert_eq!(events.len(), 2);
            assert_eq!(events[1].added, vec![2]);
            assert_eq!(events[1].removed, vec![1]);
        }

        #[test]
        fn test_multiple_values_rejected_without_side_effects() {
            let mut model = SelectionModel::new(SelectionModelConfig::single());
            model.select(&[1]).unwrap();
            let events = record_changes(&model);

            let err = model.select(&[2, 3]).unwrap_err();
            assert_eq!(err, SelectionError::MultipleValuesInSingleSelection { count: 2 });
            assert_eq!(model.selected(), &[1]);
            assert!(events.lock().is_empty());

            assert!(model.deselect(&[1, 2]).is_err());
            assert!(model.is_selected(&1));
        }

        #[test]
        fn test_only_first_initial_value_kept() {
            let model = SelectionModel::new(
                SelectionModelConfig::single().with_initially_selected([1, 2]),
            );

            assert_eq!(model.selected().len(), 1);
            assert!(model.is_selected(&1));
            assert!(!model.is_selected(&2));
        }

        #[test]
        fn test_cardinality_holds_across_operations() {
            let mut model = SelectionModel::new(SelectionModelConfig::single());
            let ops: [(&str, i32); 8] = [
                ("select", 1),
                ("toggle", 2),
                ("toggle", 3),
                ("select", 3),
                ("deselect", 3),
                ("toggle", 4),
                ("select", 1),
                ("toggle", 1),
            ];

            for (op, value) in ops {
                match op {
                    "select" => model.select(&[value]).unwrap(),
                    "deselect" => model.deselect(&[value]).unwrap(),
                    _ => model.toggle(value),
                }
                assert!(model.len() <= 1, "single selection grew after {op}({value})");
            }
        }

        #[test]
        fn test_sort_is_noop() {
            let mut model =
                SelectionModel::new(SelectionModelConfig::single().with_initially_selected([5]));
            model.sort();
            assert_eq!(model.selected(), &[5]);
        }
    }

    mod multiple {
        use super::*;

        #[test]
        fn test_select_values_one_by_one() {
            let mut model = SelectionModel::new(SelectionModelConfig::multiple());
            let events = record_changes(&model);

            model.select(&[1]).unwrap();
            model.select(&[2]).unwrap();

            assert_eq!(model.selected().len(), 2);
            assert!(model.is_selected(&1));
            assert!(model.is_selected(&2));
            assert_eq!(events.lock().len(), 2);
        }

        #[test]
        fn test_select_batch_emits_once() {
            let mut model = SelectionModel::new(SelectionModelConfig::multiple());
            let events = record_changes(&model);

            model.select(&["a", "b"]).unwrap();

            let events = events.lock();
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].added, vec!["a", "b"]);
            assert!(events[0].removed.is_empty());
        }

        #[test]
        fn test_reselect_emits_nothing() {
            let mut model = SelectionModel::new(SelectionModelConfig::multiple());
            model.select(&[1]).unwrap();
            let events = record_changes(&model);

            model.select(&[1]).unwrap();
            model.deselect(&[9]).unwrap();
            model.clear();
            model.clear();

            let events = events.lock();
            assert_eq!(events.len(), 1, "only the first clear changed anything");
            assert_eq!(events[0].removed, vec![1]);
        }

        #[test]
        fn test_partial_reselect_reports_only_new_values() {
            let mut model =
                SelectionModel::new(SelectionModelConfig::multiple().with_initially_selected([1]));
            let events = record_changes(&model);

            model.select(&[1, 2]).unwrap();

            let events = events.lock();
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].added, vec![2]);
        }

        #[test]
        fn test_sort_selected_values() {
            let mut model = SelectionModel::new(
                SelectionModelConfig::multiple().with_initially_selected([2, 3, 1]),
            );

            assert_eq!(model.selected(), &[2, 3, 1]);
            model.sort();
            assert_eq!(model.selected(), &[1, 2, 3]);

            model.sort_by(|a, b| b.cmp(a));
            assert_eq!(model.selected(), &[3, 2, 1]);
        }

        #[test]
        fn test_change_invalidates_sort() {
            let mut model = SelectionModel::new(
                SelectionModelConfig::multiple().with_initially_selected([2, 3, 1]),
            );

            model.sort();
            model.select(&[0]).unwrap();

            assert_eq!(model.selected(), &[2, 3, 1, 0]);
        }

        #[test]
        fn test_deselect_keeps_remaining_order() {
            let mut model = SelectionModel::new(
                SelectionModelConfig::multiple().with_initially_selected(["x", "y", "z"]),
            );

            model.deselect(&["y"]).unwrap();
            model.select(&["y"]).unwrap();

            assert_eq!(model.selected(), &["x", "z", "y"]);
        }
    }

    mod changed {
        use super::*;

        #[test]
        fn test_construction_publishes_initial_event() {
            let model = SelectionModel::new(
                SelectionModelConfig::multiple().with_initially_selected([1, 2]),
            );
            let seen = Arc::new(Mutex::new(Vec::new()));

            let seen_clone = seen.clone();
            model
                .changed()
                .subscribe(move |change| seen_clone.lock().push(change.clone()));

            let seen = seen.lock();
            assert_eq!(seen.len(), 1);
            assert_eq!(seen[0].added, vec![1, 2]);
            assert_eq!(seen[0].selection, vec![1, 2]);
        }

        #[test]
        fn test_event_carries_added_and_removed() {
            let mut model = SelectionModel::new(SelectionModelConfig::single());
            model.select(&[1]).unwrap();
            let events = record_changes(&model);

            model.select(&[2]).unwrap();

            let last = events.lock().last().cloned().unwrap();
            assert_eq!(last.removed, vec![1]);
            assert_eq!(last.added, vec![2]);
            assert_eq!(last.selection, vec![2]);
        }

        #[test]
        fn test_toggle_emits_per_call() {
            let mut model = SelectionModel::new(SelectionModelConfig::multiple());
            let events = record_changes(&model);

            model.toggle("a");
            model.toggle("a");

            let events = events.lock();
            assert_eq!(events.len(), 2);
            assert_eq!(events[0].added, vec!["a"]);
            assert_eq!(events[1].removed, vec!["a"]);
            assert!(model.is_empty());
            assert!(!model.has_value());
        }

        #[test]
        fn test_selection_updated_before_event() {
            let mut model = SelectionModel::new(SelectionModelConfig::multiple());
            let seen = Arc::new(Mutex::new(Vec::new()));

            let seen_clone = seen.clone();
            model
                .changed()
                .connect(move |change| seen_clone.lock().push(change.selection.clone()));
            model.select(&[1]).unwrap();

            assert_eq!(*seen.lock(), vec![vec![1]]);
        }
    }
}
