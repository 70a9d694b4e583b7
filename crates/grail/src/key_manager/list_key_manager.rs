//! Roving active-item tracking for keyboard-navigable lists.

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use grail_core::logging::targets;
use grail_core::{ConnectionId, PerfSpan, Store, TimerQueue};
use parking_lot::Mutex;

use super::typeahead::{DEFAULT_DEBOUNCE_INTERVAL, Typeahead};
use crate::event::{Key, KeyPressEvent};

/// Predicate marking items that navigation passes over.
pub type SkipPredicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// Resolves the text typeahead matches against.
pub type LabelResolver<T> = Box<dyn Fn(&T) -> Option<String> + Send + Sync>;

/// Callback run when focus leaves the list with Tab.
pub type TabOutCallback = Box<dyn Fn() + Send + Sync>;

/// Callback run when a new item becomes active.
pub type ActivateCallback<T> = Box<dyn Fn(&T) + Send + Sync>;

/// Reading direction for horizontal navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Right moves forward.
    #[default]
    Ltr,
    /// Left moves forward.
    Rtl,
}

/// Target for [`ListKeyManager::set_active_item`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveItem<T> {
    /// The item at this position in the current list.
    Index(usize),
    /// This item, looked up by equality in the current list.
    Item(T),
    /// No active item.
    None,
}

/// Configuration for a [`ListKeyManager`].
pub struct ListKeyManagerConfig<T> {
    /// Wrap around when navigating past either end.
    pub wrap: bool,
    /// Up and Down arrows navigate.
    pub vertical: bool,
    /// Left and Right arrows navigate, in the given reading direction.
    pub horizontal: Option<Direction>,
    /// Home and End jump to the first and last enabled items.
    pub home_and_end: bool,
    /// Printable characters search item labels.
    pub typeahead: bool,
    /// Timer queue driving the typeahead debounce.
    pub timers: Option<Arc<TimerQueue>>,
    /// Typeahead debounce interval.
    pub debounce_interval: Duration,
    /// Items for which this returns true are skipped.
    pub skip_predicate: Option<SkipPredicate<T>>,
    /// Label used for typeahead matching. Items without a label never match.
    pub label: Option<LabelResolver<T>>,
    /// Called when Tab is pressed.
    pub tab_out: Option<TabOutCallback>,
    /// Called when the active item changes to a new item.
    pub on_activate: Option<ActivateCallback<T>>,
}

impl<T> Default for ListKeyManagerConfig<T> {
    fn default() -> Self {
        Self {
            wrap: false,
            vertical: true,
            horizontal: None,
            home_and_end: false,
            typeahead: false,
            timers: None,
            debounce_interval: DEFAULT_DEBOUNCE_INTERVAL,
            skip_predicate: None,
            label: None,
            tab_out: None,
            on_activate: None,
        }
    }
}

impl<T> ListKeyManagerConfig<T> {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set wrap mode.
    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    /// Enable or disable vertical navigation.
    pub fn with_vertical(mut self, vertical: bool) -> Self {
        self.vertical = vertical;
        self
    }

    /// Enable horizontal navigation in the given direction.
    pub fn with_horizontal(mut self, direction: Option<Direction>) -> Self {
        self.horizontal = direction;
        self
    }

    /// Enable Home and End.
    pub fn with_home_and_end(mut self, enabled: bool) -> Self {
        self.home_and_end = enabled;
        self
    }

    /// Enable typeahead, debounced on `timers`.
    pub fn with_typeahead(mut self, timers: Arc<TimerQueue>) -> Self {
        self.typeahead = true;
        self.timers = Some(timers);
        self
    }

    /// Set the typeahead debounce interval.
    pub fn with_debounce_interval(mut self, interval: Duration) -> Self {
        self.debounce_interval = interval;
        self
    }

    /// Set the skip predicate.
    pub fn with_skip_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.skip_predicate = Some(Box::new(predicate));
        self
    }

    /// Set the typeahead label resolver.
    pub fn with_label<F>(mut self, label: F) -> Self
    where
        F: Fn(&T) -> Option<String> + Send + Sync + 'static,
    {
        self.label = Some(Box::new(label));
        self
    }

    /// Set the Tab callback.
    pub fn with_tab_out<F>(mut self, tab_out: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.tab_out = Some(Box::new(tab_out));
        self
    }

    /// Set the activation callback.
    pub fn with_on_activate<F>(mut self, on_activate: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.on_activate = Some(Box::new(on_activate));
        self
    }
}

impl<T> fmt::Debug for ListKeyManagerConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListKeyManagerConfig")
            .field("wrap", &self.wrap)
            .field("vertical", &self.vertical)
            .field("horizontal", &self.horizontal)
            .field("home_and_end", &self.home_and_end)
            .field("typeahead", &self.typeahead)
            .field("debounce_interval", &self.debounce_interval)
            .field("skip_predicate", &self.skip_predicate.is_some())
            .field("tab_out", &self.tab_out.is_some())
            .field("on_activate", &self.on_activate.is_some())
            .finish()
    }
}

struct ManagerInner<T> {
    items: Arc<Store<Vec<T>>>,
    active_item_index: Store<Option<usize>>,
    active_item: Store<Option<T>>,
    config: ListKeyManagerConfig<T>,
    typeahead: Option<Typeahead>,
    connections: Mutex<Option<(ConnectionId, Option<ConnectionId>)>>,
}

impl<T> ManagerInner<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn is_skipped(&self, item: &T) -> bool {
        self.config
            .skip_predicate
            .as_ref()
            .is_some_and(|skip| skip(item))
    }

    fn set_active_item(&self, target: ActiveItem<T>) {
        let (index, item) = self.items.with(|items| {
            let index = match target {
                ActiveItem::Index(index) => Some(index),
                ActiveItem::Item(item) => items.iter().position(|candidate| *candidate == item),
                ActiveItem::None => None,
            };
            match index.and_then(|index| items.get(index).cloned()) {
                Some(item) => (index, Some(item)),
                None => (None, None),
            }
        });

        if self.active_item.set(item.clone()) {
            tracing::trace!(target: targets::KEY_MANAGER, ?index, "active item changed");
            if let (Some(item), Some(on_activate)) = (&item, &self.config.on_activate) {
                on_activate(item);
            }
        }
        self.active_item_index.set(index);
    }

    /// Walk from `start` in steps of `delta` to the first item that is not
    /// skipped, giving up at either end of the list.
    fn first_enabled_from(&self, start: isize, delta: isize) -> Option<usize> {
        self.items.with(|items| {
            let mut index = start;
            while index >= 0 && (index as usize) < items.len() {
                if !self.is_skipped(&items[index as usize]) {
                    return Some(index as usize);
                }
                index += delta;
            }
            None
        })
    }

    fn set_active_item_by_index(&self, start: isize, delta: isize) {
        if let Some(index) = self.first_enabled_from(start, delta) {
            self.set_active_item(ActiveItem::Index(index));
        }
    }

    fn set_active_item_by_delta(&self, delta: isize) {
        let current = self.current_index();
        if self.config.wrap {
            let found = self.items.with(|items| {
                let len = items.len() as isize;
                (1..=len)
                    .map(|step| (current + delta * step).rem_euclid(len) as usize)
                    .find(|&index| !self.is_skipped(&items[index]))
            });
            match found {
                Some(index) => self.set_active_item(ActiveItem::Index(index)),
                None => {
                    tracing::trace!(target: targets::KEY_MANAGER, "no enabled item to wrap to");
                }
            }
        } else {
            self.set_active_item_by_index(current + delta, delta);
        }
    }

    fn current_index(&self) -> isize {
        self.active_item_index
            .get()
            .map_or(-1, |index| index as isize)
    }

    fn set_first_item_active(&self) {
        self.set_active_item_by_index(0, 1);
    }

    fn set_last_item_active(&self) {
        let last = self.items.with(|items| items.len() as isize) - 1;
        self.set_active_item_by_index(last, -1);
    }

    fn set_next_item_active(&self) {
        if self.active_item_index.get().is_none() {
            self.set_first_item_active();
        } else {
            self.set_active_item_by_delta(1);
        }
    }

    fn set_previous_item_active(&self) {
        if self.active_item_index.get().is_none() && self.config.wrap {
            self.set_last_item_active();
        } else {
            self.set_active_item_by_delta(-1);
        }
    }

    /// Keep the active index pointing at the active item after the list is
    /// replaced.
    fn reconcile(&self, items: &[T]) {
        let Some(active) = self.active_item.get() else {
            return;
        };
        match items.iter().position(|item| *item == active) {
            Some(index) => {
                self.active_item_index.set(Some(index));
            }
            None => {
                tracing::trace!(target: targets::KEY_MANAGER, "active item removed from list");
                self.active_item.set(None);
                self.active_item_index.set(None);
            }
        }
    }

    fn search(&self, token: &str) {
        if token.is_empty() {
            return;
        }
        let label = self.config.label.as_ref();
        let current = self.current_index();
        let found = self.items.with(|items| {
            let len = items.len() as isize;
            (1..=len)
                .map(|step| (current + step).rem_euclid(len) as usize)
                .find(|&index| {
                    let item = &items[index];
                    !self.is_skipped(item)
                        && label
                            .and_then(|label| label(item))
                            .is_some_and(|text| text.to_uppercase().trim().starts_with(token))
                })
        });

        if let Some(index) = found {
            tracing::trace!(target: targets::KEY_MANAGER, token, index, "typeahead match");
            self.set_active_item(ActiveItem::Index(index));
        }
    }
}

/// Tracks the active item of a list and moves it in response to keys.
///
/// The manager observes a shared `Store<Vec<T>>` of items, compared by
/// equality, and never writes to it. When the list is replaced the active
/// item is looked up again: if it moved only the index changes, and if it
/// disappeared both the index and the item are cleared.
///
/// Two stores expose the state: [`active_item_index`](Self::active_item_index)
/// notifies whenever the index differs, while
/// [`active_item`](Self::active_item) and the `on_activate` callback only fire
/// when a different item becomes active.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use grail::key_manager::{ListKeyManager, ListKeyManagerConfig};
/// use grail::event::{Key, KeyPressEvent};
/// use grail_core::Store;
///
/// let items = Arc::new(Store::new(vec!["a", "b", "c"]));
/// let manager = ListKeyManager::new(items, ListKeyManagerConfig::new().with_wrap(true));
///
/// let mut event = KeyPressEvent::new(Key::ArrowUp);
/// manager.on_keydown(&mut event);
///
/// assert!(event.is_handled());
/// assert_eq!(manager.current_active_item(), Some("c"));
/// ```
pub struct ListKeyManager<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    inner: Arc<ManagerInner<T>>,
}

impl<T> ListKeyManager<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create a manager over `items`.
    pub fn new(items: Arc<Store<Vec<T>>>, config: ListKeyManagerConfig<T>) -> Self {
        let typeahead = match (config.typeahead, &config.timers) {
            (true, Some(timers)) => Some(Typeahead::with_debounce_interval(
                timers.clone(),
                config.debounce_interval,
            )),
            (true, None) => {
                tracing::warn!(
                    target: targets::KEY_MANAGER,
                    "typeahead enabled without a timer queue, ignoring"
                );
                None
            }
            (false, _) => None,
        };

        let inner = Arc::new(ManagerInner {
            items,
            active_item_index: Store::new(None),
            active_item: Store::new(None),
            config,
            typeahead,
            connections: Mutex::new(None),
        });

        let weak: Weak<ManagerInner<T>> = Arc::downgrade(&inner);
        let items_connection = inner.items.connect(move |items| {
            if let Some(inner) = weak.upgrade() {
                inner.reconcile(items);
            }
        });

        let typeahead_connection = inner.typeahead.as_ref().map(|typeahead| {
            let weak = Arc::downgrade(&inner);
            typeahead.connect(move |token| {
                if let Some(inner) = weak.upgrade() {
                    inner.search(token);
                }
            })
        });

        *inner.connections.lock() = Some((items_connection, typeahead_connection));
        tracing::debug!(target: targets::KEY_MANAGER, config = ?inner.config, "list key manager created");

        Self { inner }
    }

    /// The managed items.
    pub fn items(&self) -> &Arc<Store<Vec<T>>> {
        &self.inner.items
    }

    /// Store of the active index. `None` means no item is active.
    pub fn active_item_index(&self) -> &Store<Option<usize>> {
        &self.inner.active_item_index
    }

    /// Store of the active item.
    pub fn active_item(&self) -> &Store<Option<T>> {
        &self.inner.active_item
    }

    /// The current active index.
    pub fn current_active_item_index(&self) -> Option<usize> {
        self.inner.active_item_index.get()
    }

    /// The current active item.
    pub fn current_active_item(&self) -> Option<T> {
        self.inner.active_item.get()
    }

    /// The typeahead buffer, when typeahead is enabled.
    pub fn typeahead(&self) -> Option<&Typeahead> {
        self.inner.typeahead.as_ref()
    }

    /// Set the active item by index or by item.
    ///
    /// An index outside the list, or an item not in it, clears the active
    /// item. Skip rules do not apply.
    pub fn set_active_item(&self, target: ActiveItem<T>) {
        self.inner.set_active_item(target);
    }

    /// Activate the first enabled item.
    pub fn set_first_item_active(&self) {
        self.inner.set_first_item_active();
    }

    /// Activate the last enabled item.
    pub fn set_last_item_active(&self) {
        self.inner.set_last_item_active();
    }

    /// Activate the next enabled item.
    pub fn set_next_item_active(&self) {
        self.inner.set_next_item_active();
    }

    /// Activate the previous enabled item.
    pub fn set_previous_item_active(&self) {
        self.inner.set_previous_item_active();
    }

    /// Move the active item according to a key press.
    ///
    /// Enabled navigation keys are accepted, even at a list boundary, and
    /// discard any buffered typeahead. Tab runs the `tab_out` callback and
    /// is left unaccepted so focus can move on. Printable characters feed
    /// the typeahead. Every other key is left unaccepted.
    pub fn on_keydown(&self, event: &mut KeyPressEvent) {
        let _span = PerfSpan::new("list_key_manager.on_keydown");
        let inner = &self.inner;
        let config = &inner.config;

        match event.key {
            Key::Tab => {
                if let Some(tab_out) = &config.tab_out {
                    tab_out();
                }
                return;
            }
            Key::ArrowDown if config.vertical => inner.set_next_item_active(),
            Key::ArrowUp if config.vertical => inner.set_previous_item_active(),
            Key::ArrowRight if config.horizontal.is_some() => {
                if config.horizontal == Some(Direction::Rtl) {
                    inner.set_previous_item_active();
                } else {
                    inner.set_next_item_active();
                }
            }
            Key::ArrowLeft if config.horizontal.is_some() => {
                if config.horizontal == Some(Direction::Rtl) {
                    inner.set_next_item_active();
                } else {
                    inner.set_previous_item_active();
                }
            }
            Key::Home if config.home_and_end => inner.set_first_item_active(),
            Key::End if config.home_and_end => inner.set_last_item_active(),
            key => {
                if let (Some(typeahead), Some(c)) = (&inner.typeahead, key.printable_char()) {
                    for upper in c.to_uppercase() {
                        typeahead.add(upper);
                    }
                }
                return;
            }
        }

        if let Some(typeahead) = &inner.typeahead {
            typeahead.reset();
        }
        event.base.accept();
    }

    /// Stop observing the item list and tear down the typeahead.
    ///
    /// Safe to call more than once. Also runs on drop.
    pub fn destroy(&self) {
        let Some((items_connection, typeahead_connection)) = self.inner.connections.lock().take()
        else {
            return;
        };
        self.inner.items.unsubscribe(items_connection);
        if let Some(typeahead) = &self.inner.typeahead {
            if let Some(id) = typeahead_connection {
                typeahead.disconnect(id);
            }
            typeahead.destroy();
        }
        tracing::debug!(target: targets::KEY_MANAGER, "list key manager destroyed");
    }

    /// Returns true once [`destroy`](Self::destroy) has run.
    pub fn is_destroyed(&self) -> bool {
        self.inner.connections.lock().is_none()
    }
}

impl<T> Drop for ListKeyManager<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<T> fmt::Debug for ListKeyManager<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListKeyManager")
            .field("active_item_index", &self.current_active_item_index())
            .field("config", &self.inner.config)
            .finish()
    }
}

static_assertions::assert_impl_all!(ListKeyManager<u32>: Send, Sync);
