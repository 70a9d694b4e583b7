//! Pagination behavior: page buttons for a paged collection.
//!
//! The page list always shows `boundary_count` pages at each end and
//! `sibling_count` pages on either side of the current page. Gaps between
//! those runs collapse into an ellipsis, except that a gap of a single page
//! shows the page itself.
//!
//! ```
//! use grail::widgets::{Pagination, PaginationConfig};
//!
//! let pagination = Pagination::new(PaginationConfig::new().with_total(33).with_page(2));
//! let pages: Vec<_> = pagination.items().iter().filter_map(|item| item.page).collect();
//! assert_eq!(pages, vec![1, 1, 2, 3, 4, 3]);
//! assert_eq!((pagination.start(), pagination.end()), (11, 20));
//! ```

use std::fmt;
use std::sync::Arc;

use grail_core::Store;
use grail_core::logging::targets;

use super::{AriaRole, AttrPairs, PairsBuilder};

/// Callback receiving the new page.
pub type PageChangeCallback = Arc<dyn Fn(usize) + Send + Sync>;

/// Computes the accessible name of a page button from the page and whether
/// it is the current page.
pub type PageAriaLabel = Arc<dyn Fn(usize, bool) -> String + Send + Sync>;

/// Configuration for [`Pagination`].
#[derive(Clone)]
pub struct PaginationConfig {
    /// Pages always shown at the start and at the end.
    pub boundary_count: usize,
    /// Pages shown on each side of the current page.
    pub sibling_count: usize,
    /// Total number of items across all pages.
    pub total: usize,
    /// Items per page.
    pub per_page: usize,
    /// The initial page, starting at 1.
    pub page: usize,
    /// Hide the first-page button.
    pub hide_first_button: bool,
    /// Hide the previous-page button.
    pub hide_prev_button: bool,
    /// Hide the next-page button.
    pub hide_next_button: bool,
    /// Hide the last-page button.
    pub hide_last_button: bool,
    /// Accessible name of the navigation landmark.
    pub aria_label: String,
    /// Accessible name of each page button.
    pub page_aria_label: PageAriaLabel,
    /// Called when the page changes.
    pub on_page_change: Option<PageChangeCallback>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            boundary_count: 1,
            sibling_count: 1,
            total: 0,
            per_page: 10,
            page: 1,
            hide_first_button: true,
            hide_prev_button: false,
            hide_next_button: false,
            hide_last_button: true,
            aria_label: "Pagination Navigation".to_string(),
            page_aria_label: Arc::new(|page, _selected| format!("Goto Page {page}")),
            on_page_change: None,
        }
    }
}

impl PaginationConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of pages shown at each end.
    pub fn with_boundary_count(mut self, count: usize) -> Self {
        self.boundary_count = count;
        self
    }

    /// Set the number of pages shown around the current page.
    pub fn with_sibling_count(mut self, count: usize) -> Self {
        self.sibling_count = count;
        self
    }

    /// Set the total number of items.
    pub fn with_total(mut self, total: usize) -> Self {
        self.total = total;
        self
    }

    /// Set the number of items per page.
    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page;
        self
    }

    /// Set the initial page.
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// Show or hide the first-page button.
    pub fn with_hide_first_button(mut self, hide: bool) -> Self {
        self.hide_first_button = hide;
        self
    }

    /// Show or hide the previous-page button.
    pub fn with_hide_prev_button(mut self, hide: bool) -> Self {
        self.hide_prev_button = hide;
        self
    }

    /// Show or hide the next-page button.
    pub fn with_hide_next_button(mut self, hide: bool) -> Self {
        self.hide_next_button = hide;
        self
    }

    /// Show or hide the last-page button.
    pub fn with_hide_last_button(mut self, hide: bool) -> Self {
        self.hide_last_button = hide;
        self
    }

    /// Set the accessible name of the navigation landmark.
    pub fn with_aria_label(mut self, label: impl Into<String>) -> Self {
        self.aria_label = label.into();
        self
    }

    /// Set how page buttons are named.
    pub fn with_page_aria_label<F>(mut self, f: F) -> Self
    where
        F: Fn(usize, bool) -> String + Send + Sync + 'static,
    {
        self.page_aria_label = Arc::new(f);
        self
    }

    /// Set the page change callback.
    pub fn with_on_page_change<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.on_page_change = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for PaginationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginationConfig")
            .field("boundary_count", &self.boundary_count)
            .field("sibling_count", &self.sibling_count)
            .field("total", &self.total)
            .field("per_page", &self.per_page)
            .field("page", &self.page)
            .field("aria_label", &self.aria_label)
            .finish_non_exhaustive()
    }
}

/// What a pagination button does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaginationItemKind {
    /// Go to the first page.
    First,
    /// Go to the previous page.
    Previous,
    /// Go to a numbered page.
    Page,
    /// Placeholder for pages hidden before the current page.
    EllipsisStart,
    /// Placeholder for pages hidden after the current page.
    EllipsisEnd,
    /// Go to the next page.
    Next,
    /// Go to the last page.
    Last,
}

impl PaginationItemKind {
    /// The `data-type` value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Previous => "previous",
            Self::Page => "page",
            Self::EllipsisStart => "ellipsis-start",
            Self::EllipsisEnd => "ellipsis-end",
            Self::Next => "next",
            Self::Last => "last",
        }
    }
}

/// One button of the page list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationItem {
    /// What the button does.
    pub kind: PaginationItemKind,
    /// The page the button goes to; `None` for ellipses.
    pub page: Option<usize>,
    /// Whether this is the current page.
    pub selected: bool,
    /// Whether the button does nothing.
    pub disabled: bool,
}

impl PaginationItem {
    fn control(kind: PaginationItemKind, page: i64, disabled: bool) -> Self {
        Self {
            kind,
            page: usize::try_from(page).ok(),
            selected: false,
            disabled,
        }
    }
}

/// A numbered page or an ellipsis in the page list.
enum Entry {
    Page(i64),
    Ellipsis(PaginationItemKind),
}

/// Attributes for the navigation landmark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationNavAttrs {
    /// Always [`AriaRole::Navigation`].
    pub role: AriaRole,
    /// Accessible name.
    pub aria_label: String,
}

impl PaginationNavAttrs {
    /// Attribute pairs for hosts that bind strings.
    pub fn to_pairs(&self) -> AttrPairs {
        PairsBuilder::new()
            .attr("role", self.role.as_str())
            .attr("aria-label", &self.aria_label)
            .build()
    }
}

/// Attributes for a pagination button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationPageAttrs {
    /// Accessible name, for enabled buttons with a target page.
    pub aria_label: Option<String>,
    /// Set on the current page.
    pub aria_current: bool,
    /// Whether the button is disabled.
    pub disabled: bool,
}

impl PaginationPageAttrs {
    /// Attribute pairs for hosts that bind strings.
    pub fn to_pairs(&self) -> AttrPairs {
        PairsBuilder::new()
            .opt("aria-label", self.aria_label.as_deref())
            .opt("aria-current", self.aria_current.then_some("page"))
            .opt("disabled", self.disabled.then_some("true"))
            .build()
    }
}

/// Pagination behavior.
pub struct Pagination {
    config: PaginationConfig,
    page: Store<usize>,
    total: Store<usize>,
    per_page: Store<usize>,
}

impl Pagination {
    /// Create a pagination.
    pub fn new(config: PaginationConfig) -> Self {
        Self {
            page: Store::new(config.page),
            total: Store::new(config.total),
            per_page: Store::new(config.per_page.max(1)),
            config,
        }
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Store of the current page.
    pub fn page_store(&self) -> &Store<usize> {
        &self.page
    }

    /// The current page, starting at 1.
    pub fn page(&self) -> usize {
        self.page.get()
    }

    /// Go to a page. The change callback runs only if the page changed.
    pub fn set_page(&self, page: usize) {
        if self.page.set(page) {
            tracing::trace!(target: targets::WIDGETS, page, "page changed");
            if let Some(callback) = &self.config.on_page_change {
                callback(page);
            }
        }
    }

    /// Go to the page an item points at. Disabled items and ellipses do
    /// nothing.
    pub fn select(&self, item: &PaginationItem) {
        if let (false, Some(page)) = (item.disabled, item.page) {
            self.set_page(page);
        }
    }

    /// Total number of items.
    pub fn total(&self) -> usize {
        self.total.get()
    }

    /// Change the total number of items.
    pub fn set_total(&self, total: usize) {
        self.total.set(total);
    }

    /// Items per page.
    pub fn per_page(&self) -> usize {
        self.per_page.get()
    }

    /// Change the number of items per page. Zero is treated as one.
    pub fn set_per_page(&self, per_page: usize) {
        self.per_page.set(per_page.max(1));
    }

    /// Number of pages.
    pub fn count(&self) -> usize {
        self.total().div_ceil(self.per_page())
    }

    /// 1-based index of the first item on the current page, or 0 when there
    /// are no items.
    pub fn start(&self) -> usize {
        let page = self.page().max(1);
        let per_page = self.per_page();
        (page - 1)
            .saturating_mul(per_page)
            .saturating_add(1)
            .min(self.total())
    }

    /// 1-based index of the last item on the current page.
    pub fn end(&self) -> usize {
        (self.start() + self.per_page() - 1).min(self.total())
    }

    // =========================================================================
    // Page list
    // =========================================================================

    /// The buttons to render, in order.
    pub fn items(&self) -> Vec<PaginationItem> {
        let config = &self.config;
        let page = self.page() as i64;
        let count = self.count() as i64;
        let boundary = config.boundary_count as i64;
        let siblings = config.sibling_count as i64;

        let start_pages = 1..=boundary.min(count);
        let end_pages = (count - boundary + 1).max(boundary + 1)..=count;

        // Keep the sibling run clear of both boundary runs and its length
        // constant near either end.
        let siblings_start = (page - siblings)
            .min(count - boundary - siblings * 2 - 1)
            .max(boundary + 2);
        let siblings_limit = if end_pages.is_empty() {
            count - 1
        } else {
            end_pages.start() - 2
        };
        let siblings_end = (page + siblings)
            .max(boundary + siblings * 2 + 2)
            .min(siblings_limit);

        let mut entries: Vec<Entry> = start_pages.map(Entry::Page).collect();
        if siblings_start > boundary + 2 {
            entries.push(Entry::Ellipsis(PaginationItemKind::EllipsisStart));
        } else if boundary + 1 < count - boundary {
            entries.push(Entry::Page(boundary + 1));
        }
        entries.extend((siblings_start..=siblings_end).map(Entry::Page));
        if siblings_end < count - boundary - 1 {
            entries.push(Entry::Ellipsis(PaginationItemKind::EllipsisEnd));
        } else if count - boundary > boundary {
            entries.push(Entry::Page(count - boundary));
        }
        entries.extend(end_pages.map(Entry::Page));

        let mut items = Vec::with_capacity(entries.len() + 4);
        if !config.hide_first_button {
            items.push(PaginationItem::control(PaginationItemKind::First, 1, page <= 1));
        }
        if !config.hide_prev_button {
            items.push(PaginationItem::control(
                PaginationItemKind::Previous,
                page - 1,
                page <= 1,
            ));
        }
        items.extend(entries.into_iter().map(|entry| match entry {
            Entry::Page(number) => PaginationItem {
                kind: PaginationItemKind::Page,
                page: usize::try_from(number).ok(),
                selected: number == page,
                disabled: false,
            },
            Entry::Ellipsis(kind) => PaginationItem {
                kind,
                page: None,
                selected: false,
                disabled: true,
            },
        }));
        if !config.hide_next_button {
            items.push(PaginationItem::control(
                PaginationItemKind::Next,
                page + 1,
                page >= count,
            ));
        }
        if !config.hide_last_button {
            items.push(PaginationItem::control(PaginationItemKind::Last, count, page >= count));
        }
        items
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    /// Attributes for the navigation landmark.
    pub fn nav_attrs(&self) -> PaginationNavAttrs {
        PaginationNavAttrs {
            role: AriaRole::Navigation,
            aria_label: self.config.aria_label.clone(),
        }
    }

    /// Attributes for a button of the page list.
    pub fn page_attrs(&self, item: &PaginationItem) -> PaginationPageAttrs {
        let aria_label = match item.page {
            Some(page) if page > 0 && !item.disabled => {
                Some((self.config.page_aria_label)(page, item.selected))
            }
            _ => None,
        };
        PaginationPageAttrs {
            aria_label,
            aria_current: item.selected,
            disabled: item.disabled,
        }
    }
}

impl fmt::Debug for Pagination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pagination")
            .field("page", &self.page())
            .field("total", &self.total())
            .field("per_page", &self.per_page())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Renders items the way a page list reads: `+` marks the current page,
    /// `-` a disabled button.
    fn labels(pagination: &Pagination) -> Vec<String> {
        pagination
            .items()
            .iter()
            .map(|item| {
                let text = match item.kind {
                    PaginationItemKind::Page => item.page.unwrap_or_default().to_string(),
                    PaginationItemKind::EllipsisStart | PaginationItemKind::EllipsisEnd => {
                        "...".to_string()
                    }
                    kind => kind.as_str().to_string(),
                };
                if item.selected {
                    format!("+{text}")
                } else if item.disabled && item.page.is_some() {
                    format!("-{text}")
                } else {
                    text
                }
            })
            .collect()
    }

    #[test]
    fn test_defaults() {
        let pagination = Pagination::new(PaginationConfig::new());
        assert_eq!(pagination.page(), 1);
        assert_eq!(pagination.count(), 0);
        assert_eq!((pagination.start(), pagination.end()), (0, 0));

        let nav = pagination.nav_attrs();
        assert_eq!(
            nav.to_pairs(),
            vec![
                ("role", "navigation".to_string()),
                ("aria-label", "Pagination Navigation".to_string()),
            ]
        );
    }

    #[test]
    fn test_short_list_shows_every_page() {
        let pagination = Pagination::new(PaginationConfig::new().with_total(33).with_page(2));
        assert_eq!(labels(&pagination), ["previous", "1", "+2", "3", "4", "next"]);

        pagination.set_page(1);
        assert_eq!(labels(&pagination), ["-previous", "+1", "2", "3", "4", "next"]);

        pagination.set_page(4);
        assert_eq!(labels(&pagination), ["previous", "1", "2", "3", "+4", "-next"]);
    }

    #[test]
    fn test_long_list_collapses_into_ellipses() {
        let pagination = Pagination::new(
            PaginationConfig::new()
                .with_total(200)
                .with_page(10)
                .with_hide_prev_button(true)
                .with_hide_next_button(true),
        );
        assert_eq!(labels(&pagination), ["1", "...", "9", "+10", "11", "...", "20"]);

        pagination.set_page(1);
        assert_eq!(labels(&pagination), ["+1", "2", "3", "4", "5", "...", "20"]);

        pagination.set_page(20);
        assert_eq!(labels(&pagination), ["1", "...", "16", "17", "18", "19", "+20"]);

        pagination.set_page(4);
        assert_eq!(labels(&pagination), ["1", "2", "3", "+4", "5", "...", "20"]);
    }

    #[test]
    fn test_ellipsis_kinds() {
        let pagination = Pagination::new(PaginationConfig::new().with_total(200).with_page(10));
        let kinds: Vec<_> = pagination
            .items()
            .iter()
            .filter(|item| item.page.is_none())
            .map(|item| item.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![PaginationItemKind::EllipsisStart, PaginationItemKind::EllipsisEnd]
        );

        pagination.set_page(2);
        let kinds: Vec<_> = pagination
            .items()
            .iter()
            .filter(|item| item.page.is_none())
            .map(|item| item.kind)
            .collect();
        assert_eq!(kinds, vec![PaginationItemKind::EllipsisEnd]);
    }

    #[test]
    fn test_first_and_last_buttons() {
        let pagination = Pagination::new(
            PaginationConfig::new()
                .with_total(33)
                .with_hide_first_button(false)
                .with_hide_last_button(false),
        );
        assert_eq!(
            labels(&pagination),
            ["-first", "-previous", "+1", "2", "3", "4", "next", "last"]
        );
        let last = pagination.items()[7];
        assert_eq!(last.page, Some(4));
    }

    #[test]
    fn test_page_attrs() {
        let pagination = Pagination::new(PaginationConfig::new().with_total(33));
        let items = pagination.items();

        let previous = pagination.page_attrs(&items[0]);
        assert_eq!(previous.aria_label, None);
        assert!(previous.disabled);

        let current = pagination.page_attrs(&items[1]);
        assert_eq!(current.aria_label.as_deref(), Some("Goto Page 1"));
        assert_eq!(
            current.to_pairs(),
            vec![
                ("aria-label", "Goto Page 1".to_string()),
                ("aria-current", "page".to_string()),
            ]
        );

        let next = pagination.page_attrs(&items[5]);
        assert_eq!(next.aria_label.as_deref(), Some("Goto Page 2"));
    }

    #[test]
    fn test_range_of_current_page() {
        let pagination = Pagination::new(PaginationConfig::new().with_total(33).with_page(4));
        assert_eq!((pagination.start(), pagination.end()), (31, 33));

        pagination.set_per_page(5);
        assert_eq!(pagination.count(), 7);
        assert_eq!((pagination.start(), pagination.end()), (16, 20));

        pagination.set_per_page(0);
        assert_eq!(pagination.per_page(), 1);
    }
}
