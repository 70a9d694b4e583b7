//! Integration tests for the menu behavior.

use std::sync::Arc;
use std::time::Duration;

use grail::event::{PointerDownEvent, PointerOverEvent};
use grail::widgets::MenuItemParams;
use grail::{
    ClickEvent, Document, ElementId, ElementKind, IdGenerator, Key, KeyPressEvent, ManualClock,
    Menu, MenuConfig, TimerQueue,
};
use parking_lot::Mutex;

const ITEMS: [(&str, &str); 4] = [
    ("cut", "Cut"),
    ("copy", "Copy"),
    ("paste", "Paste"),
    ("delete", "Delete"),
];

struct Fixture {
    document: Arc<Document>,
    clock: Arc<ManualClock>,
    timers: Arc<TimerQueue>,
    trigger: ElementId,
    menu_element: ElementId,
    items: Vec<ElementId>,
    menu: Menu,
}

impl Fixture {
    fn trigger_key(&self, key: Key) -> KeyPressEvent {
        let mut event = KeyPressEvent::new(key).with_target(self.trigger);
        self.menu.handle_trigger_keydown(&mut event);
        event
    }

    fn menu_key(&self, key: Key) -> KeyPressEvent {
        let target = self.document.focused().unwrap_or(self.menu_element);
        let mut event = KeyPressEvent::new(key).with_target(target);
        self.menu.handle_menu_keydown(&mut event);
        event
    }

    fn type_text(&self, text: &str) {
        for c in text.chars() {
            self.menu_key(Key::Character(c));
        }
        self.clock.advance(Duration::from_millis(200));
        self.timers.process_expired();
    }
}

/// Route menu, key manager and timer logs to the test output.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("grail=trace,grail_core::timer=trace")
        .with_test_writer()
        .try_init();
}

/// Trigger and menu side by side; the menu holds the items with a separator
/// after "copy".
fn fixture(config: MenuConfig) -> Fixture {
    init_tracing();
    let document = Arc::new(Document::new());
    let clock = Arc::new(ManualClock::new());
    let timers = Arc::new(TimerQueue::with_clock(clock.clone()));
    let menu = Menu::new(document.clone(), &IdGenerator::new(), timers.clone(), config);

    let root = document.create_element(ElementKind::Generic, None);
    let trigger = document.create_element(ElementKind::MenuTrigger, Some(root));
    let menu_element = document.create_element(ElementKind::Generic, Some(root));
    let mut items = Vec::new();
    for (id, label) in ITEMS {
        let item = document.create_element(ElementKind::MenuItem, Some(menu_element));
        let attrs = menu.item_attrs(MenuItemParams::new(id, label));
        document.set_dom_id(item, attrs.id);
        document.set_value(item, attrs.item_id);
        document.set_label(item, attrs.label);
        items.push(item);
        if id == "copy" {
            document.create_element(ElementKind::Generic, Some(menu_element));
        }
    }

    menu.mount_trigger(trigger);
    menu.mount_menu(menu_element);
    Fixture {
        document,
        clock,
        timers,
        trigger,
        menu_element,
        items,
        menu,
    }
}

fn selecting(close: bool) -> (MenuConfig, Arc<Mutex<Vec<String>>>) {
    let selected = Arc::new(Mutex::new(Vec::new()));
    let selected_clone = selected.clone();
    let config = MenuConfig::new().with_on_select(move |id| {
        selected_clone.lock().push(id.to_string());
        close
    });
    (config, selected)
}

#[test]
fn test_arrow_down_opens_on_first_item() {
    let f = fixture(MenuConfig::new());

    let event = f.trigger_key(Key::ArrowDown);

    assert!(event.is_handled());
    assert!(f.menu.is_open());
    assert!(f.menu.trigger_attrs().aria_expanded);
    assert_eq!(f.menu.active_item(), Some(f.items[0]));
    assert_eq!(f.document.focused(), Some(f.items[0]));
}

#[test]
fn test_arrow_up_opens_on_last_item() {
    let f = fixture(MenuConfig::new());

    f.trigger_key(Key::ArrowUp);

    assert_eq!(f.menu.active_item(), Some(f.items[3]));
}

#[test]
fn test_navigation_stops_at_the_ends() {
    let f = fixture(MenuConfig::new());
    f.trigger_key(Key::ArrowUp);

    let event = f.menu_key(Key::ArrowDown);
    assert!(event.is_handled());
    assert_eq!(f.menu.active_item(), Some(f.items[3]));

    f.menu_key(Key::Home);
    f.menu_key(Key::ArrowUp);
    assert_eq!(f.menu.active_item(), Some(f.items[0]));
}

#[test]
fn test_disabled_items_are_skipped() {
    let f = fixture(MenuConfig::new());
    f.document.set_disabled(f.items[1], true);
    f.trigger_key(Key::ArrowDown);

    f.menu_key(Key::ArrowDown);

    assert_eq!(f.document.focused(), Some(f.items[2]));
}

#[test]
fn test_escape_closes_and_returns_focus() {
    let f = fixture(MenuConfig::new());
    f.trigger_key(Key::ArrowDown);

    f.menu_key(Key::Escape);

    assert!(!f.menu.is_open());
    assert_eq!(f.menu.active_item(), None);
    assert_eq!(f.document.focused(), Some(f.trigger));
}

#[test]
fn test_tab_closes_without_moving_focus() {
    let f = fixture(MenuConfig::new());
    f.trigger_key(Key::ArrowDown);

    let event = f.menu_key(Key::Tab);

    assert!(!event.is_handled());
    assert!(!f.menu.is_open());
    assert_eq!(f.document.focused(), Some(f.items[0]));
}

#[test]
fn test_enter_selects_and_closes() {
    let (config, selected) = selecting(true);
    let f = fixture(config);
    f.trigger_key(Key::ArrowDown);
    f.menu_key(Key::ArrowDown);

    let event = f.menu_key(Key::Enter);

    assert!(event.is_handled());
    assert_eq!(*selected.lock(), vec!["copy".to_string()]);
    assert!(!f.menu.is_open());
    assert_eq!(f.document.focused(), Some(f.trigger));
}

#[test]
fn test_select_can_keep_the_menu_open() {
    let (config, selected) = selecting(false);
    let f = fixture(config);
    f.trigger_key(Key::Enter);

    f.menu.handle_menu_click(&mut ClickEvent::new(f.items[2]));

    assert_eq!(*selected.lock(), vec!["paste".to_string()]);
    assert!(f.menu.is_open());
}

#[test]
fn test_disabled_item_click_is_swallowed() {
    let (config, selected) = selecting(true);
    let f = fixture(config);
    f.document.set_disabled(f.items[3], true);
    f.trigger_key(Key::Enter);

    let mut event = ClickEvent::new(f.items[3]);
    f.menu.handle_menu_click(&mut event);

    assert!(event.base.is_accepted());
    assert!(selected.lock().is_empty());
    assert!(f.menu.is_open());
}

#[test]
fn test_typeahead_activates_matching_label() {
    let f = fixture(MenuConfig::new());
    f.trigger_key(Key::Enter);
    assert_eq!(f.menu.active_item(), None);

    f.type_text("p");
    assert_eq!(f.menu.active_item(), Some(f.items[2]));
    assert_eq!(f.document.focused(), Some(f.items[2]));

    f.type_text("co");
    assert_eq!(f.menu.active_item(), Some(f.items[1]));
}

#[test]
fn test_pointer_over_activates_item() {
    let f = fixture(MenuConfig::new());
    f.trigger_key(Key::Enter);

    f.menu
        .handle_menu_pointer_over(&mut PointerOverEvent::new(f.items[2]));

    assert_eq!(f.menu.active_item(), Some(f.items[2]));
    assert_eq!(f.menu.item_attrs(MenuItemParams::new("paste", "Paste")).tabindex, 0);
    assert_eq!(f.menu.item_attrs(MenuItemParams::new("cut", "Cut")).tabindex, -1);
}

#[test]
fn test_trigger_click_toggles_and_reports() {
    let changes = Arc::new(Mutex::new(Vec::new()));
    let changes_clone = changes.clone();
    let f = fixture(
        MenuConfig::new().with_on_open_change(move |open| changes_clone.lock().push(open)),
    );

    f.menu.handle_trigger_click(&mut ClickEvent::new(f.trigger));
    assert_eq!(f.document.focused(), Some(f.menu_element));
    f.menu.handle_trigger_click(&mut ClickEvent::new(f.trigger));

    assert_eq!(*changes.lock(), vec![true, false]);
}

#[test]
fn test_initially_open_menu_loads_items_on_mount() {
    let f = fixture(MenuConfig::new().with_open(true));

    f.menu_key(Key::ArrowDown);

    assert_eq!(f.menu.active_item(), Some(f.items[0]));
}

#[test]
fn test_destroy_closes_the_menu() {
    let f = fixture(MenuConfig::new());
    f.trigger_key(Key::ArrowDown);

    f.menu.destroy();

    assert!(!f.menu.is_open());
    let event = f.trigger_key(Key::Enter);
    assert!(!event.is_handled());
}

#[test]
fn test_pointer_down_outside_closes_without_focus() {
    let changes = Arc::new(Mutex::new(Vec::new()));
    let changes_clone = changes.clone();
    let f = fixture(
        MenuConfig::new().with_on_open_change(move |open| changes_clone.lock().push(open)),
    );
    let outside = f.document.create_element(ElementKind::Generic, None);
    f.trigger_key(Key::ArrowDown);

    let mut event = PointerDownEvent::new(outside);
    f.menu.handle_pointer_down_outside(&mut event);

    assert!(!f.menu.is_open());
    assert_eq!(f.menu.active_item(), None);
    assert_eq!(f.document.focused(), Some(f.items[0]));
    assert_eq!(*changes.lock(), vec![true, false]);
}

#[test]
fn test_pointer_down_inside_menu_or_trigger_keeps_open() {
    let f = fixture(MenuConfig::new());
    f.trigger_key(Key::Enter);

    f.menu
        .handle_pointer_down_outside(&mut PointerDownEvent::new(f.items[2]));
    f.menu
        .handle_pointer_down_outside(&mut PointerDownEvent::new(f.menu_element));
    f.menu
        .handle_pointer_down_outside(&mut PointerDownEvent::new(f.trigger));

    assert!(f.menu.is_open());
}

#[test]
fn test_accepted_pointer_down_outside_is_ignored() {
    let f = fixture(MenuConfig::new());
    let outside = f.document.create_element(ElementKind::Generic, None);
    f.trigger_key(Key::Enter);

    let mut event = PointerDownEvent::new(outside);
    event.base.accept();
    f.menu.handle_pointer_down_outside(&mut event);

    assert!(f.menu.is_open());
}
