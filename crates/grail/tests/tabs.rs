//! Integration tests for the tabs behavior.

use std::sync::Arc;

use grail::{
    ActivationMode, ClickEvent, Document, ElementId, ElementKind, FocusInEvent, IdGenerator, Key,
    KeyPressEvent, Orientation, Tabs, TabsConfig,
};
use parking_lot::Mutex;

struct Fixture {
    document: Arc<Document>,
    root: ElementId,
    triggers: Vec<ElementId>,
}

/// Root > list > triggers, followed by one panel per value.
fn fixture(values: &[&str]) -> Fixture {
    let document = Arc::new(Document::new());
    let root = document.create_element(ElementKind::Generic, None);
    let list = document.create_element(ElementKind::Generic, Some(root));
    let triggers = values
        .iter()
        .map(|value| {
            let trigger = document.create_element(ElementKind::TabsTrigger, Some(list));
            document.set_value(trigger, *value);
            trigger
        })
        .collect();
    for _ in values {
        document.create_element(ElementKind::Generic, Some(root));
    }
    Fixture {
        document,
        root,
        triggers,
    }
}

fn mounted(fixture: &Fixture, config: TabsConfig) -> Tabs {
    let tabs = Tabs::new(fixture.document.clone(), &IdGenerator::new(), config);
    tabs.mount(fixture.root);
    tabs
}

fn key(tabs: &Tabs, key: Key, target: ElementId) -> KeyPressEvent {
    let mut event = KeyPressEvent::new(key).with_target(target);
    tabs.handle_keydown(&mut event);
    event
}

/// Forward the focus change the way a host would.
fn sync_focus(fixture: &Fixture, tabs: &Tabs) {
    if let Some(focused) = fixture.document.focused() {
        tabs.handle_focus_in(&mut FocusInEvent::new(focused));
    }
}

#[test]
fn test_automatic_activation_follows_focus() {
    let f = fixture(&["one", "two", "three"]);
    let tabs = mounted(&f, TabsConfig::new().with_default_value("one"));

    let event = key(&tabs, Key::ArrowRight, f.triggers[0]);
    sync_focus(&f, &tabs);

    assert!(event.is_handled());
    assert_eq!(f.document.focused(), Some(f.triggers[1]));
    assert_eq!(tabs.active().as_deref(), Some("two"));

    key(&tabs, Key::ArrowLeft, f.triggers[1]);
    key(&tabs, Key::ArrowLeft, f.triggers[0]);
    sync_focus(&f, &tabs);
    assert_eq!(tabs.active().as_deref(), Some("three"));
}

#[test]
fn test_manual_activation_waits_for_enter() {
    let f = fixture(&["one", "two"]);
    let tabs = mounted(
        &f,
        TabsConfig::new()
            .with_default_value("one")
            .with_activation_mode(ActivationMode::Manual),
    );

    key(&tabs, Key::ArrowRight, f.triggers[0]);
    sync_focus(&f, &tabs);
    assert_eq!(tabs.active().as_deref(), Some("one"));

    let event = key(&tabs, Key::Enter, f.triggers[1]);
    assert!(event.is_handled());
    assert_eq!(tabs.active().as_deref(), Some("two"));
}

#[test]
fn test_vertical_tabs_use_up_and_down() {
    let f = fixture(&["one", "two"]);
    let tabs = mounted(&f, TabsConfig::new().with_orientation(Orientation::Vertical));

    let event = key(&tabs, Key::ArrowRight, f.triggers[0]);
    assert!(!event.is_handled());
    assert_eq!(f.document.focused(), Some(f.triggers[0]));

    let event = key(&tabs, Key::ArrowDown, f.triggers[0]);
    assert!(event.is_handled());
    assert_eq!(f.document.focused(), Some(f.triggers[1]));
    assert_eq!(tabs.list_attrs().aria_orientation, Orientation::Vertical);
}

#[test]
fn test_disabled_tab_is_skipped() {
    let f = fixture(&["one", "two", "three"]);
    f.document.set_disabled(f.triggers[1], true);
    let tabs = mounted(&f, TabsConfig::new().with_default_value("one"));

    key(&tabs, Key::ArrowRight, f.triggers[0]);
    assert_eq!(f.document.focused(), Some(f.triggers[2]));

    tabs.handle_click(&mut ClickEvent::new(f.triggers[1]));
    assert_eq!(tabs.active().as_deref(), Some("one"));
}

#[test]
fn test_change_callback_only_on_change() {
    let f = fixture(&["one", "two"]);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    let tabs = mounted(
        &f,
        TabsConfig::new()
            .with_default_value("one")
            .with_on_value_change(move |value| seen_clone.lock().push(value.to_string())),
    );

    tabs.handle_click(&mut ClickEvent::new(f.triggers[0]));
    tabs.handle_click(&mut ClickEvent::new(f.triggers[1]));
    tabs.handle_click(&mut ClickEvent::new(f.triggers[1]));

    assert_eq!(*seen.lock(), vec!["two".to_string()]);
}

#[test]
fn test_first_rendered_tab_becomes_active() {
    let f = fixture(&["one", "two"]);
    let tabs = Tabs::new(f.document.clone(), &IdGenerator::new(), TabsConfig::new());
    assert_eq!(tabs.active(), None);

    let first = tabs.trigger_attrs("one");
    let second = tabs.trigger_attrs("two");

    assert!(first.aria_selected);
    assert_eq!(first.tabindex, 0);
    assert_eq!(first.aria_controls, "tabs_1-content-one");
    assert!(!second.aria_selected);
    assert_eq!(second.tabindex, -1);

    let panel = tabs.content_attrs("two");
    assert!(!panel.active);
    assert!(panel.to_pairs().contains(&("hidden", "true".to_string())));
    assert_eq!(panel.aria_labelledby, "tabs_1-trigger-two");
}

#[test]
fn test_destroyed_tabs_ignore_events() {
    let f = fixture(&["one", "two"]);
    let tabs = mounted(&f, TabsConfig::new().with_default_value("one"));
    tabs.destroy();

    let event = key(&tabs, Key::ArrowRight, f.triggers[0]);
    tabs.handle_click(&mut ClickEvent::new(f.triggers[1]));

    assert!(!event.is_handled());
    assert_eq!(tabs.active().as_deref(), Some("one"));
    assert!(!tabs.is_mounted());
}
