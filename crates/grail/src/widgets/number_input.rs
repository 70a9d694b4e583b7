//! Number input behavior: a text field stepped by buttons, keys and the
//! mouse wheel.
//!
//! The behavior owns the field's text. The host renders
//! [`value_store`](NumberInput::value_store) into the field and reports
//! typing back through [`set_input_value`](NumberInput::set_input_value).
//! Stepping first snaps the current value to the step grid; a snap that
//! already moves in the stepping direction counts as one step.
//!
//! # Keyboard
//!
//! | Key | Action |
//! |-----|--------|
//! | Up, PageUp | Step up (ten steps with Shift) |
//! | Down, PageDown | Step down (ten steps with Shift) |
//! | Home | Set the minimum |
//! | End | Set the largest value on the grid not above the maximum |
//!
//! Holding a step button steps once, then repeats every
//! [`SPIN_INTERVAL`] after [`SPIN_DELAY`] until the pointer is released.

use std::fmt;
use std::sync::{Arc, OnceLock, Weak};
use std::time::Duration;

use grail_core::logging::targets;
use grail_core::{IdGenerator, Store, TimerId, TimerQueue};
use parking_lot::Mutex;
use regex::Regex;

use super::{AttrPairs, PairsBuilder, format_number};
use crate::dom::{Document, ElementId, ElementKind};
use crate::event::{
    FocusOutEvent, Key, KeyPressEvent, PasteEvent, PointerDownEvent, PointerUpEvent, WheelEvent,
};

/// Delay before a held step button starts repeating.
pub const SPIN_DELAY: Duration = Duration::from_millis(400);

/// Interval between repeated steps while a step button is held.
pub const SPIN_INTERVAL: Duration = Duration::from_millis(60);

/// The virtual keyboard hint for the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputMode {
    /// Plain text keyboard.
    Text,
    /// Digits only.
    Numeric,
    /// Digits and a decimal separator.
    #[default]
    Decimal,
}

impl InputMode {
    /// The `inputmode` value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Numeric => "numeric",
            Self::Decimal => "decimal",
        }
    }
}

/// The step grid of a number input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Step by this amount. Values that are not positive step by 1.
    Value(f64),
    /// Step by 1 and accept any value as valid.
    Any,
}

impl Step {
    /// The amount one step moves the value.
    pub fn size(self) -> f64 {
        match self {
            Self::Value(step) if step > 0.0 => step,
            _ => 1.0,
        }
    }
}

impl Default for Step {
    fn default() -> Self {
        Self::Value(1.0)
    }
}

/// Which way a step moves the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepDirection {
    /// Towards the maximum.
    Increment,
    /// Towards the minimum.
    Decrement,
}

impl StepDirection {
    /// The `data-mode` value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Increment => "+",
            Self::Decrement => "-",
        }
    }

    fn sign(self) -> f64 {
        match self {
            Self::Increment => 1.0,
            Self::Decrement => -1.0,
        }
    }

    fn button_kind(self) -> ElementKind {
        match self {
            Self::Increment => ElementKind::NumberInputIncrement,
            Self::Decrement => ElementKind::NumberInputDecrement,
        }
    }
}

/// Configuration for a [`NumberInput`].
#[derive(Debug, Clone, PartialEq)]
pub struct NumberInputConfig {
    /// Lower bound.
    pub min: Option<f64>,
    /// Upper bound.
    pub max: Option<f64>,
    /// The step grid.
    pub step: Step,
    /// The initial field text.
    pub value: String,
    /// The `pattern` attribute of the field.
    pub pattern: String,
    /// The `inputmode` attribute of the field.
    pub input_mode: InputMode,
    /// Step with the mouse wheel while the field is focused.
    pub allow_mouse_wheel: bool,
    /// Snap the value into range when the field loses focus.
    pub clamp_value_on_blur: bool,
    /// Repeat steps while a step button is held.
    pub spin_on_press: bool,
    /// Accessible name of the increment button.
    pub increment_aria_label: String,
    /// Accessible name of the decrement button.
    pub decrement_aria_label: String,
}

impl Default for NumberInputConfig {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
            step: Step::default(),
            value: String::new(),
            pattern: "[0-9]*(.[0-9]+)?".to_string(),
            input_mode: InputMode::default(),
            allow_mouse_wheel: true,
            clamp_value_on_blur: true,
            spin_on_press: true,
            increment_aria_label: "Increment".to_string(),
            decrement_aria_label: "Decrement".to_string(),
        }
    }
}

impl NumberInputConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the lower bound.
    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Set the upper bound.
    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Set the step grid.
    pub fn with_step(mut self, step: Step) -> Self {
        self.step = step;
        self
    }

    /// Set the initial field text.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Set the `pattern` attribute.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    /// Set the `inputmode` attribute.
    pub fn with_input_mode(mut self, mode: InputMode) -> Self {
        self.input_mode = mode;
        self
    }

    /// Enable or disable wheel stepping.
    pub fn with_allow_mouse_wheel(mut self, allow: bool) -> Self {
        self.allow_mouse_wheel = allow;
        self
    }

    /// Enable or disable snapping on blur.
    pub fn with_clamp_value_on_blur(mut self, clamp: bool) -> Self {
        self.clamp_value_on_blur = clamp;
        self
    }

    /// Enable or disable repeating while a step button is held.
    pub fn with_spin_on_press(mut self, spin: bool) -> Self {
        self.spin_on_press = spin;
        self
    }

    /// Set the accessible names of the step buttons.
    pub fn with_button_labels(
        mut self,
        increment: impl Into<String>,
        decrement: impl Into<String>,
    ) -> Self {
        self.increment_aria_label = increment.into();
        self.decrement_aria_label = decrement.into();
        self
    }
}

/// Snap `value` to the grid of `step` starting at `min` (or 0), then bring
/// it into range. A value above `max` becomes the largest grid value not
/// above `max`. The result is rounded to the precision of `step`.
pub fn snap_value_to_step(value: f64, min: Option<f64>, max: Option<f64>, step: f64) -> f64 {
    let base = min.unwrap_or(0.0);
    // Halfway values round away from the base.
    let steps = ((value - base) / step).round();
    let mut snapped = round_to_step_precision(base + steps * step, step);

    match (min, max) {
        (Some(min), _) if snapped < min => snapped = min,
        (Some(min), Some(max)) if snapped > max => {
            snapped = min + round_to_step_precision((max - min) / step, step).floor() * step;
        }
        (None, Some(max)) if snapped > max => {
            snapped = round_to_step_precision(max / step, step).floor() * step;
        }
        _ => {}
    }
    round_to_step_precision(snapped, step)
}

/// Rounds away float noise finer than the decimals of `step`.
fn round_to_step_precision(value: f64, step: f64) -> f64 {
    let step = step.to_string();
    match step.find('.') {
        Some(point) => {
            let pow = 10f64.powi((step.len() - point) as i32);
            ((value * pow) + 0.5).floor() / pow
        }
        None => value,
    }
}

/// Parses field text into a number. Empty and partial input such as `-`
/// yield `None`.
fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

fn paste_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^-?(0|[1-9]\d*)(\.\d+)?$").ok())
        .as_ref()
}

/// Returns true if `text` may be pasted into the field.
fn is_valid_paste(text: &str) -> bool {
    text.is_empty() || paste_pattern().is_none_or(|pattern| pattern.is_match(text))
}

/// Attributes for the label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberInputLabelAttrs {
    /// The DOM id of the field.
    pub for_id: String,
}

impl NumberInputLabelAttrs {
    /// Attribute pairs for hosts that bind strings.
    pub fn to_pairs(&self) -> AttrPairs {
        PairsBuilder::new().attr("for", &self.for_id).build()
    }
}

/// Attributes for the text field.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberInputFieldAttrs {
    /// The DOM id of the field.
    pub id: String,
    /// The virtual keyboard hint.
    pub input_mode: InputMode,
    /// The validation pattern.
    pub pattern: String,
    /// The lower bound.
    pub aria_valuemin: Option<f64>,
    /// The upper bound.
    pub aria_valuemax: Option<f64>,
}

impl NumberInputFieldAttrs {
    /// Attribute pairs for hosts that bind strings.
    pub fn to_pairs(&self) -> AttrPairs {
        PairsBuilder::new()
            .attr("inputmode", self.input_mode.as_str())
            .attr("id", &self.id)
            .attr("pattern", &self.pattern)
            .attr("autocorrect", "off")
            .attr("autocomplete", "off")
            .attr("spellcheck", "false")
            .attr("aria-roledescription", "numberfield")
            .opt("aria-valuemin", self.aria_valuemin.map(format_number))
            .opt("aria-valuemax", self.aria_valuemax.map(format_number))
            .build()
    }
}

/// Attributes for a step button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberInputButtonAttrs {
    /// The DOM id of the field.
    pub aria_controls: String,
    /// Always `-1`.
    pub tabindex: i32,
    /// Which way the button steps.
    pub mode: StepDirection,
    /// Accessible name.
    pub aria_label: String,
    /// Set when the value cannot step further this way.
    pub disabled: bool,
}

impl NumberInputButtonAttrs {
    /// Attribute pairs for hosts that bind strings.
    pub fn to_pairs(&self) -> AttrPairs {
        PairsBuilder::new()
            .attr("aria-controls", &self.aria_controls)
            .attr("tabindex", self.tabindex.to_string())
            .attr("data-mode", self.mode.as_str())
            .attr("aria-label", &self.aria_label)
            .opt("disabled", self.disabled.then_some("true"))
            .build()
    }
}

#[derive(Debug, Clone, Copy)]
struct Mounted {
    root: ElementId,
    field: ElementId,
}

struct NumberInputInner {
    this: Weak<NumberInputInner>,
    document: Arc<Document>,
    timers: Arc<TimerQueue>,
    id: String,
    config: NumberInputConfig,
    value: Store<String>,
    min: Store<Option<f64>>,
    max: Store<Option<f64>>,
    step: Store<Step>,
    spin: Mutex<Option<TimerId>>,
    mounted: Mutex<Option<Mounted>>,
}

impl NumberInputInner {
    fn value_as_number(&self) -> Option<f64> {
        self.value.with(|text| parse_number(text))
    }

    fn snap(&self, value: f64) -> f64 {
        snap_value_to_step(value, self.min.get(), self.max.get(), self.step.get().size())
    }

    fn set_number(&self, value: f64) {
        self.value.set(format_number(value));
    }

    /// The value `steps` steps away, on the grid and in range.
    fn next_value(&self, direction: StepDirection, steps: u32) -> f64 {
        let value = self.value_as_number().unwrap_or(0.0);
        let step = self.step.get().size();
        let snapped = self.snap(value);

        let mut steps = f64::from(steps);
        let sign = direction.sign();
        if (sign > 0.0 && snapped > value) || (sign < 0.0 && snapped < value) {
            steps -= 1.0;
        }
        if steps == 0.0 {
            snapped
        } else {
            self.snap(snapped + sign * step * steps)
        }
    }

    fn step_by(&self, direction: StepDirection, steps: u32) {
        let next = self.next_value(direction, steps);
        tracing::trace!(target: targets::WIDGETS, id = %self.id, ?direction, next, "number stepped");
        self.set_number(next);
    }

    fn start_spin(&self, direction: StepDirection) {
        self.stop_spin();
        let weak = self.this.clone();
        let timer = self.timers.start_one_shot(SPIN_DELAY, move || {
            if let Some(inner) = weak.upgrade() {
                inner.schedule_repeat(direction);
            }
        });
        *self.spin.lock() = Some(timer);
    }

    fn schedule_repeat(&self, direction: StepDirection) {
        let weak = self.this.clone();
        let timer = self.timers.start_one_shot(SPIN_INTERVAL, move || {
            if let Some(inner) = weak.upgrade() {
                inner.step_by(direction, 1);
                inner.schedule_repeat(direction);
            }
        });
        *self.spin.lock() = Some(timer);
    }

    fn stop_spin(&self) {
        let timer = self.spin.lock().take();
        if let Some(timer) = timer {
            // The timer may already have fired.
            let _ = self.timers.stop(timer);
        }
    }
}

/// Number input behavior.
pub struct NumberInput {
    inner: Arc<NumberInputInner>,
}

impl NumberInput {
    /// Create a detached number input. Held step buttons repeat on `timers`.
    pub fn new(
        document: Arc<Document>,
        ids: &IdGenerator,
        timers: Arc<TimerQueue>,
        config: NumberInputConfig,
    ) -> Self {
        let inner = Arc::new_cyclic(|this: &Weak<NumberInputInner>| NumberInputInner {
            this: this.clone(),
            document,
            timers,
            id: ids.next("number-input"),
            value: Store::new(config.value.clone()),
            min: Store::new(config.min),
            max: Store::new(config.max),
            step: Store::new(config.step),
            spin: Mutex::new(None),
            mounted: Mutex::new(None),
            config,
        });
        Self { inner }
    }

    /// The DOM id of the field.
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Bind to the subtree rooted at `root`, whose first
    /// [`ElementKind::NumberInputField`] is the field. Without a field the
    /// input stays detached.
    pub fn mount(&self, root: ElementId) {
        self.destroy();
        let document = &self.inner.document;
        let Some(field) = document
            .descendants_of_kind(root, ElementKind::NumberInputField)
            .first()
            .copied()
        else {
            tracing::debug!(target: targets::WIDGETS, id = %self.inner.id, "number input has no field");
            return;
        };
        *self.inner.mounted.lock() = Some(Mounted { root, field });
        tracing::debug!(target: targets::WIDGETS, id = %self.inner.id, "number input mounted");
    }

    /// Unbind from the document and stop any repeat. Safe to call when not
    /// mounted.
    pub fn destroy(&self) {
        self.inner.stop_spin();
        if self.inner.mounted.lock().take().is_some() {
            tracing::debug!(target: targets::WIDGETS, id = %self.inner.id, "number input destroyed");
        }
    }

    /// Returns true while bound to a document subtree.
    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.lock().is_some()
    }

    fn mounted(&self) -> Option<Mounted> {
        *self.inner.mounted.lock()
    }

    /// The mounted field, if `target` is it.
    fn field_target(&self, target: Option<ElementId>) -> Option<ElementId> {
        let mounted = self.mounted()?;
        (target == Some(mounted.field)).then_some(mounted.field)
    }

    // =========================================================================
    // Value
    // =========================================================================

    /// Store of the field text.
    pub fn value_store(&self) -> &Store<String> {
        &self.inner.value
    }

    /// The field text.
    pub fn input_value(&self) -> String {
        self.inner.value.get()
    }

    /// Report the field text after the user edited it.
    pub fn set_input_value(&self, text: impl Into<String>) {
        self.inner.value.set(text.into());
    }

    /// The field text as a number, `None` when it is empty or not a number.
    pub fn value_as_number(&self) -> Option<f64> {
        self.inner.value_as_number()
    }

    /// Store of the lower bound.
    pub fn min_store(&self) -> &Store<Option<f64>> {
        &self.inner.min
    }

    /// The lower bound.
    pub fn min(&self) -> Option<f64> {
        self.inner.min.get()
    }

    /// Change the lower bound.
    pub fn set_min(&self, min: Option<f64>) {
        self.inner.min.set(min);
    }

    /// Store of the upper bound.
    pub fn max_store(&self) -> &Store<Option<f64>> {
        &self.inner.max
    }

    /// The upper bound.
    pub fn max(&self) -> Option<f64> {
        self.inner.max.get()
    }

    /// Change the upper bound.
    pub fn set_max(&self, max: Option<f64>) {
        self.inner.max.set(max);
    }

    /// Store of the step grid.
    pub fn step_store(&self) -> &Store<Step> {
        &self.inner.step
    }

    /// The step grid.
    pub fn step(&self) -> Step {
        self.inner.step.get()
    }

    /// Change the step grid.
    pub fn set_step(&self, step: Step) {
        self.inner.step.set(step);
    }

    /// Step the value up once.
    pub fn increment(&self) {
        self.inner.step_by(StepDirection::Increment, 1);
    }

    /// Step the value down once.
    pub fn decrement(&self) {
        self.inner.step_by(StepDirection::Decrement, 1);
    }

    /// Whether the value can step up.
    pub fn can_increment(&self) -> bool {
        let inner = &self.inner;
        match (inner.value_as_number(), inner.max.get()) {
            (Some(value), Some(max)) => value < inner.snap(max),
            _ => true,
        }
    }

    /// Whether the value can step down.
    pub fn can_decrement(&self) -> bool {
        match (self.value_as_number(), self.min()) {
            (Some(value), Some(min)) => value > min,
            _ => true,
        }
    }

    /// Whether the value is off the step grid or out of range. Always false
    /// with [`Step::Any`] or an empty field.
    pub fn is_invalid(&self) -> bool {
        if self.step() == Step::Any {
            return false;
        }
        self.value_as_number()
            .is_some_and(|value| value != self.inner.snap(value))
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Handle a key press on the field.
    pub fn handle_keydown(&self, event: &mut KeyPressEvent) {
        if self.field_target(event.target).is_none() {
            return;
        }
        let steps = if event.modifiers.shift { 10 } else { 1 };
        match event.key {
            Key::ArrowUp | Key::PageUp => {
                event.base.accept();
                self.inner.step_by(StepDirection::Increment, steps);
            }
            Key::ArrowDown | Key::PageDown => {
                event.base.accept();
                self.inner.step_by(StepDirection::Decrement, steps);
            }
            Key::Home => {
                event.base.accept();
                if let Some(min) = self.min() {
                    self.inner.set_number(min);
                }
            }
            Key::End => {
                event.base.accept();
                if let Some(max) = self.max() {
                    self.inner.set_number(self.inner.snap(max));
                }
            }
            _ => {}
        }
    }

    /// Handle a character about to be typed into the field at
    /// `selection_start`. Characters that cannot be part of a number are
    /// rejected by accepting the event. A sign is allowed once, at the start.
    pub fn handle_keypress(&self, event: &mut KeyPressEvent, selection_start: usize) {
        if self.field_target(event.target).is_none() {
            return;
        }
        let Some(c) = event.key.printable_char() else {
            return;
        };
        let valid = match c {
            '0'..='9' | '.' => true,
            '-' | '+' => {
                selection_start == 0 && self.inner.value.with(|text| !text.contains(c))
            }
            _ => false,
        };
        if !valid {
            tracing::trace!(target: targets::WIDGETS, id = %self.inner.id, %c, "character rejected");
            event.base.accept();
        }
    }

    /// Handle text pasted into the field. Text that is not a plain decimal
    /// number is rejected by accepting the event.
    pub fn handle_paste(&self, event: &mut PasteEvent) {
        if self.field_target(Some(event.target)).is_some() && !is_valid_paste(&event.text) {
            event.base.accept();
        }
    }

    /// Handle the mouse wheel over the field. Steps only while the field has
    /// focus; scrolling up increments.
    pub fn handle_wheel(&self, event: &mut WheelEvent) {
        if !self.inner.config.allow_mouse_wheel {
            return;
        }
        let Some(field) = self.field_target(Some(event.target)) else {
            return;
        };
        if self.inner.document.focused() != Some(field) {
            return;
        }
        event.base.accept();
        let direction = if event.delta_y < 0.0 {
            StepDirection::Increment
        } else {
            StepDirection::Decrement
        };
        self.inner.step_by(direction, 1);
    }

    /// Handle focus leaving the field: snaps a non-empty value onto the grid
    /// and into range unless disabled in the configuration.
    pub fn handle_focus_out(&self, event: &mut FocusOutEvent) {
        if !self.inner.config.clamp_value_on_blur
            || self.field_target(Some(event.target)).is_none()
        {
            return;
        }
        if let Some(value) = self.value_as_number() {
            self.inner.set_number(self.inner.snap(value));
        }
    }

    /// Handle a pointer press inside the mounted subtree. A press on an
    /// enabled step button steps once, focuses the field and starts
    /// repeating.
    pub fn handle_pointer_down(&self, event: &mut PointerDownEvent) {
        let Some(mounted) = self.mounted() else {
            return;
        };
        let document = &self.inner.document;
        let Some(direction) = [StepDirection::Increment, StepDirection::Decrement]
            .into_iter()
            .find(|direction| {
                document
                    .closest_of_kind(event.target, direction.button_kind())
                    .is_some_and(|button| document.is_within(button, mounted.root))
            })
        else {
            return;
        };
        let enabled = match direction {
            StepDirection::Increment => self.can_increment(),
            StepDirection::Decrement => self.can_decrement(),
        };
        if !enabled {
            return;
        }

        event.base.accept();
        self.inner.step_by(direction, 1);
        if document.focused() != Some(mounted.field) {
            document.focus(mounted.field);
        }
        if self.inner.config.spin_on_press {
            self.inner.start_spin(direction);
        }
    }

    /// Handle a pointer release anywhere: stops repeating.
    pub fn handle_pointer_up(&self, _event: &mut PointerUpEvent) {
        self.inner.stop_spin();
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    /// Attributes for the label.
    pub fn label_attrs(&self) -> NumberInputLabelAttrs {
        NumberInputLabelAttrs {
            for_id: self.inner.id.clone(),
        }
    }

    /// Attributes for the field.
    pub fn input_attrs(&self) -> NumberInputFieldAttrs {
        NumberInputFieldAttrs {
            id: self.inner.id.clone(),
            input_mode: self.inner.config.input_mode,
            pattern: self.inner.config.pattern.clone(),
            aria_valuemin: self.min(),
            aria_valuemax: self.max(),
        }
    }

    /// Attributes for the increment button.
    pub fn increment_attrs(&self) -> NumberInputButtonAttrs {
        NumberInputButtonAttrs {
            aria_controls: self.inner.id.clone(),
            tabindex: -1,
            mode: StepDirection::Increment,
            aria_label: self.inner.config.increment_aria_label.clone(),
            disabled: !self.can_increment(),
        }
    }

    /// Attributes for the decrement button.
    pub fn decrement_attrs(&self) -> NumberInputButtonAttrs {
        NumberInputButtonAttrs {
            aria_controls: self.inner.id.clone(),
            tabindex: -1,
            mode: StepDirection::Decrement,
            aria_label: self.inner.config.decrement_aria_label.clone(),
            disabled: !self.can_decrement(),
        }
    }
}

impl Drop for NumberInput {
    fn drop(&mut self) {
        self.inner.stop_spin();
    }
}

impl fmt::Debug for NumberInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumberInput")
            .field("id", &self.inner.id)
            .field("value", &self.input_value())
            .field("mounted", &self.is_mounted())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detached(config: NumberInputConfig) -> NumberInput {
        NumberInput::new(
            Arc::new(Document::new()),
            &IdGenerator::new(),
            Arc::new(TimerQueue::new()),
            config,
        )
    }

    mod snapping {
        use super::*;

        #[test]
        fn test_snaps_to_nearest_grid_value() {
            assert_eq!(snap_value_to_step(1.2, Some(-50.0), Some(50.0), 2.0), 2.0);
            assert_eq!(snap_value_to_step(2.4, Some(-50.0), Some(50.0), 2.0), 2.0);
            assert_eq!(snap_value_to_step(3.0, None, None, 1.66), 3.32);
        }

        #[test]
        fn test_clamps_into_range() {
            assert_eq!(snap_value_to_step(-15.0, Some(-10.0), Some(12.0), 1.0), -10.0);
            assert_eq!(snap_value_to_step(15.0, Some(-10.0), Some(12.0), 1.0), 12.0);
            // Largest grid value not above the maximum.
            assert_eq!(snap_value_to_step(10.0, Some(-1.0), Some(10.0), 2.0), 9.0);
            assert_eq!(snap_value_to_step(0.0, None, Some(-10.0), 1.0), -10.0);
        }

        #[test]
        fn test_rounds_to_step_precision() {
            assert_eq!(snap_value_to_step(0.1 + 0.2, None, None, 0.1), 0.3);
            assert_eq!(round_to_step_precision(4.980000000000001, 1.66), 4.98);
        }
    }

    #[test]
    fn test_default_attrs() {
        let input = detached(NumberInputConfig::new());
        assert_eq!(input.id(), "number-input_1");
        assert_eq!(
            input.input_attrs().to_pairs(),
            vec![
                ("inputmode", "decimal".to_string()),
                ("id", "number-input_1".to_string()),
                ("pattern", "[0-9]*(.[0-9]+)?".to_string()),
                ("autocorrect", "off".to_string()),
                ("autocomplete", "off".to_string()),
                ("spellcheck", "false".to_string()),
                ("aria-roledescription", "numberfield".to_string()),
            ]
        );
        assert_eq!(
            input.increment_attrs().to_pairs(),
            vec![
                ("aria-controls", "number-input_1".to_string()),
                ("tabindex", "-1".to_string()),
                ("data-mode", "+".to_string()),
                ("aria-label", "Increment".to_string()),
            ]
        );
        assert_eq!(input.decrement_attrs().aria_label, "Decrement");
        assert_eq!(input.label_attrs().for_id, "number-input_1");
    }

    #[test]
    fn test_bounds_show_in_field_attrs() {
        let input = detached(
            NumberInputConfig::new()
                .with_min(20.0)
                .with_max(30.0)
                .with_pattern("test-pattern")
                .with_input_mode(InputMode::Numeric),
        );
        let attrs = input.input_attrs();
        assert_eq!(attrs.aria_valuemin, Some(20.0));
        assert_eq!(attrs.aria_valuemax, Some(30.0));
        assert_eq!(attrs.input_mode, InputMode::Numeric);

        input.set_min(Some(-5.0));
        assert!(input.input_attrs().to_pairs().contains(&("aria-valuemin", "-5".to_string())));
    }

    #[test]
    fn test_step_from_empty_field() {
        let input = detached(NumberInputConfig::new().with_min(-50.0).with_max(60.0));
        input.increment();
        assert_eq!(input.input_value(), "1");
        input.set_input_value("");
        input.decrement();
        assert_eq!(input.input_value(), "-1");

        let above_zero = detached(NumberInputConfig::new().with_min(10.0));
        above_zero.increment();
        assert_eq!(above_zero.input_value(), "10");
        above_zero.set_input_value("");
        above_zero.decrement();
        assert_eq!(above_zero.input_value(), "10");

        let below_zero = detached(NumberInputConfig::new().with_max(-10.0));
        below_zero.increment();
        assert_eq!(below_zero.input_value(), "-10");
        below_zero.set_input_value("");
        below_zero.decrement();
        assert_eq!(below_zero.input_value(), "-10");
    }

    #[test]
    fn test_fractional_steps_do_not_drift() {
        let input = detached(
            NumberInputConfig::new()
                .with_step(Step::Value(1.66))
                .with_value("0"),
        );
        for expected in ["1.66", "3.32", "4.98", "6.64"] {
            input.increment();
            assert_eq!(input.input_value(), expected);
        }
        input.decrement();
        assert_eq!(input.input_value(), "4.98");
    }

    #[test]
    fn test_invalid_tracks_grid_and_range() {
        let input = detached(
            NumberInputConfig::new()
                .with_min(-10.0)
                .with_max(10.0)
                .with_step(Step::Value(2.0)),
        );
        assert!(!input.is_invalid());
        let cases = [("15", true), ("8", false), ("-15", true), ("4", false), ("3", true)];
        for (text, invalid) in cases {
            input.set_input_value(text);
            assert_eq!(input.is_invalid(), invalid, "{text}");
        }

        input.set_step(Step::Any);
        assert!(!input.is_invalid());
    }

    #[test]
    fn test_step_size_falls_back_to_one() {
        assert_eq!(Step::Value(0.0).size(), 1.0);
        assert_eq!(Step::Value(-2.0).size(), 1.0);
        assert_eq!(Step::Any.size(), 1.0);
        assert_eq!(Step::Value(0.5).size(), 0.5);
    }

    #[test]
    fn test_value_as_number() {
        let input = detached(NumberInputConfig::new());
        assert_eq!(input.value_as_number(), None);
        input.set_input_value("3");
        assert_eq!(input.value_as_number(), Some(3.0));
        input.set_input_value("-");
        assert_eq!(input.value_as_number(), None);
        input.set_input_value("+4");
        assert_eq!(input.value_as_number(), Some(4.0));
    }

    #[test]
    fn test_paste_validation() {
        assert!(is_valid_paste("12.5"));
        assert!(is_valid_paste("-0.25"));
        assert!(!is_valid_paste("007"));
        assert!(!is_valid_paste("1e3"));
        assert!(!is_valid_paste("abc"));
    }
}
