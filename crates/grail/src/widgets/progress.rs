//! Progress behavior: a determinate or indeterminate progress bar.
//!
//! The value is clamped to the configured range. A `None` value marks the
//! progress as indeterminate: the bar drops `aria-valuenow` and its label.

use std::fmt;
use std::sync::Arc;

use grail_core::Store;

use super::{AriaRole, AttrPairs, PairsBuilder, format_number};

/// Inputs to a progress label formatter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressLabelParams {
    /// The clamped value.
    pub value: f64,
    /// Completion between 0 and 1.
    pub percentage: f64,
    /// Lower end of the range.
    pub min_value: f64,
    /// Upper end of the range.
    pub max_value: f64,
}

/// Formats the human-readable value of a progress bar.
pub type ProgressLabelFormatter = Arc<dyn Fn(&ProgressLabelParams) -> String + Send + Sync>;

/// Configuration for [`Progress`].
#[derive(Clone)]
pub struct ProgressConfig {
    /// Lower end of the range.
    pub min_value: f64,
    /// Upper end of the range.
    pub max_value: f64,
    /// The initial value; `None` is indeterminate.
    pub value: Option<f64>,
    /// Formats `aria-valuetext`. Defaults to a whole percentage such as "50%".
    pub format_value_label: Option<ProgressLabelFormatter>,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            min_value: 0.0,
            max_value: 100.0,
            value: Some(0.0),
            format_value_label: None,
        }
    }
}

impl ProgressConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the range.
    pub fn with_range(mut self, min_value: f64, max_value: f64) -> Self {
        self.min_value = min_value;
        self.max_value = max_value;
        self
    }

    /// Set the initial value.
    pub fn with_value(mut self, value: Option<f64>) -> Self {
        self.value = value;
        self
    }

    /// Set the label formatter.
    pub fn with_format_value_label<F>(mut self, f: F) -> Self
    where
        F: Fn(&ProgressLabelParams) -> String + Send + Sync + 'static,
    {
        self.format_value_label = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for ProgressConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressConfig")
            .field("min_value", &self.min_value)
            .field("max_value", &self.max_value)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

/// Attributes for the progress bar.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressAttrs {
    /// Always [`AriaRole::ProgressBar`].
    pub role: AriaRole,
    /// The clamped value, absent while indeterminate.
    pub aria_valuenow: Option<f64>,
    /// Lower end of the range.
    pub aria_valuemin: f64,
    /// Upper end of the range.
    pub aria_valuemax: f64,
    /// The formatted label, absent when empty.
    pub aria_valuetext: Option<String>,
}

impl ProgressAttrs {
    /// Attribute pairs for hosts that bind strings.
    pub fn to_pairs(&self) -> AttrPairs {
        PairsBuilder::new()
            .opt("aria-valuenow", self.aria_valuenow.map(format_number))
            .attr("aria-valuemin", format_number(self.aria_valuemin))
            .attr("aria-valuemax", format_number(self.aria_valuemax))
            .opt("aria-valuetext", self.aria_valuetext.as_deref())
            .attr("role", self.role.as_str())
            .build()
    }
}

/// Progress behavior.
pub struct Progress {
    min_value: f64,
    max_value: f64,
    value: Store<Option<f64>>,
    format_value_label: Option<ProgressLabelFormatter>,
}

impl Progress {
    /// Create a progress bar.
    pub fn new(config: ProgressConfig) -> Self {
        Self {
            min_value: config.min_value,
            max_value: config.max_value,
            value: Store::new(config.value),
            format_value_label: config.format_value_label,
        }
    }

    /// Store of the raw, unclamped value.
    pub fn value_store(&self) -> &Store<Option<f64>> {
        &self.value
    }

    /// Set the value; `None` makes the progress indeterminate.
    pub fn set_value(&self, value: Option<f64>) {
        self.value.set(value);
    }

    /// The value clamped to the range, `None` while indeterminate.
    pub fn value(&self) -> Option<f64> {
        self.value
            .get()
            .map(|value| value.max(self.min_value).min(self.max_value))
    }

    /// Completion between 0 and 1; 0 while indeterminate or when the range
    /// is empty.
    pub fn percentage(&self) -> f64 {
        let span = self.max_value - self.min_value;
        match self.value() {
            Some(value) if span > 0.0 => (value - self.min_value) / span,
            _ => 0.0,
        }
    }

    /// The human-readable value; empty while indeterminate.
    pub fn value_label(&self) -> String {
        let Some(value) = self.value() else {
            return String::new();
        };
        let params = ProgressLabelParams {
            value,
            percentage: self.percentage(),
            min_value: self.min_value,
            max_value: self.max_value,
        };
        match &self.format_value_label {
            Some(format) => format(&params),
            None => format!("{}%", format_number((params.percentage * 100.0).round())),
        }
    }

    /// Attributes for the progress bar.
    pub fn progress_attrs(&self) -> ProgressAttrs {
        let label = self.value_label();
        ProgressAttrs {
            role: AriaRole::ProgressBar,
            aria_valuenow: self.value(),
            aria_valuemin: self.min_value,
            aria_valuemax: self.max_value,
            aria_valuetext: (!label.is_empty()).then_some(label),
        }
    }
}

impl fmt::Debug for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Progress")
            .field("min_value", &self.min_value)
            .field("max_value", &self.max_value)
            .field("value", &self.value.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_attrs() {
        let progress = Progress::new(ProgressConfig::new());
        assert_eq!(
            progress.progress_attrs().to_pairs(),
            vec![
                ("aria-valuenow", "0".to_string()),
                ("aria-valuemin", "0".to_string()),
                ("aria-valuemax", "100".to_string()),
                ("aria-valuetext", "0%".to_string()),
                ("role", "progressbar".to_string()),
            ]
        );
    }

    #[test]
    fn test_value_is_clamped() {
        let progress = Progress::new(ProgressConfig::new().with_value(Some(200.0)));
        assert_eq!(progress.value(), Some(100.0));
        assert_eq!(progress.value_label(), "100%");

        progress.set_value(Some(-100.0));
        let attrs = progress.progress_attrs();
        assert_eq!(attrs.aria_valuenow, Some(0.0));
        assert_eq!(attrs.aria_valuetext.as_deref(), Some("0%"));
        assert_eq!(progress.value_store().get(), Some(-100.0));
    }

    #[test]
    fn test_custom_label() {
        let progress = Progress::new(
            ProgressConfig::new()
                .with_value(Some(25.0))
                .with_format_value_label(|params| {
                    format!("{} of {}", params.value, params.max_value)
                }),
        );
        assert_eq!(progress.value_label(), "25 of 100");
    }

    #[test]
    fn test_percentage_uses_range() {
        let progress = Progress::new(
            ProgressConfig::new()
                .with_range(10.0, 20.0)
                .with_value(Some(12.5)),
        );
        assert_eq!(progress.percentage(), 0.25);
        assert_eq!(progress.value_label(), "25%");

        let empty = Progress::new(ProgressConfig::new().with_range(5.0, 5.0));
        assert_eq!(empty.percentage(), 0.0);
    }

    #[test]
    fn test_indeterminate() {
        let progress = Progress::new(ProgressConfig::new().with_value(None));
        let attrs = progress.progress_attrs();
        assert_eq!(attrs.aria_valuenow, None);
        assert_eq!(attrs.aria_valuetext, None);
        assert_eq!(
            attrs.to_pairs(),
            vec![
                ("aria-valuemin", "0".to_string()),
                ("aria-valuemax", "100".to_string()),
                ("role", "progressbar".to_string()),
            ]
        );
        assert_eq!(progress.percentage(), 0.0);
    }
}
