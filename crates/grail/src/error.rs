//! Error types for Grail widget behaviors.

/// Errors raised by [`SelectionModel`](crate::collections::SelectionModel).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// More than one value was passed to a model in single-selection mode.
    #[error("Cannot pass multiple values into SelectionModel with single-value mode.")]
    MultipleValuesInSingleSelection {
        /// How many values were passed.
        count: usize,
    },
}

/// The main error type for Grail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrailError {
    /// Selection model usage error.
    #[error("Selection error: {0}")]
    Selection(#[from] SelectionError),
}

/// A specialized Result type for Grail operations.
pub type Result<T> = std::result::Result<T, GrailError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_error_message_names_constraint() {
        let err = SelectionError::MultipleValuesInSingleSelection { count: 2 };
        assert_eq!(
            err.to_string(),
            "Cannot pass multiple values into SelectionModel with single-value mode."
        );

        let wrapped: GrailError = err.into();
        assert!(wrapped.to_string().contains("single-value mode"));
    }
}
