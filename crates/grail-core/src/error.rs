//! Error types for Grail core systems.

/// The main error type for Grail core operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// Timer-related error.
    #[error("Timer error: {0}")]
    Timer(#[from] TimerError),
}

/// Timer-specific errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimerError {
    /// The timer ID is invalid, has already fired, or has been stopped.
    #[error("Invalid or expired timer ID")]
    InvalidTimerId,
}

/// A specialized Result type for Grail core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_error_display() {
        let err: CoreError = TimerError::InvalidTimerId.into();
        assert_eq!(err.to_string(), "Timer error: Invalid or expired timer ID");
    }
}
