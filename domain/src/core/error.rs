//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid topic: {0}")]
    InvalidTopic(String),

    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Unknown research step: {0}")]
    UnknownStep(String),

    #[error("Step {0} was not researched successfully")]
    StepNotResearched(String),

    #[error("Draft version {got} does not follow version {current}")]
    DraftVersionOutOfOrder { current: u32, got: u32 },

    #[error("Iteration budget of {0} exhausted")]
    IterationBudgetExhausted(u32),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_error_display() {
        let error = DomainError::Cancelled;
        assert_eq!(error.to_string(), "Operation cancelled");
    }

    #[test]
    fn test_is_cancelled_check() {
        assert!(DomainError::Cancelled.is_cancelled());
        assert!(!DomainError::UnknownStep("3".to_string()).is_cancelled());
        assert!(!DomainError::IterationBudgetExhausted(2).is_cancelled());
    }

    #[test]
    fn test_version_error_display() {
        let error = DomainError::DraftVersionOutOfOrder { current: 2, got: 4 };
        assert_eq!(
            error.to_string(),
            "Draft version 4 does not follow version 2"
        );
    }
}
