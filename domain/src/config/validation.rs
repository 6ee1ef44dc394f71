//! Configuration validation issues.
//!
//! Config loaders check values the type system cannot (ranges, empty lists,
//! unknown names) and report them as [`ConfigIssue`]s. Errors stop startup;
//! warnings are logged and the run proceeds.

use std::fmt;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    pub severity: Severity,
    /// Dotted config key the issue refers to, e.g. `pipeline.max_iterations`
    pub key: String,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn warning(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let issue = ConfigIssue::error("pipeline.max_iterations", "must be at least 1");
        assert!(issue.is_error());
        assert_eq!(issue.to_string(), "pipeline.max_iterations: must be at least 1");
        assert!(!ConfigIssue::warning("editor.criteria", "empty").is_error());
    }
}
