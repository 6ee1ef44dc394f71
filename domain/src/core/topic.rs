//! Topic value object

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// The research topic of a run (Value Object)
///
/// Created once at run start and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    content: String,
}

impl Topic {
    /// Create a topic, rejecting empty or whitespace-only input.
    pub fn new(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidTopic(
                "topic cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            content: trimmed.to_string(),
        })
    }

    /// Get the topic text
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl TryFrom<&str> for Topic {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Topic::new(s)
    }
}

impl TryFrom<String> for Topic {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Topic::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_creation_trims() {
        let topic = Topic::new("  Nuclear Fusion by 2040 ").unwrap();
        assert_eq!(topic.content(), "Nuclear Fusion by 2040");
    }

    #[test]
    fn test_empty_topic_rejected() {
        assert!(Topic::new("").is_err());
        assert!(Topic::new("   \n").is_err());
    }

    #[test]
    fn test_try_from_str() {
        let topic: Topic = "Solid-state batteries".try_into().unwrap();
        assert_eq!(topic.to_string(), "Solid-state batteries");
    }
}
