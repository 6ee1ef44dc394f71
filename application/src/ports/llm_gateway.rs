//! LLM Gateway port
//!
//! Defines the interface for communicating with LLM providers.

use async_trait::async_trait;
use scriptorium_domain::RoleConfig;
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Timeout")]
    Timeout,

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),
}

impl GatewayError {
    /// Whether a second attempt of the same call could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GatewayError::Timeout | GatewayError::RateLimited(_) | GatewayError::Connection(_)
        )
    }
}

/// Gateway for LLM communication
///
/// This port defines how the application layer communicates with LLM providers.
/// Implementations (adapters) live in the infrastructure layer.
///
/// Every call is stateless: the role's system prompt, model and temperature
/// travel with the request, and nothing is remembered between calls.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send one prompt as `role` and return the model's text reply
    async fn invoke(&self, role: &RoleConfig, prompt: &str) -> Result<String, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_errors() {
        assert!(GatewayError::Timeout.is_transient());
        assert!(GatewayError::RateLimited("429".into()).is_transient());
        assert!(!GatewayError::MalformedResponse("no choices".into()).is_transient());
    }
}
