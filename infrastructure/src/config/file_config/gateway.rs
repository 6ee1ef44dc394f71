//! Model gateway endpoint from TOML (`[gateway]` section)

use scriptorium_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// OpenAI-compatible chat-completions endpoint
///
/// ```toml
/// [gateway]
/// base_url = "https://api.openai.com/v1"
/// api_key_env = "OPENAI_API_KEY"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGatewayConfig {
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Inline API key. `api_key_env` is preferred.
    pub api_key: Option<String>,
}

impl Default for FileGatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
        }
    }
}

impl FileGatewayConfig {
    /// The configured key, falling back to the environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.is_empty())
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            issues.push(ConfigIssue::error(
                "gateway.base_url",
                format!("'{}' is not an http(s) URL", self.base_url),
            ));
        }
        if self.api_key.is_some() {
            issues.push(ConfigIssue::warning(
                "gateway.api_key",
                format!("prefer setting {} over storing the key in a file", self.api_key_env),
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_key_wins() {
        let config = FileGatewayConfig {
            api_key: Some("sk-test".to_string()),
            api_key_env: "SCRIPTORIUM_TEST_UNSET_KEY".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key(), Some("sk-test".to_string()));
        assert_eq!(config.validate().len(), 1);
    }

    #[test]
    fn test_invalid_base_url() {
        let config = FileGatewayConfig {
            base_url: "localhost:8080".to_string(),
            ..Default::default()
        };
        assert!(config.validate()[0].is_error());
    }
}
