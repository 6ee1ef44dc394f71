//! OpenAI-compatible chat-completions gateway.
//!
//! Works against any endpoint that speaks `POST {base_url}/chat/completions`
//! (OpenAI, Azure-style proxies, local servers such as Ollama or vLLM).

use async_trait::async_trait;
use reqwest::StatusCode;
use scriptorium_application::{GatewayError, LlmGateway};
use scriptorium_domain::RoleConfig;
use scriptorium_domain::util::truncate_str;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

/// Longest slice of an error body kept in a [`GatewayError`], in bytes
const MAX_ERROR_BODY: usize = 300;

/// Stateless HTTP gateway: every call carries the full role binding.
pub struct OpenAiCompatibleGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiCompatibleGateway {
    /// `timeout` bounds the whole HTTP exchange; the controller applies its
    /// own per-call deadline on top.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("scriptorium/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::Connection(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request_body(role: &RoleConfig, prompt: &str) -> Value {
        let mut body = json!({
            "model": role.model.as_str(),
            "messages": [
                { "role": "system", "content": role.system_prompt },
                { "role": "user", "content": prompt },
            ],
        });
        if let Some(temperature) = role.temperature {
            body["temperature"] = json!(temperature);
        }
        body
    }

    /// Extract `choices[0].message.content` from a completion body.
    fn parse_completion(body: &str) -> Result<String, GatewayError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| GatewayError::MalformedResponse(format!("Invalid JSON: {}", e)))?;

        let choice = value
            .get("choices")
            .and_then(|c| c.get(0))
            .ok_or_else(|| GatewayError::MalformedResponse("No choices in response".into()))?;

        choice
            .get("message")
            .and_then(|m| m.get("content"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| GatewayError::MalformedResponse("Choice has no text content".into()))
    }

    fn map_status(status: StatusCode, body: &str) -> GatewayError {
        let detail = truncate(body);
        match status.as_u16() {
            429 => GatewayError::RateLimited(detail),
            408 | 504 => GatewayError::Timeout,
            401 | 403 => {
                debug!(body = %body, "Authentication failed ({})", status);
                GatewayError::RequestFailed(format!("Authentication failed ({})", status))
            }
            502 | 503 => GatewayError::Connection(format!("Upstream unavailable ({}): {}", status, detail)),
            _ => GatewayError::RequestFailed(format!("HTTP {}: {}", status, detail)),
        }
    }

    fn map_send_error(e: reqwest::Error) -> GatewayError {
        if e.is_timeout() {
            GatewayError::Timeout
        } else if e.is_connect() {
            GatewayError::Connection(e.to_string())
        } else {
            GatewayError::RequestFailed(format!("Request failed: {}", e))
        }
    }
}

fn truncate(body: &str) -> String {
    let body = body.trim();
    let kept = truncate_str(body, MAX_ERROR_BODY);
    if kept.len() < body.len() {
        format!("{}...", kept)
    } else {
        kept.to_string()
    }
}

#[async_trait]
impl LlmGateway for OpenAiCompatibleGateway {
    async fn invoke(&self, role: &RoleConfig, prompt: &str) -> Result<String, GatewayError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = Self::request_body(role, prompt);

        debug!(role = %role.role, model = %role.model, "POST {}", url);

        let mut request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await.map_err(Self::map_send_error)?;
        let status = response.status();
        let text = response.text().await.map_err(Self::map_send_error)?;

        if !status.is_success() {
            return Err(Self::map_status(status, &text));
        }

        Self::parse_completion(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptorium_domain::{AgentRole, Model};

    #[test]
    fn test_request_body_carries_role_binding() {
        let role = RoleConfig::new(AgentRole::Writer, Model::Gpt4o).with_system_prompt("Write.");
        let body = OpenAiCompatibleGateway::request_body(&role, "Topic: fusion");

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "Write.");
        assert_eq!(body["messages"][1]["content"], "Topic: fusion");
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_request_body_omits_temperature_for_reasoning_models() {
        let role = RoleConfig::new(AgentRole::Editor, Model::O4Mini);
        let body = OpenAiCompatibleGateway::request_body(&role, "Review");
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_parse_completion() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"1. What is ITER?"}}]}"#;
        assert_eq!(
            OpenAiCompatibleGateway::parse_completion(body).unwrap(),
            "1. What is ITER?"
        );
    }

    #[test]
    fn test_parse_completion_errors() {
        assert!(matches!(
            OpenAiCompatibleGateway::parse_completion("not json"),
            Err(GatewayError::MalformedResponse(_))
        ));
        assert!(matches!(
            OpenAiCompatibleGateway::parse_completion(r#"{"choices":[]}"#),
            Err(GatewayError::MalformedResponse(_))
        ));
        assert!(matches!(
            OpenAiCompatibleGateway::parse_completion(
                r#"{"choices":[{"message":{"content":null}}]}"#
            ),
            Err(GatewayError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_map_status() {
        assert!(matches!(
            OpenAiCompatibleGateway::map_status(StatusCode::TOO_MANY_REQUESTS, "slow down"),
            GatewayError::RateLimited(msg) if msg == "slow down"
        ));
        assert_eq!(
            OpenAiCompatibleGateway::map_status(StatusCode::GATEWAY_TIMEOUT, ""),
            GatewayError::Timeout
        );
        assert!(OpenAiCompatibleGateway::map_status(StatusCode::SERVICE_UNAVAILABLE, "").is_transient());
        assert!(!OpenAiCompatibleGateway::map_status(StatusCode::BAD_REQUEST, "bad").is_transient());
    }

    #[test]
    fn test_truncate_long_bodies() {
        let long = "x".repeat(1000);
        let short = truncate(&long);
        assert_eq!(short.len(), MAX_ERROR_BODY + 3);
        assert_eq!(truncate("  bad request \n"), "bad request");
    }

    #[test]
    fn test_truncate_keeps_utf8_boundaries() {
        let long = "é".repeat(MAX_ERROR_BODY);
        let short = truncate(&long);
        assert!(short.ends_with("..."));
        assert!(short.len() <= MAX_ERROR_BODY + 3);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let gateway = OpenAiCompatibleGateway::new(
            "http://localhost:11434/v1/",
            None,
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(gateway.base_url(), "http://localhost:11434/v1");
    }
}
