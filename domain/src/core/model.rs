//! Model value object representing an LLM model

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Language models a pipeline role can be bound to (Value Object)
///
/// Identifiers are passed verbatim to the model gateway, so any
/// provider-specific name is accepted through [`Model::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    // OpenAI reasoning models
    O4Mini,
    O3,
    // OpenAI chat models
    Gpt4o,
    Gpt41,
    Gpt5,
    // Claude models
    ClaudeSonnet45,
    ClaudeOpus45,
    // Custom
    Custom(String),
}

impl Model {
    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            Model::O4Mini => "o4-mini",
            Model::O3 => "o3",
            Model::Gpt4o => "gpt-4o",
            Model::Gpt41 => "gpt-4.1",
            Model::Gpt5 => "gpt-5",
            Model::ClaudeSonnet45 => "claude-sonnet-4.5",
            Model::ClaudeOpus45 => "claude-opus-4.5",
            Model::Custom(s) => s,
        }
    }

    /// Reasoning models reject a custom sampling temperature.
    pub fn is_reasoning(&self) -> bool {
        matches!(self, Model::O4Mini | Model::O3)
    }

    /// Check if this is a Claude model
    pub fn is_claude(&self) -> bool {
        matches!(self, Model::ClaudeSonnet45 | Model::ClaudeOpus45)
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::Gpt4o
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        // Provider-prefixed names ("openai:gpt-4o") resolve to the bare model.
        let bare = s.rsplit_once(':').map(|(_, m)| m).unwrap_or(s);
        Ok(match bare {
            "o4-mini" => Model::O4Mini,
            "o3" => Model::O3,
            "gpt-4o" => Model::Gpt4o,
            "gpt-4.1" => Model::Gpt41,
            "gpt-5" => Model::Gpt5,
            "claude-sonnet-4.5" => Model::ClaudeSonnet45,
            "claude-opus-4.5" => Model::ClaudeOpus45,
            _ => Model::Custom(s.to_string()),
        })
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let Ok(model) = s.parse::<Model>();
        Ok(model)
    }
}
