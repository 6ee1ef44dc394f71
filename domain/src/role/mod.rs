//! Agent roles and their model bindings.
//!
//! Every agent in the pipeline is the same gateway-backed adapter; what
//! differs between them is a [`RoleConfig`]: which model answers, with which
//! system instructions and sampling temperature.

use crate::core::model::Model;
use crate::prompt::PromptTemplate;
use serde::{Deserialize, Serialize};

/// Role an agent plays in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Planner,
    Researcher,
    Writer,
    Editor,
}

impl AgentRole {
    pub const ALL: [AgentRole; 4] = [
        AgentRole::Planner,
        AgentRole::Researcher,
        AgentRole::Writer,
        AgentRole::Editor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::Planner => "planner",
            AgentRole::Researcher => "researcher",
            AgentRole::Writer => "writer",
            AgentRole::Editor => "editor",
        }
    }

    /// Default model per role: reasoning models plan and critique,
    /// chat models research and write.
    pub fn default_model(&self) -> Model {
        match self {
            AgentRole::Planner | AgentRole::Editor => Model::O4Mini,
            AgentRole::Researcher | AgentRole::Writer => Model::Gpt4o,
        }
    }

    pub fn default_temperature(&self) -> Option<f32> {
        match self {
            AgentRole::Planner => Some(1.0),
            AgentRole::Researcher => Some(0.3),
            AgentRole::Writer => Some(0.7),
            AgentRole::Editor => Some(0.2),
        }
    }

    pub fn default_system_prompt(&self) -> &'static str {
        match self {
            AgentRole::Planner => PromptTemplate::planner_system(),
            AgentRole::Researcher => PromptTemplate::researcher_system(),
            AgentRole::Writer => PromptTemplate::writer_system(),
            AgentRole::Editor => PromptTemplate::editor_system(),
        }
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Model binding for one role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleConfig {
    pub role: AgentRole,
    pub model: Model,
    pub system_prompt: String,
    /// Sampling temperature; `None` leaves the provider default.
    pub temperature: Option<f32>,
}

impl RoleConfig {
    pub fn new(role: AgentRole, model: Model) -> Self {
        // Reasoning models only accept the provider default temperature.
        let temperature = if model.is_reasoning() {
            None
        } else {
            role.default_temperature()
        };
        Self {
            role,
            model,
            system_prompt: role.default_system_prompt().to_string(),
            temperature,
        }
    }

    pub fn for_role(role: AgentRole) -> Self {
        Self::new(role, role.default_model())
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Role bindings for a whole run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleConfigs {
    pub planner: RoleConfig,
    pub researcher: RoleConfig,
    pub writer: RoleConfig,
    pub editor: RoleConfig,
}

impl Default for RoleConfigs {
    fn default() -> Self {
        Self {
            planner: RoleConfig::for_role(AgentRole::Planner),
            researcher: RoleConfig::for_role(AgentRole::Researcher),
            writer: RoleConfig::for_role(AgentRole::Writer),
            editor: RoleConfig::for_role(AgentRole::Editor),
        }
    }
}

impl RoleConfigs {
    pub fn get(&self, role: AgentRole) -> &RoleConfig {
        match role {
            AgentRole::Planner => &self.planner,
            AgentRole::Researcher => &self.researcher,
            AgentRole::Writer => &self.writer,
            AgentRole::Editor => &self.editor,
        }
    }

    pub fn set(&mut self, config: RoleConfig) {
        match config.role {
            AgentRole::Planner => self.planner = config,
            AgentRole::Researcher => self.researcher = config,
            AgentRole::Writer => self.writer = config,
            AgentRole::Editor => self.editor = config,
        }
    }
}
