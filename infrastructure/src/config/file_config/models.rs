//! Role model bindings from TOML (`[models]` and `[roles.<role>]` sections)

use scriptorium_domain::{AgentRole, ConfigIssue, Model, RoleConfig, RoleConfigs};
use serde::{Deserialize, Serialize};

/// Model per role
///
/// # Example
///
/// ```toml
/// [models]
/// planner = "o4-mini"      # Breaks the topic into questions
/// researcher = "gpt-4o"    # Answers each question with sources
/// writer = "gpt-4o"        # Drafts the report
/// editor = "o4-mini"       # Approves or rejects drafts
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelsConfig {
    pub planner: Option<String>,
    pub researcher: Option<String>,
    pub writer: Option<String>,
    pub editor: Option<String>,
}

impl FileModelsConfig {
    fn raw(&self, role: AgentRole) -> Option<&String> {
        match role {
            AgentRole::Planner => self.planner.as_ref(),
            AgentRole::Researcher => self.researcher.as_ref(),
            AgentRole::Writer => self.writer.as_ref(),
            AgentRole::Editor => self.editor.as_ref(),
        }
    }

    /// Configured model for `role`, or the role's default.
    pub fn model_for(&self, role: AgentRole) -> Model {
        match self.raw(role) {
            Some(name) if !name.trim().is_empty() => {
                let Ok(model) = name.trim().parse::<Model>();
                model
            }
            _ => role.default_model(),
        }
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        AgentRole::ALL
            .into_iter()
            .filter(|role| self.raw(*role).is_some_and(|name| name.trim().is_empty()))
            .map(|role| {
                ConfigIssue::error(
                    format!("models.{}", role.as_str()),
                    "model name cannot be empty",
                )
            })
            .collect()
    }
}

/// Sampling and instruction overrides for one role
///
/// ```toml
/// [roles.writer]
/// temperature = 0.5
/// instructions = "Write for a policy audience."
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRoleConfig {
    pub temperature: Option<f32>,
    /// Replaces the role's built-in system prompt
    pub instructions: Option<String>,
}

impl FileRoleConfig {
    /// Build the role's binding for `model` with these overrides applied.
    ///
    /// A temperature set for a reasoning model is dropped.
    pub fn apply(&self, role: AgentRole, model: Model) -> RoleConfig {
        let reasoning = model.is_reasoning();
        let mut config = RoleConfig::new(role, model);
        if let Some(temperature) = self.temperature
            && !reasoning
        {
            config = config.with_temperature(Some(temperature));
        }
        if let Some(instructions) = &self.instructions
            && !instructions.trim().is_empty()
        {
            config = config.with_system_prompt(instructions.trim());
        }
        config
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRolesConfig {
    pub planner: FileRoleConfig,
    pub researcher: FileRoleConfig,
    pub writer: FileRoleConfig,
    pub editor: FileRoleConfig,
}

impl FileRolesConfig {
    pub fn get(&self, role: AgentRole) -> &FileRoleConfig {
        match role {
            AgentRole::Planner => &self.planner,
            AgentRole::Researcher => &self.researcher,
            AgentRole::Writer => &self.writer,
            AgentRole::Editor => &self.editor,
        }
    }

    /// `resolved` is the final binding, used to spot ignored temperatures.
    pub fn validate(&self, resolved: &RoleConfigs) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        for role in AgentRole::ALL {
            let Some(temperature) = self.get(role).temperature else {
                continue;
            };
            let key = format!("roles.{}.temperature", role.as_str());
            if !(0.0..=2.0).contains(&temperature) {
                issues.push(ConfigIssue::error(key, "must be between 0.0 and 2.0"));
            } else if resolved.get(role).model.is_reasoning() {
                issues.push(ConfigIssue::warning(
                    key,
                    format!(
                        "ignored: {} does not accept a temperature",
                        resolved.get(role).model
                    ),
                ));
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_for_falls_back_to_role_default() {
        let config = FileModelsConfig {
            writer: Some("openai:gpt-5".to_string()),
            ..Default::default()
        };
        assert_eq!(config.model_for(AgentRole::Writer), Model::Gpt5);
        assert_eq!(config.model_for(AgentRole::Planner), Model::O4Mini);
        assert_eq!(
            config.model_for(AgentRole::Researcher),
            AgentRole::Researcher.default_model()
        );
    }

    #[test]
    fn test_empty_model_name_is_an_error() {
        let config = FileModelsConfig {
            editor: Some("  ".to_string()),
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].key, "models.editor");
        assert!(issues[0].is_error());
        assert_eq!(config.model_for(AgentRole::Editor), Model::O4Mini);
    }

    #[test]
    fn test_reasoning_model_temperature_is_dropped_with_warning() {
        let roles = FileRolesConfig {
            planner: FileRoleConfig {
                temperature: Some(0.2),
                instructions: None,
            },
            ..Default::default()
        };
        let config = roles.planner.apply(AgentRole::Planner, Model::O4Mini);
        assert_eq!(config.temperature, None);

        let issues = roles.validate(&RoleConfigs::default());
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
    }

    #[test]
    fn test_out_of_range_temperature() {
        let roles = FileRolesConfig {
            writer: FileRoleConfig {
                temperature: Some(3.5),
                instructions: None,
            },
            ..Default::default()
        };
        let issues = roles.validate(&RoleConfigs::default());
        assert_eq!(issues[0].key, "roles.writer.temperature");
        assert!(issues[0].is_error());
    }
}
