//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into domain and
//! application types once the whole file has been validated.

mod evaluation;
mod gateway;
mod models;
mod output;
mod pipeline;

pub use evaluation::FileEvaluationConfig;
pub use gateway::FileGatewayConfig;
pub use models::{FileModelsConfig, FileRoleConfig, FileRolesConfig};
pub use output::{FileLoggingConfig, FileOutputConfig};
pub use pipeline::{FileEditorConfig, FilePipelineConfig};

use scriptorium_application::PipelineParams;
use scriptorium_domain::{ConfigIssue, RoleConfigs, SourceEvaluator};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("invalid configuration:\n{}", format_issues(.0))]
    Invalid(Vec<ConfigIssue>),
}

fn format_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("  - {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Model per role
    pub models: FileModelsConfig,
    /// Per-role sampling and instruction overrides
    pub roles: FileRolesConfig,
    /// Controller loop settings
    pub pipeline: FilePipelineConfig,
    /// Source scoring settings
    pub evaluation: FileEvaluationConfig,
    /// Editor approval criteria
    pub editor: FileEditorConfig,
    /// Model gateway endpoint
    pub gateway: FileGatewayConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Log files
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.models.validate());
        issues.extend(self.roles.validate(&self.to_role_configs()));
        issues.extend(self.pipeline.validate());
        issues.extend(self.evaluation.validate());
        issues.extend(self.editor.validate());
        issues.extend(self.gateway.validate());
        issues
    }

    /// Validate and split the result: errors fail, warnings are returned.
    pub fn check(&self) -> Result<Vec<ConfigIssue>, ConfigValidationError> {
        let (errors, warnings): (Vec<_>, Vec<_>) =
            self.validate().into_iter().partition(ConfigIssue::is_error);
        if errors.is_empty() {
            Ok(warnings)
        } else {
            Err(ConfigValidationError::Invalid(errors))
        }
    }

    /// Resolve the model binding of every role.
    pub fn to_role_configs(&self) -> RoleConfigs {
        let mut configs = RoleConfigs::default();
        for role in scriptorium_domain::AgentRole::ALL {
            let model = self.models.model_for(role);
            configs.set(self.roles.get(role).apply(role, model));
        }
        configs
    }

    pub fn to_pipeline_params(&self) -> PipelineParams {
        PipelineParams::default()
            .with_max_iterations(self.pipeline.max_iterations)
            .with_concurrency_limit(self.pipeline.concurrency_limit)
            .with_call_timeout(self.call_timeout())
            .with_max_plan_steps(self.pipeline.max_plan_steps)
            .with_abort_on_empty_evidence(self.pipeline.abort_on_empty_evidence)
            .with_reflection_retries(self.pipeline.reflection_retries)
            .with_editor_criteria(self.editor.criteria.clone().unwrap_or_default())
    }

    pub fn to_source_evaluator(&self) -> SourceEvaluator {
        self.evaluation.to_source_evaluator()
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.pipeline.call_timeout_secs)
    }
}
