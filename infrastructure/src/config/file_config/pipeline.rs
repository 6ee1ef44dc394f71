//! Controller settings from TOML (`[pipeline]` and `[editor]` sections)

use scriptorium_application::PipelineParams;
use scriptorium_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Controller loop settings
///
/// ```toml
/// [pipeline]
/// max_iterations = 3
/// concurrency_limit = 3
/// call_timeout_secs = 120
/// max_plan_steps = 5
/// abort_on_empty_evidence = false
/// reflection_retries = 1
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePipelineConfig {
    pub max_iterations: u32,
    pub concurrency_limit: usize,
    pub call_timeout_secs: u64,
    pub max_plan_steps: usize,
    pub abort_on_empty_evidence: bool,
    pub reflection_retries: u32,
}

impl Default for FilePipelineConfig {
    fn default() -> Self {
        let params = PipelineParams::default();
        Self {
            max_iterations: params.max_iterations,
            concurrency_limit: params.concurrency_limit,
            call_timeout_secs: params.call_timeout.as_secs(),
            max_plan_steps: params.max_plan_steps,
            abort_on_empty_evidence: params.abort_on_empty_evidence,
            reflection_retries: params.reflection_retries,
        }
    }
}

impl FilePipelineConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        let at_least_one = [
            ("pipeline.max_iterations", self.max_iterations as u64),
            ("pipeline.concurrency_limit", self.concurrency_limit as u64),
            ("pipeline.call_timeout_secs", self.call_timeout_secs),
            ("pipeline.max_plan_steps", self.max_plan_steps as u64),
        ];
        for (key, value) in at_least_one {
            if value == 0 {
                issues.push(ConfigIssue::error(key, "must be at least 1"));
            }
        }
        if self.reflection_retries > 5 {
            issues.push(ConfigIssue::warning(
                "pipeline.reflection_retries",
                "more than 5 retries per call multiplies gateway cost",
            ));
        }
        issues
    }
}

/// Editor approval criteria
///
/// ```toml
/// [editor]
/// criteria = ["Every research question is addressed", "Costs are quantified"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEditorConfig {
    /// `None` uses the built-in criteria
    pub criteria: Option<Vec<String>>,
}

impl FileEditorConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        match &self.criteria {
            Some(criteria) if criteria.iter().all(|c| c.trim().is_empty()) => {
                vec![ConfigIssue::warning(
                    "editor.criteria",
                    "no criteria given, using the built-in ones",
                )]
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_pipeline_params() {
        let config = FilePipelineConfig::default();
        assert_eq!(config.max_iterations, 3);
        assert_eq!(config.call_timeout_secs, 120);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_zero_values_are_errors() {
        let config = FilePipelineConfig {
            concurrency_limit: 0,
            call_timeout_secs: 0,
            ..Default::default()
        };
        let keys: Vec<String> = config.validate().into_iter().map(|i| i.key).collect();
        assert_eq!(
            keys,
            vec!["pipeline.concurrency_limit", "pipeline.call_timeout_secs"]
        );
    }
}
