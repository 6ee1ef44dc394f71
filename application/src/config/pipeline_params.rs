//! Pipeline parameters for the controller loop.
//!
//! [`PipelineParams`] groups the static parameters that control the run
//! loop in [`RunPipelineUseCase`](crate::use_cases::run_pipeline::RunPipelineUseCase).
//! These are application-layer concerns, not domain policy.

use scriptorium_domain::PromptTemplate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Run loop control parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineParams {
    /// Maximum number of writer/editor iterations.
    pub max_iterations: u32,
    /// Maximum number of research steps in flight at once.
    pub concurrency_limit: usize,
    /// Timeout applied to every gateway call.
    pub call_timeout: Duration,
    /// Upper bound on the number of planned research steps.
    pub max_plan_steps: usize,
    /// Abort instead of drafting when evaluation excludes every finding.
    pub abort_on_empty_evidence: bool,
    /// Extra attempts for a failed writer or editor call within one iteration.
    pub reflection_retries: u32,
    /// Approval criteria rendered into the editor prompt.
    pub editor_criteria: Vec<String>,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            max_iterations: 3,
            concurrency_limit: 3,
            call_timeout: Duration::from_secs(120),
            max_plan_steps: 5,
            abort_on_empty_evidence: false,
            reflection_retries: 1,
            editor_criteria: PromptTemplate::default_editor_criteria(),
        }
    }
}

impl PipelineParams {
    // ==================== Builder Methods ====================

    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max.max(1);
        self
    }

    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = limit.max(1);
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_max_plan_steps(mut self, max: usize) -> Self {
        self.max_plan_steps = max.max(1);
        self
    }

    pub fn with_abort_on_empty_evidence(mut self, abort: bool) -> Self {
        self.abort_on_empty_evidence = abort;
        self
    }

    pub fn with_reflection_retries(mut self, retries: u32) -> Self {
        self.reflection_retries = retries;
        self
    }

    pub fn with_editor_criteria(mut self, criteria: Vec<String>) -> Self {
        if !criteria.is_empty() {
            self.editor_criteria = criteria;
        }
        self
    }

    /// Attempts per writer/editor call, including the first.
    pub fn reflection_attempts(&self) -> u32 {
        self.reflection_retries + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PipelineParams::default();
        assert_eq!(params.max_iterations, 3);
        assert_eq!(params.concurrency_limit, 3);
        assert_eq!(params.max_plan_steps, 5);
        assert_eq!(params.reflection_attempts(), 2);
        assert!(!params.editor_criteria.is_empty());
    }

    #[test]
    fn test_builders_clamp_to_one() {
        let params = PipelineParams::default()
            .with_max_iterations(0)
            .with_concurrency_limit(0)
            .with_max_plan_steps(0);
        assert_eq!(params.max_iterations, 1);
        assert_eq!(params.concurrency_limit, 1);
        assert_eq!(params.max_plan_steps, 1);
    }

    #[test]
    fn test_empty_criteria_keep_defaults() {
        let params = PipelineParams::default().with_editor_criteria(vec![]);
        assert_eq!(params.editor_criteria, PromptTemplate::default_editor_criteria());
    }
}
