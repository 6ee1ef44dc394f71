//! Input and error types for the pipeline use case.

use crate::agents::AgentError;
use scriptorium_domain::{AbortKind, AgentRole, DomainError, Topic};
use thiserror::Error;

/// Errors that end a run early.
///
/// These never escape [`RunPipelineUseCase`](super::RunPipelineUseCase):
/// the controller turns each into an
/// [`AbortReason`](scriptorium_domain::AbortReason).
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Planning failed: {0}")]
    Planning(String),

    #[error("All {0} research steps failed")]
    NoSuccessfulResearch(usize),

    #[error("Evaluation excluded every finding")]
    NoIncludedFindings,

    #[error("{role} call failed: {source}")]
    Agent {
        role: AgentRole,
        #[source]
        source: AgentError,
    },

    #[error("Invalid run state: {0}")]
    InvalidState(#[from] DomainError),
}

impl PipelineError {
    pub fn abort_kind(&self) -> AbortKind {
        match self {
            PipelineError::Cancelled => AbortKind::Cancelled,
            PipelineError::Planning(_) => AbortKind::PlanningError,
            PipelineError::NoSuccessfulResearch(_) => AbortKind::NoSuccessfulResearch,
            PipelineError::NoIncludedFindings => AbortKind::NoIncludedFindings,
            PipelineError::Agent { role, .. } => AbortKind::GatewayFailure { role: *role },
            PipelineError::InvalidState(e) if e.is_cancelled() => AbortKind::Cancelled,
            PipelineError::InvalidState(_) => AbortKind::Internal,
        }
    }
}

/// Input for the RunPipeline use case
#[derive(Debug, Clone)]
pub struct RunPipelineInput {
    /// The topic to research
    pub topic: Topic,
}

impl RunPipelineInput {
    pub fn new(topic: Topic) -> Self {
        Self { topic }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_gateway::GatewayError;

    #[test]
    fn test_abort_kind_mapping() {
        assert_eq!(PipelineError::Cancelled.abort_kind(), AbortKind::Cancelled);
        assert_eq!(
            PipelineError::Planning("empty".into()).abort_kind(),
            AbortKind::PlanningError
        );
        let err = PipelineError::Agent {
            role: AgentRole::Editor,
            source: AgentError::Gateway(GatewayError::Timeout),
        };
        assert_eq!(
            err.abort_kind(),
            AbortKind::GatewayFailure {
                role: AgentRole::Editor
            }
        );
        assert_eq!(
            PipelineError::from(DomainError::UnknownStep("9".into())).abort_kind(),
            AbortKind::Internal
        );
    }
}
