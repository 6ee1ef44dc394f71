//! Run Pipeline use case
//!
//! The pipeline controller: drives one topic through planning, research,
//! evaluation and the writer/editor reflection loop, and always returns a
//! [`RunOutcome`], never a raw error.
//!
//! The controller is the only writer of [`RunState`]. Research workers run
//! concurrently and hand their results back; everything else is sequential.

mod planning;
mod reflection;
mod research;
mod types;

pub use types::{PipelineError, RunPipelineInput};

use crate::agents::{Editor, GatewayAgent, Planner, Researcher, Writer};
use crate::config::PipelineParams;
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::run_logger::{NoRunLogger, RunEvent, RunLogger};
use scriptorium_domain::{AbortKind, RoleConfig, RoleConfigs, RunOutcome, RunPhase, RunState, SourceEvaluator};
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Use case for running the research pipeline on one topic
pub struct RunPipelineUseCase {
    planner: Arc<dyn Planner>,
    researcher: Arc<dyn Researcher>,
    writer: Arc<dyn Writer>,
    editor: Arc<dyn Editor>,
    evaluator: SourceEvaluator,
    params: PipelineParams,
    run_logger: Arc<dyn RunLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl RunPipelineUseCase {
    /// Build the pipeline with one [`GatewayAgent`] per role.
    pub fn new(gateway: Arc<dyn LlmGateway>, roles: RoleConfigs) -> Self {
        let agent = |config: RoleConfig| Arc::new(GatewayAgent::new(Arc::clone(&gateway), config));
        Self::with_agents(
            agent(roles.planner),
            agent(roles.researcher),
            agent(roles.writer),
            agent(roles.editor),
        )
    }

    pub fn with_agents(
        planner: Arc<dyn Planner>,
        researcher: Arc<dyn Researcher>,
        writer: Arc<dyn Writer>,
        editor: Arc<dyn Editor>,
    ) -> Self {
        Self {
            planner,
            researcher,
            writer,
            editor,
            evaluator: SourceEvaluator::default(),
            params: PipelineParams::default(),
            run_logger: Arc::new(NoRunLogger),
            cancellation_token: None,
        }
    }

    pub fn with_params(mut self, params: PipelineParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_evaluator(mut self, evaluator: SourceEvaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn with_run_logger(mut self, logger: Arc<dyn RunLogger>) -> Self {
        self.run_logger = logger;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn params(&self) -> &PipelineParams {
        &self.params
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunPipelineInput) -> RunOutcome {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunPipelineInput,
        progress: &dyn ProgressNotifier,
    ) -> RunOutcome {
        info!("Starting research run: {}", input.topic);
        self.run_logger.log(RunEvent::new(
            "run_started",
            json!({
                "topic": input.topic.content(),
                "max_iterations": self.params.max_iterations,
                "concurrency_limit": self.params.concurrency_limit,
            }),
        ));

        let mut state = RunState::new(input.topic, self.params.max_iterations);

        let error = match self.drive(&mut state, progress).await {
            Ok(()) => match state.finish() {
                Ok(report) => {
                    info!(
                        "Run complete: {} iterations, draft v{}, {} citations",
                        report.metadata.iterations,
                        report.metadata.draft_version,
                        report.citations.len()
                    );
                    self.run_logger.log(RunEvent::new(
                        "run_completed",
                        json!({
                            "iterations": report.metadata.iterations,
                            "draft_version": report.metadata.draft_version,
                            "citations": report.citations.len(),
                            "annotations": report.metadata.annotations,
                        }),
                    ));
                    return RunOutcome::Completed(report);
                }
                Err(e) => PipelineError::from(e),
            },
            Err(e) => e,
        };

        let reason = state.abort(error.abort_kind(), error.to_string());
        match reason.kind {
            AbortKind::Cancelled => info!("Run cancelled during {}", reason.phase.display_name()),
            _ => warn!(
                "Run aborted during {}: {}",
                reason.phase.display_name(),
                reason.message
            ),
        }
        self.run_logger.log(RunEvent::new(
            "run_aborted",
            json!({
                "kind": reason.kind.as_str(),
                "phase": reason.phase.as_str(),
                "message": reason.message,
            }),
        ));
        RunOutcome::Aborted(reason)
    }

    async fn drive(
        &self,
        state: &mut RunState,
        progress: &dyn ProgressNotifier,
    ) -> Result<(), PipelineError> {
        self.phase_planning(state, progress).await?;

        state.transition(RunPhase::Researching)?;
        self.phase_research(state, progress).await?;

        state.transition(RunPhase::Evaluating)?;
        self.phase_evaluation(state, progress)?;

        state.transition(RunPhase::Drafting)?;
        self.phase_reflection(state, progress).await
    }
}
