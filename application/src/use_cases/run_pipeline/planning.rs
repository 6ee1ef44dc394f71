//! Planning phase

use super::{PipelineError, RunPipelineUseCase};
use crate::ports::progress::ProgressNotifier;
use crate::ports::run_logger::RunEvent;
use crate::use_cases::shared::guarded_call;
use scriptorium_domain::{AgentRole, RunPhase, RunState};
use serde_json::json;
use tracing::{info, warn};

impl RunPipelineUseCase {
    /// Ask the planner for research questions and seed the run's steps.
    ///
    /// Any planner failure (timeout included) is fatal for the run.
    pub(super) async fn phase_planning(
        &self,
        state: &mut RunState,
        progress: &dyn ProgressNotifier,
    ) -> Result<(), PipelineError> {
        info!("Phase: Planning");
        progress.on_phase_start(&RunPhase::Planning, 1);

        let result = guarded_call(
            AgentRole::Planner,
            self.planner.plan(state.topic(), self.params.max_plan_steps),
            self.params.call_timeout,
            &self.cancellation_token,
        )
        .await;
        progress.on_phase_complete(&RunPhase::Planning);

        let mut questions = match result {
            Ok(questions) => questions,
            Err(PipelineError::Cancelled) => return Err(PipelineError::Cancelled),
            Err(e) => {
                warn!("Planner failed: {}", e);
                return Err(PipelineError::Planning(e.to_string()));
            }
        };
        questions.retain(|q| !q.trim().is_empty());
        questions.truncate(self.params.max_plan_steps);
        if questions.is_empty() {
            return Err(PipelineError::Planning(
                "planner returned no research questions".to_string(),
            ));
        }

        info!("Planned {} research steps", questions.len());
        self.run_logger.log(RunEvent::new(
            "plan_generated",
            json!({ "questions": questions }),
        ));
        state.set_plan(&questions);
        Ok(())
    }
}
