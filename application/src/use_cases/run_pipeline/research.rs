//! Research and evaluation phases

use super::{PipelineError, RunPipelineUseCase};
use crate::ports::progress::ProgressNotifier;
use crate::ports::run_logger::RunEvent;
use crate::use_cases::shared::guarded_call;
use scriptorium_domain::{
    AgentRole, Finding, ReportAnnotation, RunPhase, RunState, SourceQuality, StepId,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

type StepResult = Result<Vec<Finding>, String>;

impl RunPipelineUseCase {
    /// Research every pending step concurrently, bounded by the concurrency limit.
    ///
    /// Results are committed to `state` only after every task has finished,
    /// in plan order. On cancellation the in-flight tasks are aborted and
    /// nothing is committed.
    pub(super) async fn phase_research(
        &self,
        state: &mut RunState,
        progress: &dyn ProgressNotifier,
    ) -> Result<(), PipelineError> {
        let steps = state.pending_steps();
        info!(
            "Phase: Research ({} steps, concurrency {})",
            steps.len(),
            self.params.concurrency_limit
        );
        progress.on_phase_start(&RunPhase::Researching, steps.len());

        let semaphore = Arc::new(Semaphore::new(self.params.concurrency_limit.max(1)));
        let date = chrono::Local::now().format("%Y-%m-%d").to_string();
        let mut join_set = JoinSet::new();

        for step in steps {
            let researcher = Arc::clone(&self.researcher);
            let semaphore = Arc::clone(&semaphore);
            let date = date.clone();
            let timeout = self.params.call_timeout;

            join_set.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let result = guarded_call(
                    AgentRole::Researcher,
                    researcher.research(&step, &date),
                    timeout,
                    &None,
                )
                .await;
                (step.id, result)
            });
        }

        let mut results: HashMap<StepId, StepResult> = HashMap::new();

        loop {
            let joined = if let Some(ref token) = self.cancellation_token {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        join_set.abort_all();
                        return Err(PipelineError::Cancelled);
                    }
                    joined = join_set.join_next() => joined,
                }
            } else {
                join_set.join_next().await
            };

            let Some(joined) = joined else {
                break;
            };

            match joined {
                Ok((step_id, Ok(findings))) => {
                    debug!("Step {} returned {} findings", step_id, findings.len());
                    progress.on_step_complete(&step_id, !findings.is_empty());
                    results.insert(step_id, Ok(findings));
                }
                Ok((step_id, Err(e))) => {
                    warn!("Step {} failed: {}", step_id, e);
                    progress.on_step_complete(&step_id, false);
                    results.insert(step_id, Err(e.to_string()));
                }
                Err(e) => {
                    warn!("Research task join error: {}", e);
                }
            }
        }

        let step_ids: Vec<StepId> = state.steps().iter().map(|s| s.id.clone()).collect();
        for step_id in step_ids {
            match results.remove(&step_id) {
                Some(Ok(findings)) => {
                    let count = findings.len();
                    if state.complete_step(&step_id, findings)? {
                        self.run_logger.log(RunEvent::new(
                            "step_researched",
                            json!({ "step": step_id.as_str(), "findings": count }),
                        ));
                    } else {
                        self.log_step_failure(&step_id, "no cited findings");
                    }
                }
                Some(Err(reason)) => {
                    state.fail_step(&step_id, reason.clone())?;
                    self.log_step_failure(&step_id, &reason);
                }
                None => {
                    let reason = "research task did not complete";
                    state.fail_step(&step_id, reason)?;
                    self.log_step_failure(&step_id, reason);
                }
            }
        }
        progress.on_phase_complete(&RunPhase::Researching);

        let succeeded = state.researched_count();
        info!(
            "Research complete: {}/{} steps succeeded",
            succeeded,
            state.steps().len()
        );
        if succeeded == 0 {
            return Err(PipelineError::NoSuccessfulResearch(state.steps().len()));
        }
        Ok(())
    }

    fn log_step_failure(&self, step_id: &StepId, reason: &str) {
        self.run_logger.log(RunEvent::new(
            "step_failed",
            json!({ "step": step_id.as_str(), "reason": reason }),
        ));
    }

    /// Score every finding and record per-step source quality.
    pub(super) fn phase_evaluation(
        &self,
        state: &mut RunState,
        progress: &dyn ProgressNotifier,
    ) -> Result<(), PipelineError> {
        info!("Phase: Evaluation ({} findings)", state.findings().len());
        progress.on_phase_start(&RunPhase::Evaluating, state.findings().len());

        let evaluated = self.evaluator.evaluate_all(state.findings());
        let quality: Vec<SourceQuality> = state
            .steps()
            .iter()
            .filter(|s| s.is_researched())
            .map(|s| self.evaluator.source_quality(&s.id, state.findings()))
            .collect();

        for q in &quality {
            debug!(
                "Step {}: {}/{} preferred sources ({})",
                q.step_id,
                q.preferred,
                q.total,
                if q.passed { "PASS" } else { "FAIL" }
            );
        }

        let included = evaluated.iter().filter(|e| e.included).count();
        let total = evaluated.len();
        state.apply_evaluation(evaluated, quality)?;
        progress.on_phase_complete(&RunPhase::Evaluating);

        info!("Evaluation: {}/{} findings included", included, total);
        self.run_logger.log(RunEvent::new(
            "evaluation_complete",
            json!({
                "findings": total,
                "included": included,
                "threshold": self.evaluator.threshold(),
            }),
        ));

        if included == 0 {
            warn!(
                "No finding met the quality threshold {}",
                self.evaluator.threshold()
            );
            state.annotate(ReportAnnotation::NoIncludedEvidence);
            if self.params.abort_on_empty_evidence {
                return Err(PipelineError::NoIncludedFindings);
            }
        }
        Ok(())
    }
}
