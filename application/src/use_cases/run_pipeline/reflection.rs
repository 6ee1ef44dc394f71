//! Writer/editor reflection loop

use super::{PipelineError, RunPipelineUseCase};
use crate::agents::AgentError;
use crate::ports::progress::ProgressNotifier;
use crate::ports::run_logger::RunEvent;
use crate::use_cases::shared::guarded_call;
use scriptorium_domain::{
    AgentRole, CitationCheck, Draft, EditorVerdict, RecoverableErrorKind, ReportAnnotation,
    RunPhase, RunState,
};
use serde_json::json;
use std::future::Future;
use tracing::{info, warn};

/// What the loop does after a writer or editor call gave up.
enum AfterFailure {
    NextIteration,
    Finish,
}

impl RunPipelineUseCase {
    /// Draft, check and review until approval or the iteration budget runs out.
    ///
    /// Returns `Ok(())` when the current draft should become the final report.
    pub(super) async fn phase_reflection(
        &self,
        state: &mut RunState,
        progress: &dyn ProgressNotifier,
    ) -> Result<(), PipelineError> {
        let included = state.included_findings();
        let max_iterations = state.max_iterations();

        loop {
            let iteration = state.begin_iteration()?;
            info!("Reflection iteration {}/{}", iteration, max_iterations);
            progress.on_iteration_start(iteration, max_iterations);

            // ---- Drafting ----
            progress.on_phase_start(&RunPhase::Drafting, 1);
            let written = {
                let revision = state.revision();
                let topic = state.topic();
                let writer = &self.writer;
                let included = &included;
                self.call_with_retries(
                    AgentRole::Writer,
                    || writer.write(topic, included, revision),
                    progress,
                )
                .await
            };
            progress.on_phase_complete(&RunPhase::Drafting);

            let body = match written {
                Ok(body) => body,
                Err(e) => match self.absorb_failure(state, AgentRole::Writer, e)? {
                    AfterFailure::NextIteration => continue,
                    AfterFailure::Finish => return Ok(()),
                },
            };

            let version = state.next_draft_version();
            let check = CitationCheck::run(&body, &included);
            let draft = Draft::new(version, body, check.cited.clone());
            info!(
                "Draft v{} written ({} citations)",
                version,
                draft.citations.len()
            );
            self.run_logger.log(RunEvent::new(
                "draft_written",
                json!({
                    "version": version,
                    "body": draft.body,
                    "citations": draft.citations.len(),
                    "fabricated": check.fabricated,
                    "dropped": check.dropped,
                }),
            ));
            state.set_draft(draft.clone())?;
            state.transition(RunPhase::Reviewing)?;

            // ---- Reviewing ----
            progress.on_phase_start(&RunPhase::Reviewing, 1);
            let verdict = match check.error() {
                Some(violation) => {
                    warn!("Draft v{} failed the citation check: {}", version, violation);
                    state.record_error(
                        RecoverableErrorKind::CitationIntegrity,
                        AgentRole::Writer,
                        violation.to_string(),
                    );
                    violation.to_verdict()
                }
                None => {
                    let reviewed = {
                        let editor = &self.editor;
                        let criteria = &self.params.editor_criteria;
                        let steps = state.steps();
                        let draft = &draft;
                        self.call_with_retries(
                            AgentRole::Editor,
                            || editor.review(draft, criteria, steps),
                            progress,
                        )
                        .await
                    };
                    match reviewed {
                        Ok(verdict) => verdict,
                        Err(e) => {
                            progress.on_phase_complete(&RunPhase::Reviewing);
                            match self.absorb_failure(state, AgentRole::Editor, e)? {
                                AfterFailure::NextIteration => continue,
                                AfterFailure::Finish => return Ok(()),
                            }
                        }
                    }
                }
            };
            progress.on_phase_complete(&RunPhase::Reviewing);
            progress.on_verdict(version, verdict.approved);
            self.log_verdict(version, &verdict);

            let approved = verdict.approved;
            state.record_verdict(verdict);

            if approved {
                info!("Draft v{} approved", version);
                return Ok(());
            }

            if state.iterations_exhausted() {
                warn!(
                    "Iteration budget of {} exhausted without approval",
                    max_iterations
                );
                state.annotate(ReportAnnotation::MaxIterationsReached);
                if !check.is_clean() {
                    state.annotate(ReportAnnotation::CitationIntegrityUnresolved);
                }
                return Ok(());
            }

            info!("Draft v{} rejected, revising", version);
            state.transition(RunPhase::Drafting)?;
        }
    }

    /// Call a writer/editor operation, retrying failed attempts.
    async fn call_with_retries<T, F, Fut>(
        &self,
        role: AgentRole,
        mut call: F,
        progress: &dyn ProgressNotifier,
    ) -> Result<T, PipelineError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AgentError>>,
    {
        let attempts = self.params.reflection_attempts();
        let mut attempt = 1;
        loop {
            match guarded_call(
                role,
                call(),
                self.params.call_timeout,
                &self.cancellation_token,
            )
            .await
            {
                Ok(value) => return Ok(value),
                Err(PipelineError::Cancelled) => return Err(PipelineError::Cancelled),
                Err(e) if attempt < attempts => {
                    warn!("{} attempt {}/{} failed: {}", role, attempt, attempts, e);
                    attempt += 1;
                    progress.on_retry(role, attempt);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Record a writer/editor failure and decide how the loop continues.
    ///
    /// With budget left the loop moves on to the next iteration. On the last
    /// iteration the previous draft is emitted if there is one; without a
    /// draft the failure ends the run.
    fn absorb_failure(
        &self,
        state: &mut RunState,
        role: AgentRole,
        error: PipelineError,
    ) -> Result<AfterFailure, PipelineError> {
        if matches!(error, PipelineError::Cancelled) {
            return Err(error);
        }

        warn!("Reflection iteration {} failed: {}", state.iteration(), error);
        state.record_error(RecoverableErrorKind::Gateway, role, error.to_string());
        self.run_logger.log(RunEvent::new(
            "iteration_failed",
            json!({
                "iteration": state.iteration(),
                "role": role.as_str(),
                "error": error.to_string(),
            }),
        ));

        if !state.iterations_exhausted() {
            if state.phase() == RunPhase::Reviewing {
                state.transition(RunPhase::Drafting)?;
            }
            return Ok(AfterFailure::NextIteration);
        }

        if state.draft().is_some() {
            state.annotate(ReportAnnotation::ReflectionFailed);
            return Ok(AfterFailure::Finish);
        }

        Err(error)
    }

    fn log_verdict(&self, version: u32, verdict: &EditorVerdict) {
        self.run_logger.log(RunEvent::new(
            "verdict",
            json!({
                "version": version,
                "approved": verdict.approved,
                "feedback": verdict.feedback,
            }),
        ));
    }
}
