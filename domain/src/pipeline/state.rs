//! Controller-owned run state.
//!
//! [`RunState`] is created when a run starts and mutated only by the pipeline
//! controller as worker results come back. When the run ends it produces a
//! [`FinalReport`] or an [`AbortReason`].

use super::phase::RunPhase;
use super::report::{
    AbortKind, AbortReason, FailedStep, FinalReport, RecoverableError, RecoverableErrorKind,
    ReportAnnotation, ReportCitation, RunMetadata,
};
use crate::core::error::DomainError;
use crate::core::topic::Topic;
use crate::drafting::{Draft, EditorVerdict, Revision};
use crate::evaluation::{EvaluatedFinding, SourceQuality};
use crate::research::entities::{Finding, ResearchStep, StepId, StepStatus};
use crate::role::AgentRole;

#[derive(Debug, Clone)]
pub struct RunState {
    topic: Topic,
    phase: RunPhase,
    steps: Vec<ResearchStep>,
    failed_steps: Vec<FailedStep>,
    findings: Vec<Finding>,
    evaluated: Vec<EvaluatedFinding>,
    source_quality: Vec<SourceQuality>,
    draft: Option<Draft>,
    verdicts: Vec<EditorVerdict>,
    /// Draft version the last verdict judged
    reviewed_version: u32,
    iteration: u32,
    max_iterations: u32,
    annotations: Vec<ReportAnnotation>,
    recoverable_errors: Vec<RecoverableError>,
}

impl RunState {
    pub fn new(topic: Topic, max_iterations: u32) -> Self {
        Self {
            topic,
            phase: RunPhase::Planning,
            steps: Vec::new(),
            failed_steps: Vec::new(),
            findings: Vec::new(),
            evaluated: Vec::new(),
            source_quality: Vec::new(),
            draft: None,
            verdicts: Vec::new(),
            reviewed_version: 0,
            iteration: 0,
            max_iterations: max_iterations.max(1),
            annotations: Vec::new(),
            recoverable_errors: Vec::new(),
        }
    }

    // ==================== Accessors ====================

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn steps(&self) -> &[ResearchStep] {
        &self.steps
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn evaluated(&self) -> &[EvaluatedFinding] {
        &self.evaluated
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    pub fn verdicts(&self) -> &[EditorVerdict] {
        &self.verdicts
    }

    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub fn failed_steps(&self) -> &[FailedStep] {
        &self.failed_steps
    }

    pub fn annotations(&self) -> &[ReportAnnotation] {
        &self.annotations
    }

    pub fn recoverable_errors(&self) -> &[RecoverableError] {
        &self.recoverable_errors
    }

    // ==================== Phase ====================

    pub fn transition(&mut self, next: RunPhase) -> Result<(), DomainError> {
        if !self.phase.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.phase.as_str().to_string(),
                to: next.as_str().to_string(),
            });
        }
        self.phase = next;
        Ok(())
    }

    // ==================== Research ====================

    pub fn set_plan(&mut self, questions: &[String]) {
        self.steps = ResearchStep::from_questions(questions);
    }

    fn step_mut(&mut self, step_id: &StepId) -> Result<&mut ResearchStep, DomainError> {
        self.steps
            .iter_mut()
            .find(|s| &s.id == step_id)
            .ok_or_else(|| DomainError::UnknownStep(step_id.to_string()))
    }

    /// Commit a step's findings. A step with no findings is marked failed.
    ///
    /// Findings are re-attributed to `step_id`, so nothing can be committed
    /// under another step. Returns whether the step was researched.
    pub fn complete_step(
        &mut self,
        step_id: &StepId,
        findings: Vec<Finding>,
    ) -> Result<bool, DomainError> {
        if findings.is_empty() {
            self.fail_step(step_id, "research returned no cited findings")?;
            return Ok(false);
        }
        self.step_mut(step_id)?.mark_researched();
        self.findings.extend(findings.into_iter().map(|mut f| {
            f.step_id = step_id.clone();
            f
        }));
        Ok(true)
    }

    pub fn fail_step(
        &mut self,
        step_id: &StepId,
        reason: impl Into<String>,
    ) -> Result<(), DomainError> {
        let reason = reason.into();
        let step = self.step_mut(step_id)?;
        step.mark_failed();
        let failed = FailedStep {
            id: step.id.clone(),
            question: step.question.clone(),
            reason: reason.clone(),
        };
        self.failed_steps.push(failed);
        self.record_error(
            RecoverableErrorKind::ResearchStepFailure,
            AgentRole::Researcher,
            format!("step {step_id}: {reason}"),
        );
        Ok(())
    }

    pub fn researched_count(&self) -> usize {
        self.steps.iter().filter(|s| s.is_researched()).count()
    }

    pub fn pending_steps(&self) -> Vec<ResearchStep> {
        self.steps
            .iter()
            .filter(|s| s.status == StepStatus::Pending)
            .cloned()
            .collect()
    }

    fn is_researched(&self, step_id: &StepId) -> bool {
        self.steps
            .iter()
            .any(|s| &s.id == step_id && s.is_researched())
    }

    // ==================== Evaluation ====================

    /// Store evaluation results; findings of steps that were not researched
    /// are rejected.
    pub fn apply_evaluation(
        &mut self,
        evaluated: Vec<EvaluatedFinding>,
        source_quality: Vec<SourceQuality>,
    ) -> Result<(), DomainError> {
        if let Some(orphan) = evaluated.iter().find(|e| !self.is_researched(e.step_id())) {
            return Err(DomainError::StepNotResearched(orphan.step_id().to_string()));
        }
        self.evaluated = evaluated;
        self.source_quality = source_quality;
        Ok(())
    }

    /// Included findings of researched steps, in plan order.
    pub fn included_findings(&self) -> Vec<EvaluatedFinding> {
        self.evaluated
            .iter()
            .filter(|e| e.included && self.is_researched(e.step_id()))
            .cloned()
            .collect()
    }

    // ==================== Reflection ====================

    /// Start the next reflection iteration, refusing to exceed the budget.
    pub fn begin_iteration(&mut self) -> Result<u32, DomainError> {
        if self.iteration >= self.max_iterations {
            return Err(DomainError::IterationBudgetExhausted(self.max_iterations));
        }
        self.iteration += 1;
        Ok(self.iteration)
    }

    pub fn iterations_exhausted(&self) -> bool {
        self.iteration >= self.max_iterations
    }

    pub fn next_draft_version(&self) -> u32 {
        self.draft.as_ref().map_or(1, |d| d.version + 1)
    }

    /// Replace the current draft with its successor.
    pub fn set_draft(&mut self, draft: Draft) -> Result<(), DomainError> {
        let current = self.draft.as_ref().map_or(0, |d| d.version);
        if draft.version != current + 1 {
            return Err(DomainError::DraftVersionOutOfOrder {
                current,
                got: draft.version,
            });
        }
        if let Some(orphan) = draft.citations.iter().find(|c| !self.is_researched(c.step_id())) {
            return Err(DomainError::StepNotResearched(orphan.step_id().to_string()));
        }
        self.draft = Some(draft);
        Ok(())
    }

    /// Record the verdict on the current draft.
    pub fn record_verdict(&mut self, verdict: EditorVerdict) {
        self.reviewed_version = self.draft.as_ref().map_or(0, |d| d.version);
        self.verdicts.push(verdict);
    }

    /// Feedback of the most recent verdict, if it was a rejection.
    pub fn pending_feedback(&self) -> Option<&EditorVerdict> {
        self.verdicts.last().filter(|v| !v.approved)
    }

    /// The newest draft paired with the pending feedback and the version it judged.
    pub fn revision(&self) -> Option<Revision<'_>> {
        let draft = self.draft.as_ref()?;
        let verdict = self.pending_feedback()?;
        Some(Revision {
            draft,
            verdict,
            reviewed_version: self.reviewed_version,
        })
    }

    // ==================== Bookkeeping ====================

    pub fn record_error(
        &mut self,
        kind: RecoverableErrorKind,
        role: AgentRole,
        message: impl Into<String>,
    ) {
        self.recoverable_errors.push(RecoverableError {
            kind,
            role,
            message: message.into(),
        });
    }

    pub fn annotate(&mut self, annotation: ReportAnnotation) {
        if !self.annotations.contains(&annotation) {
            self.annotations.push(annotation);
        }
    }

    fn metadata(&self) -> RunMetadata {
        RunMetadata {
            iterations: self.iteration,
            max_iterations: self.max_iterations,
            draft_version: self.draft.as_ref().map_or(0, |d| d.version),
            steps_total: self.steps.len(),
            steps_succeeded: self.researched_count(),
            failed_steps: self.failed_steps.clone(),
            terminal_state: self.phase,
            annotations: self.annotations.clone(),
            recoverable_errors: self.recoverable_errors.clone(),
            source_quality: self.source_quality.clone(),
        }
    }

    // ==================== Termination ====================

    /// Move to `Done` and turn the current draft into the final report.
    pub fn finish(&mut self) -> Result<FinalReport, DomainError> {
        let draft = self.draft.clone().ok_or(DomainError::InvalidTransition {
            from: format!("{} without a draft", self.phase.as_str()),
            to: RunPhase::Done.as_str().to_string(),
        })?;
        self.transition(RunPhase::Done)?;
        Ok(FinalReport {
            topic: self.topic.content().to_string(),
            body: draft.body,
            citations: draft.citations.iter().map(ReportCitation::from).collect(),
            metadata: self.metadata(),
        })
    }

    /// Move to `Aborted` and describe why.
    pub fn abort(&mut self, kind: AbortKind, message: impl Into<String>) -> AbortReason {
        let phase = self.phase;
        if !self.phase.is_terminal() {
            self.phase = RunPhase::Aborted;
        }
        AbortReason {
            topic: self.topic.content().to_string(),
            kind,
            message: message.into(),
            phase,
            metadata: self.metadata(),
        }
    }
}
