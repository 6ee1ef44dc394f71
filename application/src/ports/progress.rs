//! Progress notification port
//!
//! Defines the interface for reporting progress during a pipeline run.

use scriptorium_domain::{AgentRole, RunPhase, StepId};

/// Callback for progress updates during a pipeline run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinners, plain log lines, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called when the run enters a phase. `total_tasks` is the number of
    /// units of work expected in that phase (steps, or 1).
    fn on_phase_start(&self, phase: &RunPhase, total_tasks: usize);

    /// Called when one research step finishes
    fn on_step_complete(&self, step_id: &StepId, success: bool);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: &RunPhase);

    /// Called at the start of each reflection iteration
    fn on_iteration_start(&self, _iteration: u32, _max_iterations: u32) {}

    /// Called when the editor (or the citation check) has ruled on a draft
    fn on_verdict(&self, _draft_version: u32, _approved: bool) {}

    /// Called before a failed gateway call is retried
    fn on_retry(&self, _role: AgentRole, _attempt: u32) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: &RunPhase, _total_tasks: usize) {}
    fn on_step_complete(&self, _step_id: &StepId, _success: bool) {}
    fn on_phase_complete(&self, _phase: &RunPhase) {}
}
