//! Pipeline run: the state machine phases, the controller-owned run state,
//! and the artifacts a finished run produces.

pub mod phase;
pub mod report;
pub mod state;

pub use phase::RunPhase;
pub use report::{
    AbortKind, AbortReason, FailedStep, FinalReport, RecoverableError, RecoverableErrorKind,
    ReportAnnotation, ReportCitation, RunMetadata, RunOutcome,
};
pub use state::RunState;
