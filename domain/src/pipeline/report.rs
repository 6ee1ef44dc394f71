//! Artifacts produced when a run terminates

use super::phase::RunPhase;
use crate::evaluation::{EvaluatedFinding, SourceQuality};
use crate::research::entities::StepId;
use crate::role::AgentRole;
use serde::{Deserialize, Serialize};

/// Notes attached to a completed report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportAnnotation {
    /// The editor never approved; the last draft was emitted at the cap.
    MaxIterationsReached,
    /// The last reflection iteration failed; an earlier draft was emitted.
    ReflectionFailed,
    /// The emitted draft still cites unknown sources or drops provided ones.
    CitationIntegrityUnresolved,
    /// No finding met the quality threshold; the report has no citations.
    NoIncludedEvidence,
}

impl ReportAnnotation {
    pub fn message(&self) -> &str {
        match self {
            ReportAnnotation::MaxIterationsReached => "max iterations reached",
            ReportAnnotation::ReflectionFailed => "final reflection iteration failed",
            ReportAnnotation::CitationIntegrityUnresolved => "citation integrity unresolved",
            ReportAnnotation::NoIncludedEvidence => "no sources met the quality threshold",
        }
    }
}

impl std::fmt::Display for ReportAnnotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// A research step that produced nothing usable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedStep {
    pub id: StepId,
    pub question: String,
    pub reason: String,
}

/// Category of an error the controller absorbed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoverableErrorKind {
    ResearchStepFailure,
    Gateway,
    CitationIntegrity,
}

/// An error absorbed by the controller and kept for the run metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoverableError {
    pub kind: RecoverableErrorKind,
    pub role: AgentRole,
    pub message: String,
}

/// Reference-list entry of the final report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportCitation {
    pub url: String,
    pub domain: String,
    pub quality_score: f64,
}

impl From<&EvaluatedFinding> for ReportCitation {
    fn from(finding: &EvaluatedFinding) -> Self {
        Self {
            url: finding.url().to_string(),
            domain: finding.domain().to_string(),
            quality_score: finding.quality_score,
        }
    }
}

/// Bookkeeping about how a run went
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Reflection iterations performed (including failed ones)
    pub iterations: u32,
    pub max_iterations: u32,
    /// Version of the emitted draft, 0 if none was produced
    pub draft_version: u32,
    pub steps_total: usize,
    pub steps_succeeded: usize,
    pub failed_steps: Vec<FailedStep>,
    pub terminal_state: RunPhase,
    pub annotations: Vec<ReportAnnotation>,
    pub recoverable_errors: Vec<RecoverableError>,
    pub source_quality: Vec<SourceQuality>,
}

/// The boundary artifact of a completed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalReport {
    pub topic: String,
    pub body: String,
    pub citations: Vec<ReportCitation>,
    pub metadata: RunMetadata,
}

impl FinalReport {
    pub fn is_annotated(&self, annotation: &ReportAnnotation) -> bool {
        self.metadata.annotations.contains(annotation)
    }
}

/// Why a run was abandoned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AbortKind {
    /// Planner output was empty or malformed, or the planner call failed.
    PlanningError,
    /// Every research step failed.
    NoSuccessfulResearch,
    /// No finding was included and the run is configured to stop then.
    NoIncludedFindings,
    /// A gateway failure at a stage where it cannot be absorbed.
    GatewayFailure { role: AgentRole },
    Cancelled,
    /// The controller broke one of its own invariants.
    Internal,
}

impl AbortKind {
    pub fn as_str(&self) -> &str {
        match self {
            AbortKind::PlanningError => "planning_error",
            AbortKind::NoSuccessfulResearch => "no_successful_research",
            AbortKind::NoIncludedFindings => "no_included_findings",
            AbortKind::GatewayFailure { .. } => "gateway_failure",
            AbortKind::Cancelled => "cancelled",
            AbortKind::Internal => "internal",
        }
    }
}

/// Structured failure result of an aborted run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbortReason {
    pub topic: String,
    pub kind: AbortKind,
    pub message: String,
    /// Phase the run was in when it aborted
    pub phase: RunPhase,
    pub metadata: RunMetadata,
}

/// What a caller gets back from a run: a report or a reason, never a panic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    Completed(FinalReport),
    Aborted(AbortReason),
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed(_))
    }

    pub fn report(&self) -> Option<&FinalReport> {
        match self {
            RunOutcome::Completed(report) => Some(report),
            RunOutcome::Aborted(_) => None,
        }
    }

    pub fn abort_reason(&self) -> Option<&AbortReason> {
        match self {
            RunOutcome::Completed(_) => None,
            RunOutcome::Aborted(reason) => Some(reason),
        }
    }

    pub fn metadata(&self) -> &RunMetadata {
        match self {
            RunOutcome::Completed(report) => &report.metadata,
            RunOutcome::Aborted(reason) => &reason.metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotation_messages() {
        assert_eq!(
            ReportAnnotation::MaxIterationsReached.to_string(),
            "max iterations reached"
        );
    }

    #[test]
    fn test_abort_kind_serializes_tagged() {
        let json = serde_json::to_value(AbortKind::GatewayFailure {
            role: AgentRole::Writer,
        })
        .unwrap();
        assert_eq!(json["kind"], "gateway_failure");
        assert_eq!(json["role"], "writer");
    }
}
