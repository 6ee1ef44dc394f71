//! Domain layer for scriptorium
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Research run
//!
//! A run turns one [`Topic`] into a cited report:
//!
//! - **Plan**: the topic is broken into ordered [`ResearchStep`]s
//! - **Findings**: each step yields [`Finding`]s, each backed by a [`Citation`]
//! - **Evaluation**: a [`ScoringPolicy`] grades every citation; weak ones are excluded
//! - **Reflection**: a writer produces [`Draft`]s and an editor returns
//!   [`EditorVerdict`]s until approval or the iteration budget runs out
//!
//! ## Run state
//!
//! [`RunState`] is the single mutable record of a run. It enforces the
//! [`RunPhase`] transitions, draft versioning and citation traceability, and
//! produces a [`FinalReport`] or [`AbortReason`] at the end.

pub mod config;
pub mod core;
pub mod drafting;
pub mod evaluation;
pub mod pipeline;
pub mod prompt;
pub mod research;
pub mod role;
pub mod util;

// Re-export commonly used types
pub use config::{ConfigIssue, OutputFormat, Severity};
pub use core::{error::DomainError, model::Model, topic::Topic};
pub use drafting::{
    CitationCheck, CitationIntegrityError, Draft, EditorVerdict, ReviewComment, Revision,
    parse_editor_verdict,
};
pub use evaluation::{
    DomainTrustPolicy, EvaluatedFinding, ScoringPolicy, SourceEvaluator, SourceQuality,
};
pub use pipeline::{
    AbortKind, AbortReason, FailedStep, FinalReport, RecoverableError, RecoverableErrorKind,
    ReportAnnotation, ReportCitation, RunMetadata, RunOutcome, RunPhase, RunState,
};
pub use prompt::PromptTemplate;
pub use research::{
    entities::{Citation, Finding, ResearchStep, StepId, StepStatus, domain_of},
    findings_parser::parse_findings,
    plan_parser::parse_plan,
};
pub use role::{AgentRole, RoleConfig, RoleConfigs};
