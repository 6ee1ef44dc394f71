//! Source evaluation: scoring citations by domain trust.
//!
//! Scoring is pluggable through [`ScoringPolicy`]; the default
//! [`DomainTrustPolicy`] grades hosts against configured preferred and
//! low-trust lists. Inclusion is always the same rule regardless of policy:
//! a finding is included iff its score meets the threshold.

pub mod evaluator;
pub mod policy;

pub use evaluator::{EvaluatedFinding, SourceEvaluator, SourceQuality};
pub use policy::{DomainTrustPolicy, ScoringPolicy};
