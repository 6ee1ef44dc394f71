//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: language models a role can be bound to
//! - [`topic::Topic`]: the validated research topic of a run
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
pub mod topic;
