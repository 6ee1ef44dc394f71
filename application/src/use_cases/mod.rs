//! Use cases (application services)
//!
//! Use cases orchestrate the flow of data to and from domain entities,
//! and direct those entities to use their domain logic.

pub mod run_pipeline;
mod shared;
