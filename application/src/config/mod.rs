//! Application-level configuration.
//!
//! [`PipelineParams`] controls how the run controller behaves: iteration
//! budget, research concurrency, per-call timeouts and retries.

mod pipeline_params;

pub use pipeline_params::PipelineParams;
