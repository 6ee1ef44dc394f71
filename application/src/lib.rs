//! Application layer for scriptorium
//!
//! This crate contains use cases, port definitions, role agents and
//! application configuration. It depends only on the domain layer.

pub mod agents;
pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use agents::{AgentError, Editor, GatewayAgent, Planner, Researcher, Writer};
pub use config::PipelineParams;
pub use ports::{
    llm_gateway::{GatewayError, LlmGateway},
    progress::{NoProgress, ProgressNotifier},
    run_logger::{NoRunLogger, RunEvent, RunLogger},
};
pub use use_cases::run_pipeline::{PipelineError, RunPipelineInput, RunPipelineUseCase};
