//! Infrastructure layer for scriptorium
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the HTTP model gateway, the JSONL run
//! transcript, and configuration file loading.

pub mod config;
pub mod gateway;
pub mod logging;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileEditorConfig, FileEvaluationConfig,
    FileGatewayConfig, FileLoggingConfig, FileModelsConfig, FileOutputConfig, FilePipelineConfig,
    FileRoleConfig, FileRolesConfig,
};
pub use gateway::OpenAiCompatibleGateway;
pub use logging::JsonlRunLogger;
