//! Configuration file loading for scriptorium
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `SCRIPTORIUM_*` environment variables (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./scriptorium.toml` or `./.scriptorium.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/scriptorium/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileEditorConfig, FileEvaluationConfig, FileGatewayConfig,
    FileLoggingConfig, FileModelsConfig, FileOutputConfig, FilePipelineConfig, FileRoleConfig,
    FileRolesConfig,
};
pub use loader::ConfigLoader;
