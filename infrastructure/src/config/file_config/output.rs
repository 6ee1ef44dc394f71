//! Output and logging configuration from TOML (`[output]`, `[logging]` sections)

use scriptorium_domain::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw output configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Output format (uses domain type)
    pub format: Option<OutputFormat>,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

/// Log file locations
///
/// ```toml
/// [logging]
/// file = "~/.local/state/scriptorium/scriptorium.log"   # diagnostic log
/// run_log = "runs/latest.jsonl"                          # run transcript
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Diagnostic (tracing) log file
    pub file: Option<PathBuf>,
    /// JSONL run transcript
    pub run_log: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_deserialize() {
        let toml_str = r#"
[output]
format = "json"

[logging]
run_log = "runs/fusion.jsonl"
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(config.output.color);
        assert_eq!(
            config.logging.run_log,
            Some(PathBuf::from("runs/fusion.jsonl"))
        );
    }
}
