//! CLI command definitions

use clap::{Parser, ValueEnum};
use scriptorium_domain::OutputFormat;
use std::path::PathBuf;

/// Output format for the final report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    /// Report body, references and run summary
    Report,
    /// Terminal state, counts and annotations only
    Summary,
    /// Machine-readable run outcome
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Report => OutputFormat::Report,
            OutputFormatArg::Summary => OutputFormat::Summary,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

/// CLI arguments for scriptorium
#[derive(Parser, Debug)]
#[command(name = "scriptorium")]
#[command(author, version, about = "Multi-agent research pipeline: topic in, cited report out")]
#[command(long_about = r#"
Scriptorium turns a research topic into a cited report using four model roles.

The run has four stages:
1. Planning: a planner breaks the topic into research questions
2. Research: a researcher answers each question with sourced findings (in parallel)
3. Evaluation: every source is scored by domain trust; weak sources are excluded
4. Reflection: a writer drafts the report and an editor approves or returns
   feedback, until approval or the iteration limit

Configuration files are loaded from (in priority order):
1. SCRIPTORIUM_* environment variables (e.g. SCRIPTORIUM_PIPELINE__MAX_ITERATIONS=5)
2. --config <path>            Explicit config file
3. ./scriptorium.toml         Project-level config
4. ~/.config/scriptorium/config.toml   Global config

Example:
  scriptorium "Commercial viability of fusion energy by 2040"
  scriptorium -o json --max-iterations 5 "Solid-state battery supply chains"
  scriptorium --run-log runs/fusion.jsonl "Fusion energy"
"#)]
pub struct Cli {
    /// The research topic (required unless --show-config is given)
    pub topic: Option<String>,

    /// Output format (overrides [output] format)
    #[arg(short, long, value_enum, value_name = "FORMAT")]
    pub output: Option<OutputFormatArg>,

    /// Maximum writer/editor iterations (overrides [pipeline] max_iterations)
    #[arg(long, value_name = "N")]
    pub max_iterations: Option<u32>,

    /// Maximum research steps in flight (overrides [pipeline] concurrency_limit)
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Minimum source quality score for inclusion (overrides [evaluation] threshold)
    #[arg(long, value_name = "SCORE")]
    pub threshold: Option<f64>,

    /// Write the JSONL run transcript to this file (overrides [logging] run_log)
    #[arg(long, value_name = "PATH")]
    pub run_log: Option<PathBuf>,

    /// Write diagnostic logs to this file (overrides [logging] file)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
