//! Presentation layer for scriptorium
//!
//! This crate contains CLI definitions, output formatters
//! and progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormatArg};
pub use output::{console::ConsoleFormatter, formatter::OutputFormatter, set_color_enabled};
pub use progress::reporter::{ProgressReporter, SimpleProgress};
