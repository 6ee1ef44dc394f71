//! Output formatter trait

use scriptorium_domain::{OutputFormat, RunOutcome};

/// Trait for rendering run outcomes
pub trait OutputFormatter {
    /// Report body, references and run metadata (or the abort reason)
    fn format(&self, outcome: &RunOutcome) -> String;

    /// Format as JSON
    fn format_json(&self, outcome: &RunOutcome) -> String;

    /// Terminal state, counts and annotations only
    fn format_summary(&self, outcome: &RunOutcome) -> String;

    fn render(&self, outcome: &RunOutcome, format: OutputFormat) -> String {
        match format {
            OutputFormat::Report => self.format(outcome),
            OutputFormat::Summary => self.format_summary(outcome),
            OutputFormat::Json => self.format_json(outcome),
        }
    }
}
