//! Console output formatter for run outcomes

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use scriptorium_domain::{AbortReason, FinalReport, RunMetadata, RunOutcome};

/// Formats run outcomes for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete outcome
    pub fn format(outcome: &RunOutcome) -> String {
        match outcome {
            RunOutcome::Completed(report) => Self::format_report(report),
            RunOutcome::Aborted(reason) => Self::format_abort(reason),
        }
    }

    fn format_report(report: &FinalReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Research Report"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Topic:".cyan().bold(),
            report.topic
        ));

        output.push_str(&Self::annotations(&report.metadata));

        output.push('\n');
        output.push_str(report.body.trim_end());
        output.push('\n');

        if !report.citations.is_empty() {
            output.push_str(&Self::section_header("References"));
            for (i, citation) in report.citations.iter().enumerate() {
                output.push_str(&format!(
                    "  [{}] {} {}\n",
                    i + 1,
                    citation.url,
                    format!("({}, {:.2})", citation.domain, citation.quality_score).dimmed()
                ));
            }
        }

        output.push_str(&Self::section_header("Run"));
        output.push_str(&Self::metadata_lines(&report.metadata));

        output.push_str(&Self::footer());
        output
    }

    /// Format an aborted run
    pub fn format_abort(reason: &AbortReason) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {} during {} ({})\n",
            "Run aborted:".red().bold(),
            reason.topic,
            reason.phase,
            reason.kind.as_str()
        ));
        output.push_str(&format!("  {}\n", reason.message));

        output.push_str(&Self::metadata_lines(&reason.metadata));
        output
    }

    /// Format as JSON
    pub fn format_json(outcome: &RunOutcome) -> String {
        serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the terminal state and counts (concise output)
    pub fn format_summary(outcome: &RunOutcome) -> String {
        let mut output = String::new();

        match outcome {
            RunOutcome::Completed(report) => {
                output.push_str(&format!(
                    "{} {}\n",
                    "Completed:".green().bold(),
                    report.topic
                ));
                output.push_str(&format!(
                    "{} {}\n",
                    "References:".dimmed(),
                    report.citations.len()
                ));
            }
            RunOutcome::Aborted(reason) => {
                output.push_str(&format!(
                    "{} {} ({})\n",
                    "Aborted:".red().bold(),
                    reason.topic,
                    reason.kind.as_str()
                ));
                output.push_str(&format!("{} {}\n", "Reason:".dimmed(), reason.message));
            }
        }

        output.push_str(&Self::annotations(outcome.metadata()));
        output.push_str(&Self::metadata_lines(outcome.metadata()));
        output
    }

    fn annotations(metadata: &RunMetadata) -> String {
        metadata
            .annotations
            .iter()
            .map(|a| format!("{} {}\n", "Note:".yellow().bold(), a))
            .collect()
    }

    fn metadata_lines(metadata: &RunMetadata) -> String {
        let mut output = format!(
            "  {} {}/{} succeeded\n  {} {}/{}\n  {} {}\n",
            "Research steps:".dimmed(),
            metadata.steps_succeeded,
            metadata.steps_total,
            "Iterations:".dimmed(),
            metadata.iterations,
            metadata.max_iterations,
            "Draft version:".dimmed(),
            metadata.draft_version
        );

        for step in &metadata.failed_steps {
            output.push_str(&format!(
                "  {} step {} ({}): {}\n",
                "x".red(),
                step.id,
                step.question,
                step.reason
            ));
        }

        if !metadata.recoverable_errors.is_empty() {
            output.push_str(&format!(
                "  {} {}\n",
                "Recovered errors:".dimmed(),
                metadata.recoverable_errors.len()
            ));
        }
        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, outcome: &RunOutcome) -> String {
        Self::format(outcome)
    }

    fn format_json(&self, outcome: &RunOutcome) -> String {
        Self::format_json(outcome)
    }

    fn format_summary(&self, outcome: &RunOutcome) -> String {
        Self::format_summary(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptorium_domain::{
        AbortKind, FailedStep, OutputFormat, ReportAnnotation, ReportCitation, RunPhase, StepId,
    };

    fn metadata(terminal_state: RunPhase) -> RunMetadata {
        RunMetadata {
            iterations: 3,
            max_iterations: 3,
            draft_version: 3,
            steps_total: 2,
            steps_succeeded: 1,
            failed_steps: vec![FailedStep {
                id: StepId::new("2"),
                question: "Who funds ITER?".to_string(),
                reason: "no findings".to_string(),
            }],
            terminal_state,
            annotations: vec![ReportAnnotation::MaxIterationsReached],
            recoverable_errors: Vec::new(),
            source_quality: Vec::new(),
        }
    }

    fn completed() -> RunOutcome {
        RunOutcome::Completed(FinalReport {
            topic: "Fusion energy".to_string(),
            body: "Fusion is years away (https://arxiv.org/abs/1).".to_string(),
            citations: vec![ReportCitation {
                url: "https://arxiv.org/abs/1".to_string(),
                domain: "arxiv.org".to_string(),
                quality_score: 1.0,
            }],
            metadata: metadata(RunPhase::Done),
        })
    }

    #[test]
    fn test_report_lists_references_and_annotations() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::format(&completed());
        assert!(text.contains("Topic: Fusion energy"));
        assert!(text.contains("[1] https://arxiv.org/abs/1 (arxiv.org, 1.00)"));
        assert!(text.contains("Note: max iterations reached"));
        assert!(text.contains("Iterations: 3/3"));
        assert!(text.contains("step 2 (Who funds ITER?): no findings"));
    }

    #[test]
    fn test_abort_is_rendered_with_kind_and_phase() {
        colored::control::set_override(false);
        let outcome = RunOutcome::Aborted(AbortReason {
            topic: "Fusion energy".to_string(),
            kind: AbortKind::NoSuccessfulResearch,
            message: "all 2 research steps failed".to_string(),
            phase: RunPhase::Researching,
            metadata: metadata(RunPhase::Aborted),
        });
        let text = ConsoleFormatter.render(&outcome, OutputFormat::Report);
        assert!(text.contains("during Researching (no_successful_research)"));
        assert!(text.contains("all 2 research steps failed"));

        let summary = ConsoleFormatter.render(&outcome, OutputFormat::Summary);
        assert!(summary.contains("Aborted: Fusion energy (no_successful_research)"));
    }

    #[test]
    fn test_json_is_tagged_by_outcome() {
        let json: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_json(&completed())).unwrap();
        assert_eq!(json["outcome"], "completed");
        assert_eq!(json["metadata"]["terminal_state"], "done");
        assert_eq!(json["citations"][0]["domain"], "arxiv.org");
    }
}
