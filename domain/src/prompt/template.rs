//! Prompt templates for the research pipeline

use crate::drafting::{Draft, Revision};
use crate::evaluation::EvaluatedFinding;
use crate::research::entities::ResearchStep;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    // ==================== Planner ====================

    pub fn planner_system() -> &'static str {
        r#"You are a research planner.
Break a topic into a short sequence of focused, answerable research questions.
Each question should cover a distinct aspect of the topic and be searchable on its own."#
    }

    /// User prompt for research planning
    pub fn planner_prompt(topic: &str, max_steps: usize) -> String {
        format!(
            r#"Plan the research for the following topic:

{topic}

Return at most {max_steps} research questions as a JSON array of strings, for example:
["First question?", "Second question?"]

Return only the JSON array."#
        )
    }

    // ==================== Researcher ====================

    pub fn researcher_system() -> &'static str {
        r#"You are a meticulous research assistant.
Answer research questions with concrete, sourced findings.
Prefer primary sources, peer-reviewed work and official publications.
Never invent a URL. If you cannot find a source for a claim, leave the claim out."#
    }

    /// User prompt for one research step. `date` anchors "recent" to the run date.
    pub fn researcher_prompt(question: &str, date: &str) -> String {
        format!(
            r#"Today is {date}.

Research question: {question}

Report your findings as a JSON array of objects with the fields:
- "text": the finding, one or two sentences
- "url": the http(s) URL of the source
- "snippet": a short quote or excerpt from the source

Example:
```json
[{{"text": "...", "url": "https://...", "snippet": "..."}}]
```"#
        )
    }

    // ==================== Writer ====================

    pub fn writer_system() -> &'static str {
        r#"You are a scientific writer.
Write clear, well-structured research reports in markdown.
Every factual statement must be supported by one of the provided sources.
Use only the sources you are given."#
    }

    /// Numbered source list shared by the writer and editor prompts.
    pub fn format_sources(findings: &[EvaluatedFinding]) -> String {
        findings
            .iter()
            .enumerate()
            .map(|(i, f)| {
                format!(
                    "[{}] {}\n    URL: {}\n    Excerpt: {}",
                    i + 1,
                    f.finding.text,
                    f.url(),
                    f.finding.citation.snippet
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// User prompt for the writer.
    ///
    /// On a revision, `revision` carries the previous draft and the verdict
    /// that rejected it.
    pub fn writer_prompt(
        topic: &str,
        findings: &[EvaluatedFinding],
        revision: Option<Revision<'_>>,
    ) -> String {
        let mut prompt = format!(
            r#"Topic: {topic}

Sources:
{}

"#,
            Self::format_sources(findings)
        );

        match revision {
            Some(revision) if revision.feedback_is_current() => {
                prompt.push_str(&format!(
                    r#"Your previous draft (version {}):

{}

The editor rejected it with this feedback:
{}

Revise the draft to address every point of feedback."#,
                    revision.draft.version,
                    revision.draft.body,
                    revision.verdict.feedback_text()
                ));
            }
            Some(revision) => {
                prompt.push_str(&format!(
                    r#"Your previous draft (version {}, not yet reviewed):

{}

The editor rejected an earlier draft (version {}) with this feedback:
{}

Revise the draft to address any of that feedback it does not already resolve."#,
                    revision.draft.version,
                    revision.draft.body,
                    revision.reviewed_version,
                    revision.verdict.feedback_text()
                ));
            }
            None => {
                prompt.push_str("Write a research report on the topic using these sources.");
            }
        }

        prompt.push_str(
            r#"

Rules:
1. Cite sources inline with their number, e.g. [1].
2. Cite every source at least once.
3. End with a "References" section listing each cited source as "[n] URL".
4. Do not use any URL that is not in the source list."#,
        );

        prompt
    }

    // ==================== Editor ====================

    pub fn editor_system() -> &'static str {
        r#"You are a demanding but fair editor reviewing research reports.
Judge whether a draft is ready to publish.
Be specific: tie every criticism to a section of the draft."#
    }

    /// User prompt for the editor
    pub fn editor_prompt(draft: &Draft, criteria: &[String], steps: &[ResearchStep]) -> String {
        let mut prompt = String::from("The report was meant to answer these research questions:\n");
        for step in steps {
            prompt.push_str(&format!("{}. {}\n", step.id, step.question));
        }

        prompt.push_str(&format!(
            "\nDraft (version {}):\n\n{}\n\nApprove the draft only if it meets all of these criteria:\n",
            draft.version, draft.body
        ));
        for criterion in criteria {
            prompt.push_str(&format!("- {criterion}\n"));
        }

        prompt.push_str(
            r#"
Respond with JSON:
```json
{"approved": false, "feedback": [{"section": "Introduction", "comment": "..."}]}
```
Leave "feedback" empty only when approving."#,
        );

        prompt
    }

    /// Default approval criteria when none are configured.
    pub fn default_editor_criteria() -> Vec<String> {
        [
            "Every research question is addressed",
            "Claims are supported by the cited sources",
            "The structure is logical and the prose is clear",
            "The References section matches the inline citations",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drafting::{EditorVerdict, ReviewComment};
    use crate::research::entities::{Citation, Finding};

    fn evaluated(url: &str) -> EvaluatedFinding {
        EvaluatedFinding {
            finding: Finding::new("1", "Tokamaks confine plasma", Citation::new(url, "magnetic").unwrap()),
            quality_score: 1.0,
            included: true,
        }
    }

    #[test]
    fn test_planner_prompt_format() {
        let prompt = PromptTemplate::planner_prompt("Fusion energy", 4);
        assert!(prompt.contains("Fusion energy"));
        assert!(prompt.contains("at most 4"));
    }

    #[test]
    fn test_researcher_prompt_includes_date() {
        let prompt = PromptTemplate::researcher_prompt("What is ITER?", "2026-10-19");
        assert!(prompt.contains("Today is 2026-10-19"));
        assert!(prompt.contains("What is ITER?"));
        assert!(prompt.contains(r#"{"text": "...""#));
    }

    #[test]
    fn test_writer_prompt_numbers_sources() {
        let findings = vec![evaluated("https://iter.org/a"), evaluated("https://arxiv.org/b")];
        let prompt = PromptTemplate::writer_prompt("Fusion", &findings, None);
        assert!(prompt.contains("[1] Tokamaks"));
        assert!(prompt.contains("URL: https://arxiv.org/b"));
        assert!(!prompt.contains("previous draft"));
    }

    #[test]
    fn test_writer_prompt_revision() {
        let draft = Draft::new(1, "Old body", vec![]);
        let verdict = EditorVerdict::reject(vec![ReviewComment::new("Intro", "Too short")]);
        let revision = Revision {
            draft: &draft,
            verdict: &verdict,
            reviewed_version: 1,
        };
        let prompt = PromptTemplate::writer_prompt("Fusion", &[], Some(revision));
        assert!(prompt.contains("previous draft (version 1)"));
        assert!(prompt.contains("Old body"));
        assert!(prompt.contains("[Intro] Too short"));
    }

    #[test]
    fn test_writer_prompt_names_the_reviewed_version() {
        let draft = Draft::new(2, "Unreviewed body", vec![]);
        let verdict = EditorVerdict::reject(vec![ReviewComment::new("Intro", "Too short")]);
        let revision = Revision {
            draft: &draft,
            verdict: &verdict,
            reviewed_version: 1,
        };
        let prompt = PromptTemplate::writer_prompt("Fusion", &[], Some(revision));
        assert!(prompt.contains("(version 2, not yet reviewed)"));
        assert!(prompt.contains("Unreviewed body"));
        assert!(prompt.contains("earlier draft (version 1)"));
        assert!(!prompt.contains("rejected it"));
    }

    #[test]
    fn test_editor_prompt_lists_criteria_and_questions() {
        let draft = Draft::new(2, "Body", vec![]);
        let steps = ResearchStep::from_questions(&["What is ITER?".to_string()]);
        let criteria = PromptTemplate::default_editor_criteria();
        let prompt = PromptTemplate::editor_prompt(&draft, &criteria, &steps);
        assert!(prompt.contains("1. What is ITER?"));
        assert!(prompt.contains("version 2"));
        assert!(prompt.contains("- Every research question is addressed"));
    }
}
