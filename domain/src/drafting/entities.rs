//! Drafting domain entities

use crate::evaluation::EvaluatedFinding;
use serde::{Deserialize, Serialize};

/// Section label used when a comment is not tied to a named section.
pub const GENERAL_SECTION: &str = "General";

/// A versioned report draft produced by the writer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    /// 1 for the first draft, +1 per reflection iteration
    pub version: u32,
    pub body: String,
    /// Findings cited by the body, in order of first citation
    pub citations: Vec<EvaluatedFinding>,
}

impl Draft {
    pub fn new(version: u32, body: impl Into<String>, citations: Vec<EvaluatedFinding>) -> Self {
        Self {
            version,
            body: body.into(),
            citations,
        }
    }
}

/// One actionable editor remark
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewComment {
    pub section: String,
    pub comment: String,
}

impl ReviewComment {
    pub fn new(section: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            comment: comment.into(),
        }
    }

    pub fn general(comment: impl Into<String>) -> Self {
        Self::new(GENERAL_SECTION, comment)
    }
}

impl std::fmt::Display for ReviewComment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.section, self.comment)
    }
}

/// The editor's decision on a draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorVerdict {
    pub approved: bool,
    pub feedback: Vec<ReviewComment>,
}

impl EditorVerdict {
    pub fn approve() -> Self {
        Self {
            approved: true,
            feedback: Vec::new(),
        }
    }

    /// A rejection; an empty comment list is replaced by one general comment
    /// so the writer always has something to act on.
    pub fn reject(feedback: Vec<ReviewComment>) -> Self {
        let feedback = if feedback.is_empty() {
            vec![ReviewComment::general(
                "The draft was not approved; revise it for accuracy, coverage and citations.",
            )]
        } else {
            feedback
        };
        Self {
            approved: false,
            feedback,
        }
    }

    /// Feedback rendered as one comment per line, for the writer prompt.
    pub fn feedback_text(&self) -> String {
        self.feedback
            .iter()
            .map(|c| format!("- {}", c))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// What the writer gets back after a rejection.
///
/// `reviewed_version` trails `draft.version` when the newest draft never got
/// a verdict (its review failed); the feedback then judged an older draft.
#[derive(Debug, Clone, Copy)]
pub struct Revision<'a> {
    pub draft: &'a Draft,
    pub verdict: &'a EditorVerdict,
    pub reviewed_version: u32,
}

impl Revision<'_> {
    /// Whether the feedback was given on the draft being revised.
    pub fn feedback_is_current(&self) -> bool {
        self.reviewed_version == self.draft.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_never_has_empty_feedback() {
        let verdict = EditorVerdict::reject(vec![]);
        assert!(!verdict.approved);
        assert_eq!(verdict.feedback.len(), 1);
        assert_eq!(verdict.feedback[0].section, GENERAL_SECTION);
    }

    #[test]
    fn test_feedback_text() {
        let verdict = EditorVerdict::reject(vec![
            ReviewComment::new("Introduction", "State the 2040 horizon explicitly."),
            ReviewComment::general("Add a conclusion."),
        ]);
        assert_eq!(
            verdict.feedback_text(),
            "- [Introduction] State the 2040 horizon explicitly.\n- [General] Add a conclusion."
        );
    }
}
