//! Citation integrity between a draft body and the evaluated findings.
//!
//! The writer is a language model, so the draft body is checked rather than
//! trusted: every URL it cites must be one of the provided findings, and
//! every provided finding must be cited at least once.

use super::entities::{EditorVerdict, ReviewComment};
use crate::evaluation::EvaluatedFinding;
use crate::util::{canonical_url, extract_urls};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Section label for integrity comments.
pub const REFERENCES_SECTION: &str = "References";

/// The draft cites sources it was not given, or drops sources it was given.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "citation integrity violated: {} unknown source(s), {} uncited finding(s)",
    .fabricated.len(),
    .dropped.len()
)]
pub struct CitationIntegrityError {
    /// URLs in the body that match no provided finding
    pub fabricated: Vec<String>,
    /// Provided finding URLs the body never cites
    pub dropped: Vec<String>,
}

impl CitationIntegrityError {
    /// Actionable writer feedback, one comment per violation.
    pub fn to_comments(&self) -> Vec<ReviewComment> {
        let fabricated = self.fabricated.iter().map(|url| {
            ReviewComment::new(
                REFERENCES_SECTION,
                format!("Remove {url}: it is not one of the provided sources."),
            )
        });
        let dropped = self.dropped.iter().map(|url| {
            ReviewComment::new(
                REFERENCES_SECTION,
                format!("Cite {url}: every provided source must appear at least once."),
            )
        });
        fabricated.chain(dropped).collect()
    }

    pub fn to_verdict(&self) -> EditorVerdict {
        EditorVerdict::reject(self.to_comments())
    }
}

/// Outcome of checking a draft body against the provided findings
#[derive(Debug, Clone, PartialEq)]
pub struct CitationCheck {
    /// Provided findings cited by the body, in order of first appearance
    pub cited: Vec<EvaluatedFinding>,
    pub fabricated: Vec<String>,
    pub dropped: Vec<String>,
}

impl CitationCheck {
    pub fn run(body: &str, provided: &[EvaluatedFinding]) -> Self {
        let by_url: HashMap<String, &EvaluatedFinding> = provided
            .iter()
            .map(|f| (canonical_url(f.url()), f))
            .collect();

        let mut cited = Vec::new();
        let mut fabricated = Vec::new();
        let mut seen = HashSet::new();

        for url in extract_urls(body) {
            let key = canonical_url(&url);
            if !seen.insert(key.clone()) {
                continue;
            }
            match by_url.get(&key) {
                Some(finding) => cited.push((*finding).clone()),
                None => fabricated.push(url),
            }
        }

        let mut dropped_seen = HashSet::new();
        let dropped = provided
            .iter()
            .filter(|f| {
                let key = canonical_url(f.url());
                !seen.contains(&key) && dropped_seen.insert(key)
            })
            .map(|f| f.url().to_string())
            .collect();

        Self {
            cited,
            fabricated,
            dropped,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.fabricated.is_empty() && self.dropped.is_empty()
    }

    pub fn error(&self) -> Option<CitationIntegrityError> {
        if self.is_clean() {
            None
        } else {
            Some(CitationIntegrityError {
                fabricated: self.fabricated.clone(),
                dropped: self.dropped.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::research::entities::{Citation, Finding};

    fn evaluated(url: &str) -> EvaluatedFinding {
        EvaluatedFinding {
            finding: Finding::new("1", "text", Citation::new(url, "s").unwrap()),
            quality_score: 1.0,
            included: true,
        }
    }

    #[test]
    fn test_clean_draft_orders_by_first_citation() {
        let provided = vec![
            evaluated("https://arxiv.org/abs/1"),
            evaluated("https://nature.com/a"),
        ];
        let body = "Claim [1].\n\n## References\n1. https://nature.com/a\n2. https://arxiv.org/abs/1/";
        let check = CitationCheck::run(body, &provided);
        assert!(check.is_clean());
        assert_eq!(check.cited.len(), 2);
        assert_eq!(check.cited[0].url(), "https://nature.com/a");
        assert!(check.error().is_none());
    }

    #[test]
    fn test_fabricated_and_dropped_are_reported() {
        let provided = vec![
            evaluated("https://arxiv.org/abs/1"),
            evaluated("https://nature.com/a"),
        ];
        let body = "See https://arxiv.org/abs/1 and https://made-up.example/paper";
        let check = CitationCheck::run(body, &provided);
        assert_eq!(check.fabricated, vec!["https://made-up.example/paper"]);
        assert_eq!(check.dropped, vec!["https://nature.com/a"]);

        let error = check.error().unwrap();
        let verdict = error.to_verdict();
        assert!(!verdict.approved);
        assert_eq!(verdict.feedback.len(), 2);
        assert!(verdict.feedback.iter().all(|c| c.section == REFERENCES_SECTION));
    }

    #[test]
    fn test_url_with_parentheses_is_cited_not_fabricated() {
        let url = "https://en.wikipedia.org/wiki/ITER_(fusion_reactor)";
        let provided = vec![evaluated(url)];
        let body = format!(
            "ITER is under construction [1].\n\n## References\n[1] {url}\n\nSee also ([ITER]({url}))."
        );
        let check = CitationCheck::run(&body, &provided);
        assert!(check.is_clean(), "{:?}", check.error());
        assert_eq!(check.cited.len(), 1);
        assert_eq!(check.cited[0].url(), url);
    }

    #[test]
    fn test_empty_evidence_with_no_urls_is_clean() {
        let check = CitationCheck::run("A best-effort overview without sources.", &[]);
        assert!(check.is_clean());
        assert!(check.cited.is_empty());
    }
}
