//! Editor verdict parsing.
//!
//! The editor is asked for `{"approved": bool, "feedback": [...]}`. When the
//! reply is prose, approval falls back to APPROVE / REJECT keyword detection
//! (ambiguous replies count as rejections) and bullet or numbered lines
//! become the comments.

use super::entities::{EditorVerdict, GENERAL_SECTION, ReviewComment};
use regex::Regex;
use std::sync::LazyLock;

static COMMENT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:\d+[.)]|[-*•])\s+(.+?)\s*$").expect("valid comment-line regex")
});

static APPROVAL_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bapprov(?:e|ed|es|al)\b").expect("valid approval regex")
});

static REJECTION_WORDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:reject|revise|disapprov|unapprov)\w*|(?:\b(?:not|cannot|never)|n['’]t)\s+(?:\w+\s+)?approv",
    )
    .expect("valid rejection regex")
});

/// Section prefixes longer than this many words are treated as prose.
const MAX_SECTION_WORDS: usize = 6;

/// Parse an editor response into a verdict.
pub fn parse_editor_verdict(response: &str) -> EditorVerdict {
    if let Some(verdict) = parse_json_verdict(response) {
        return verdict;
    }

    let approved = keyword_approval(response);
    if approved {
        return EditorVerdict::approve();
    }

    let mut comments: Vec<ReviewComment> = response
        .lines()
        .filter_map(|line| COMMENT_LINE.captures(line))
        .filter_map(|c| c.get(1))
        .map(|m| split_section(m.as_str()))
        .collect();

    if comments.is_empty() && !response.trim().is_empty() {
        comments.push(ReviewComment::general(response.trim()));
    }
    EditorVerdict::reject(comments)
}

/// Conservative keyword approval: an approval word present, no rejection or
/// negated approval anywhere.
fn keyword_approval(response: &str) -> bool {
    APPROVAL_WORD.is_match(response) && !REJECTION_WORDING.is_match(response)
}

fn parse_json_verdict(response: &str) -> Option<EditorVerdict> {
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    if end <= start {
        return None;
    }
    let json = serde_json::from_str::<serde_json::Value>(&response[start..=end]).ok()?;

    let approved = match json.get("approved") {
        Some(serde_json::Value::Bool(b)) => *b,
        _ => {
            let verdict = json.get("verdict")?.as_str()?;
            keyword_approval(verdict)
        }
    };

    if approved {
        return Some(EditorVerdict::approve());
    }

    let comments = json
        .get("feedback")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| match item {
                    serde_json::Value::String(s) if !s.trim().is_empty() => {
                        Some(split_section(s))
                    }
                    serde_json::Value::Object(obj) => {
                        let comment = obj.get("comment").and_then(|c| c.as_str())?;
                        let section = obj
                            .get("section")
                            .and_then(|s| s.as_str())
                            .filter(|s| !s.trim().is_empty())
                            .unwrap_or(GENERAL_SECTION);
                        Some(ReviewComment::new(section.trim(), comment.trim()))
                    }
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    Some(EditorVerdict::reject(comments))
}

/// Split `"Section: comment"` / `"[Section] comment"` into a comment.
fn split_section(text: &str) -> ReviewComment {
    let text = text.trim();

    if let Some(rest) = text.strip_prefix('[')
        && let Some((section, comment)) = rest.split_once(']')
        && !comment.trim().is_empty()
    {
        return ReviewComment::new(section.trim(), comment.trim());
    }

    if let Some((head, comment)) = text.split_once(':') {
        let section = head.trim().trim_matches('*').trim();
        if !section.is_empty()
            && !comment.trim().is_empty()
            && section.split_whitespace().count() <= MAX_SECTION_WORDS
        {
            return ReviewComment::new(section, comment.trim());
        }
    }

    ReviewComment::general(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_approval() {
        let verdict = parse_editor_verdict(r#"{"approved": true, "feedback": []}"#);
        assert!(verdict.approved);
        assert!(verdict.feedback.is_empty());
    }

    #[test]
    fn test_json_rejection_with_sections() {
        let response = r#"```json
{"approved": false, "feedback": [
  {"section": "Economics", "comment": "Quantify LCOE estimates."},
  "Timeline: compare ITER and private roadmaps",
  {"comment": "Tighten the conclusion."}
]}
```"#;
        let verdict = parse_editor_verdict(response);
        assert!(!verdict.approved);
        assert_eq!(
            verdict.feedback,
            vec![
                ReviewComment::new("Economics", "Quantify LCOE estimates."),
                ReviewComment::new("Timeline", "compare ITER and private roadmaps"),
                ReviewComment::general("Tighten the conclusion."),
            ]
        );
    }

    #[test]
    fn test_json_verdict_keyword() {
        let verdict = parse_editor_verdict(r#"{"verdict": "APPROVE"}"#);
        assert!(verdict.approved);
    }

    #[test]
    fn test_keyword_approval_in_prose() {
        assert!(parse_editor_verdict("I APPROVE this report.").approved);
    }

    #[test]
    fn test_prose_rejection_collects_bullets() {
        let response = "REVISE.\n- **Introduction**: define commercial viability\n- [Risks] tritium supply is not discussed\n2. Add more recent sources";
        let verdict = parse_editor_verdict(response);
        assert!(!verdict.approved);
        assert_eq!(verdict.feedback.len(), 3);
        assert_eq!(verdict.feedback[0].section, "Introduction");
        assert_eq!(verdict.feedback[1].section, "Risks");
        assert_eq!(verdict.feedback[2].section, GENERAL_SECTION);
    }

    #[test]
    fn test_ambiguous_defaults_to_rejection_with_feedback() {
        let verdict = parse_editor_verdict("The draft has some issues with depth.");
        assert!(!verdict.approved);
        assert_eq!(
            verdict.feedback,
            vec![ReviewComment::general("The draft has some issues with depth.")]
        );
    }

    #[test]
    fn test_cannot_approve() {
        assert!(!parse_editor_verdict("I CANNOT APPROVE this draft.").approved);
    }

    #[test]
    fn test_approve_inside_another_word_is_not_approval() {
        let verdict =
            parse_editor_verdict("I disapprove of this draft; the coverage of step 2 is thin.");
        assert!(!verdict.approved);
        let verdict = parse_editor_verdict("Unapproved: the economics section lacks sources.");
        assert!(!verdict.approved);
    }

    #[test]
    fn test_negated_approval_is_rejection() {
        assert!(!parse_editor_verdict("I don't approve this yet.").approved);
        assert!(!parse_editor_verdict("This cannot be approved as written.").approved);
        assert!(!parse_editor_verdict("Not yet approved: the timeline is missing.").approved);
        assert!(parse_editor_verdict("Approved. Clear and well sourced.").approved);
    }
}
