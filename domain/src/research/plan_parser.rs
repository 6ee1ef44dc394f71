//! Plan parsing from planner responses.
//!
//! Planners are asked for a JSON array of question strings, but models wrap
//! it in prose, fence it, emit Python-style single quotes, or fall back to a
//! numbered list. Each of these shapes is accepted, in this order:
//!
//! 1. ` ```json ` / ` ```plan ` fenced block holding an array (or an object
//!    with a `steps` / `questions` array)
//! 2. the whole response as JSON
//! 3. the first `[ ... ]` literal anywhere in the text
//! 4. numbered or bulleted lines

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""((?:[^"\\]|\\.)*)"|'((?:[^'\\]|\\.)*)'"#).expect("valid quoted-string regex")
});

static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:\d+[.)]|[-*•])\s+(.+?)\s*$").expect("valid list-item regex")
});

/// Parse planner output into ordered, de-duplicated research questions.
///
/// Returns `None` when nothing usable is found; an empty plan is never
/// returned.
pub fn parse_plan(response: &str) -> Option<Vec<String>> {
    let candidates = parse_fenced(response)
        .or_else(|| parse_json_questions(response.trim()))
        .or_else(|| parse_bracket_literal(response))
        .or_else(|| parse_list_lines(response))?;

    let questions = normalize(candidates);
    if questions.is_empty() {
        None
    } else {
        Some(questions)
    }
}

fn parse_fenced(response: &str) -> Option<Vec<String>> {
    let mut in_block = false;
    let mut block = String::new();

    for line in response.lines() {
        let trimmed = line.trim();
        if !in_block && matches!(trimmed, "```json" | "```plan" | "```") {
            in_block = true;
            block.clear();
        } else if in_block && trimmed == "```" {
            in_block = false;
            if let Some(questions) = parse_json_questions(block.trim()) {
                return Some(questions);
            }
        } else if in_block {
            block.push_str(line);
            block.push('\n');
        }
    }
    None
}

fn parse_json_questions(text: &str) -> Option<Vec<String>> {
    let value = serde_json::from_str::<serde_json::Value>(text).ok()?;
    let array = match &value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(map) => map
            .get("steps")
            .or_else(|| map.get("questions"))
            .and_then(|v| v.as_array())?,
        _ => return None,
    };

    Some(
        array
            .iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Object(obj) => obj
                    .get("question")
                    .and_then(|q| q.as_str())
                    .map(str::to_string),
                _ => None,
            })
            .collect(),
    )
}

fn parse_bracket_literal(response: &str) -> Option<Vec<String>> {
    let start = response.find('[')?;
    let end = response.rfind(']')?;
    if end <= start {
        return None;
    }
    let literal = &response[start..=end];

    if let Some(questions) = parse_json_questions(literal) {
        return Some(questions);
    }

    // Python-style list literal with single or double quotes
    let questions: Vec<String> = QUOTED
        .captures_iter(literal)
        .filter_map(|c| c.get(1).or_else(|| c.get(2)))
        .map(|m| m.as_str().replace("\\'", "'").replace("\\\"", "\""))
        .collect();
    if questions.is_empty() {
        None
    } else {
        Some(questions)
    }
}

fn parse_list_lines(response: &str) -> Option<Vec<String>> {
    let questions: Vec<String> = response
        .lines()
        .filter_map(|line| LIST_ITEM.captures(line))
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect();
    if questions.is_empty() {
        None
    } else {
        Some(questions)
    }
}

fn normalize(questions: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    questions
        .into_iter()
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .filter(|q| seen.insert(q.to_lowercase()))
        .collect()
}
