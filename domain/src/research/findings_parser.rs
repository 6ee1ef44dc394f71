//! Finding extraction from researcher responses.
//!
//! The researcher is asked for a JSON array of `{text, url, snippet}`
//! objects. When a model answers in prose instead, every line carrying an
//! http(s) URL becomes a finding, with the line (or the line before it, for
//! bare reference lines) as its text.

use super::entities::{Citation, Finding, StepId};
use crate::util::{canonical_url, extract_urls, truncate_str};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:\d+[.)]|[-*•])\s+").expect("valid list-marker regex"));

/// Upper bound for a fallback snippet taken from free text.
const MAX_SNIPPET_BYTES: usize = 280;

/// Parse the findings a researcher reported for one step.
///
/// Findings without a valid http(s) URL or without text are dropped, and
/// each URL is kept once per step.
pub fn parse_findings(step_id: &StepId, response: &str) -> Vec<Finding> {
    let findings = parse_structured(step_id, response)
        .unwrap_or_else(|| parse_free_text(step_id, response));

    let mut seen = HashSet::new();
    findings
        .into_iter()
        .filter(|f| !f.text.trim().is_empty())
        .filter(|f| seen.insert(canonical_url(f.url())))
        .collect()
}

/// Findings from the first JSON candidate that holds at least one finding
/// object. Prose like `ignition in 2022 [1].` parses as JSON but holds none.
fn parse_structured(step_id: &StepId, response: &str) -> Option<Vec<Finding>> {
    json_candidates(response)
        .into_iter()
        .filter_map(|c| serde_json::from_str::<serde_json::Value>(c).ok())
        .filter_map(|value| findings_from_json(step_id, &value))
        .find(|findings| !findings.is_empty())
}

fn findings_from_json(step_id: &StepId, value: &serde_json::Value) -> Option<Vec<Finding>> {
    let items = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(map) => map
            .get("findings")
            .or_else(|| map.get("results"))
            .and_then(|v| v.as_array())?,
        _ => return None,
    };

    let findings = items
        .iter()
        .filter_map(|item| {
            let obj = item.as_object()?;
            let field = |keys: &[&str]| {
                keys.iter()
                    .find_map(|k| obj.get(*k).and_then(|v| v.as_str()))
                    .map(|s| s.trim().to_string())
            };
            let url = field(&["url", "source", "link"])?;
            let text = field(&["text", "finding", "summary", "claim"])?;
            let snippet = field(&["snippet", "quote", "excerpt"])
                .unwrap_or_else(|| truncate_str(&text, MAX_SNIPPET_BYTES).to_string());
            let citation = Citation::new(url, snippet)?;
            Some(Finding::new(step_id.clone(), text, citation))
        })
        .collect();
    Some(findings)
}

/// Slices of the response that may hold the JSON payload, best first.
fn json_candidates(response: &str) -> Vec<&str> {
    let mut candidates = Vec::new();

    if let Some(start) = response.find("```") {
        let body_start = response[start + 3..]
            .find('\n')
            .map(|i| start + 3 + i + 1);
        if let Some(body_start) = body_start
            && let Some(len) = response[body_start..].find("```")
        {
            candidates.push(response[body_start..body_start + len].trim());
        }
    }

    candidates.push(response.trim());

    for (open, close) in [('[', ']'), ('{', '}')] {
        if let (Some(start), Some(end)) = (response.find(open), response.rfind(close))
            && end > start
        {
            candidates.push(&response[start..=end]);
        }
    }
    candidates
}

fn parse_free_text(step_id: &StepId, response: &str) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut previous_text: Option<String> = None;

    for line in response.lines() {
        let urls = extract_urls(line);
        let mut text = line.to_string();
        for url in &urls {
            text = text.replace(url.as_str(), "");
        }
        let text = clean_line(&text);

        if urls.is_empty() {
            if !text.is_empty() {
                previous_text = Some(text);
            }
            continue;
        }

        // "Source: https://..." lines describe the claim on the line above.
        let body = if is_reference_only(&text) {
            previous_text.clone().unwrap_or_default()
        } else {
            text
        };

        for url in urls {
            let snippet = truncate_str(&body, MAX_SNIPPET_BYTES).to_string();
            if let Some(citation) = Citation::new(url, snippet) {
                findings.push(Finding::new(step_id.clone(), body.clone(), citation));
            }
        }
    }
    findings
}

/// Strip list markers, markdown link scaffolding and emphasis.
fn clean_line(line: &str) -> String {
    let line = line.replace("[]()", "").replace("()", "").replace("<>", "");
    let line = LIST_MARKER.replace(line.trim(), "");
    line.trim()
        .trim_matches(|c: char| matches!(c, '*' | '_' | '[' | ']' | '(' | ')' | ':' | '-'))
        .trim()
        .to_string()
}

fn is_reference_only(text: &str) -> bool {
    let lower = text.to_lowercase();
    let lower = lower.trim_end_matches(':').trim();
    lower.is_empty()
        || matches!(
            lower,
            "source" | "sources" | "url" | "link" | "reference" | "citation" | "see"
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step() -> StepId {
        StepId::new("1")
    }

    #[test]
    fn test_parse_json_array() {
        let response = r#"[
  {"text": "ITER targets first plasma in 2034.", "url": "https://www.iter.org/proj", "snippet": "first plasma 2034"},
  {"text": "No URL here", "url": ""}
]"#;
        let findings = parse_findings(&step(), response);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].citation.domain, "iter.org");
        assert_eq!(findings[0].citation.snippet, "first plasma 2034");
        assert_eq!(findings[0].step_id, step());
    }

    #[test]
    fn test_parse_fenced_object_with_findings_key() {
        let response = r#"Results below.
```json
{"findings": [{"finding": "NIF achieved ignition.", "source": "https://www.llnl.gov/news/ignition"}]}
```"#;
        let findings = parse_findings(&step(), response);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].text, "NIF achieved ignition.");
        assert_eq!(findings[0].citation.snippet, "NIF achieved ignition.");
    }

    #[test]
    fn test_free_text_fallback() {
        let response = "\
1. **Private fusion funding exceeded $6B in 2023** (https://www.fusionindustryassociation.org/report)
2. Tokamak energy confinement records were broken at JET.
   Source: https://www.nature.com/articles/d41586-024-00001
No citation on this line.";
        let findings = parse_findings(&step(), response);
        assert_eq!(findings.len(), 2);
        assert_eq!(
            findings[0].text,
            "Private fusion funding exceeded $6B in 2023"
        );
        assert_eq!(findings[1].citation.domain, "nature.com");
        assert_eq!(
            findings[1].text,
            "Tokamak energy confinement records were broken at JET."
        );
    }

    #[test]
    fn test_prose_with_citation_marker_falls_back_to_free_text() {
        let response = "NIF achieved ignition in 2022 [1].\n\
                        Source: https://www.nature.com/articles/d41586-022-04440-7";
        let findings = parse_findings(&step(), response);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].citation.domain, "nature.com");
        assert!(findings[0].text.starts_with("NIF achieved ignition in 2022"));
    }

    #[test]
    fn test_empty_json_array_falls_back_to_free_text() {
        let response = "```json\n[]\n```\nJET set a fusion energy record https://www.euro-fusion.org/jet";
        let findings = parse_findings(&step(), response);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].citation.domain, "euro-fusion.org");
    }

    #[test]
    fn test_duplicate_urls_are_kept_once() {
        let response = "Claim A https://arxiv.org/abs/1\nClaim B https://arxiv.org/abs/1/";
        assert_eq!(parse_findings(&step(), response).len(), 1);
    }

    #[test]
    fn test_no_urls_yields_no_findings() {
        assert!(parse_findings(&step(), "Fusion is hard.").is_empty());
        assert!(parse_findings(&step(), "").is_empty());
    }
}
