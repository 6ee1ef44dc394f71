//! Shared text helpers.

use regex::Regex;
use std::sync::LazyLock;

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s\[\]<>"'`]+"#).expect("valid url regex"));

/// Truncate a string to approximately `max_bytes` without splitting a UTF-8
/// character boundary.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// All http(s) URLs in `text`, in order of appearance, without trailing
/// sentence punctuation. Duplicates are kept.
pub fn extract_urls(text: &str) -> Vec<String> {
    URL.find_iter(text)
        .map(|m| {
            let emphasised = text[..m.start()].ends_with('_');
            trim_url(m.as_str(), emphasised).to_string()
        })
        .collect()
}

/// Strip what trails a URL in prose: punctuation, a `)` with no matching `(`
/// and, for `_emphasised_` URLs, the closing underscore.
fn trim_url(url: &str, emphasised: bool) -> &str {
    let mut url = url;
    loop {
        let mut trimmed = url.trim_end_matches(['.', ',', ';', ':', '!', '?', '*']);
        if emphasised {
            trimmed = trimmed.trim_end_matches('_');
        }
        if trimmed.ends_with(')') && trimmed.matches(')').count() > trimmed.matches('(').count() {
            trimmed = &trimmed[..trimmed.len() - 1];
        }
        if trimmed.len() == url.len() {
            return trimmed;
        }
        url = trimmed;
    }
}

/// Normalise a URL for identity comparison: lower-case scheme and host,
/// no trailing slash, no fragment.
pub fn canonical_url(url: &str) -> String {
    let url = url.trim();
    let url = url.split('#').next().unwrap_or(url);
    let url = url.trim_end_matches('/');

    match url.find("://") {
        Some(scheme_end) => {
            let after = scheme_end + 3;
            let host_end = url[after..]
                .find(['/', '?'])
                .map_or(url.len(), |i| after + i);
            format!(
                "{}{}",
                url[..host_end].to_ascii_lowercase(),
                &url[host_end..]
            )
        }
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_ascii() {
        assert_eq!(truncate_str("hello world", 5), "hello");
    }

    #[test]
    fn truncate_multibyte_boundary() {
        let s = "あのね";
        assert_eq!(truncate_str(s, 4), "あ");
    }

    #[test]
    fn extract_urls_strips_punctuation() {
        let text = "See https://arxiv.org/abs/1234. Also (https://nature.com/x), and <https://iter.org>.";
        assert_eq!(
            extract_urls(text),
            vec![
                "https://arxiv.org/abs/1234",
                "https://nature.com/x",
                "https://iter.org"
            ]
        );
    }

    #[test]
    fn extract_urls_from_markdown_link() {
        let text = "[ITER](https://www.iter.org/proj) reached first plasma";
        assert_eq!(extract_urls(text), vec!["https://www.iter.org/proj"]);
    }

    #[test]
    fn extract_urls_keeps_balanced_parentheses() {
        let text = "See [ITER](https://en.wikipedia.org/wiki/ITER_(fusion_reactor)). \
                    Also (https://en.wikipedia.org/wiki/Tokamak_(disambiguation)).";
        assert_eq!(
            extract_urls(text),
            vec![
                "https://en.wikipedia.org/wiki/ITER_(fusion_reactor)",
                "https://en.wikipedia.org/wiki/Tokamak_(disambiguation)"
            ]
        );
    }

    #[test]
    fn extract_urls_keeps_trailing_underscore_unless_emphasised() {
        assert_eq!(
            extract_urls("Data at https://example.org/run_ today"),
            vec!["https://example.org/run_"]
        );
        assert_eq!(
            extract_urls("Read _https://example.org/report_ first"),
            vec!["https://example.org/report"]
        );
    }

    #[test]
    fn canonical_url_ignores_case_slash_and_fragment() {
        assert_eq!(
            canonical_url("HTTPS://Nature.com/Articles/X/#intro"),
            "https://nature.com/Articles/X"
        );
        assert_eq!(
            canonical_url("https://nature.com/Articles/X"),
            canonical_url("https://NATURE.com/Articles/X/")
        );
    }
}
