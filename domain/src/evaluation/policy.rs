//! Citation scoring policies

use crate::research::entities::Citation;
use serde::{Deserialize, Serialize};

/// Strategy that assigns a quality score in `[0.0, 1.0]` to a citation.
///
/// Implementations must be deterministic: the same citation always gets
/// the same score.
pub trait ScoringPolicy: Send + Sync + std::fmt::Debug {
    fn score(&self, citation: &Citation) -> f64;

    /// Whether the citation's domain is on the policy's preferred list.
    fn is_preferred(&self, citation: &Citation) -> bool;
}

/// Domain-list based scoring.
///
/// | Match | Score |
/// |-------|-------|
/// | preferred domain (or a subdomain of one) | `preferred_score` |
/// | low-trust domain | `low_trust_score` |
/// | trusted TLD such as `.gov` | `trusted_tld_score` |
/// | anything else | `unknown_score` |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainTrustPolicy {
    pub preferred_domains: Vec<String>,
    pub low_trust_domains: Vec<String>,
    pub trusted_tlds: Vec<String>,
    pub preferred_score: f64,
    pub trusted_tld_score: f64,
    pub unknown_score: f64,
    pub low_trust_score: f64,
}

impl Default for DomainTrustPolicy {
    fn default() -> Self {
        Self {
            preferred_domains: Self::default_preferred_domains(),
            low_trust_domains: Vec::new(),
            trusted_tlds: vec!["gov".into(), "edu".into(), "int".into()],
            preferred_score: 1.0,
            trusted_tld_score: 0.8,
            unknown_score: 0.4,
            low_trust_score: 0.1,
        }
    }
}

impl DomainTrustPolicy {
    pub fn default_preferred_domains() -> Vec<String> {
        [
            "arxiv.org",
            "nature.com",
            "nasa.gov",
            "science.org",
            "mit.edu",
            "iter.org",
            "iaea.org",
            "iso.org",
            "ieee.org",
            "reuters.com",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    pub fn with_preferred_domains(mut self, domains: Vec<String>) -> Self {
        self.preferred_domains = domains;
        self
    }

    pub fn with_low_trust_domains(mut self, domains: Vec<String>) -> Self {
        self.low_trust_domains = domains;
        self
    }

    fn matches(host: &str, domain: &str) -> bool {
        let domain = domain.trim().trim_start_matches("www.").to_ascii_lowercase();
        !domain.is_empty()
            && (host == domain
                || host
                    .strip_suffix(domain.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.')))
    }

    fn has_trusted_tld(&self, host: &str) -> bool {
        let tld = host.rsplit('.').next().unwrap_or_default();
        self.trusted_tlds
            .iter()
            .any(|t| t.trim_start_matches('.').eq_ignore_ascii_case(tld))
    }
}

impl ScoringPolicy for DomainTrustPolicy {
    fn score(&self, citation: &Citation) -> f64 {
        let host = citation.domain.as_str();
        let score = if self.is_preferred(citation) {
            self.preferred_score
        } else if self
            .low_trust_domains
            .iter()
            .any(|d| Self::matches(host, d))
        {
            self.low_trust_score
        } else if self.has_trusted_tld(host) {
            self.trusted_tld_score
        } else {
            self.unknown_score
        };
        score.clamp(0.0, 1.0)
    }

    fn is_preferred(&self, citation: &Citation) -> bool {
        self.preferred_domains
            .iter()
            .any(|d| Self::matches(&citation.domain, d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cite(url: &str) -> Citation {
        Citation::new(url, "snippet").unwrap()
    }

    #[test]
    fn test_preferred_domain_and_subdomain() {
        let policy = DomainTrustPolicy::default();
        assert_eq!(policy.score(&cite("https://arxiv.org/abs/1")), 1.0);
        assert_eq!(policy.score(&cite("https://export.arxiv.org/abs/1")), 1.0);
        assert!(policy.is_preferred(&cite("https://www.nature.com/x")));
    }

    #[test]
    fn test_suffix_without_dot_is_not_a_subdomain() {
        let policy = DomainTrustPolicy::default();
        let citation = cite("https://fakearxiv.org/abs/1");
        assert!(!policy.is_preferred(&citation));
        assert_eq!(policy.score(&citation), 0.4);
    }

    #[test]
    fn test_trusted_tld_and_low_trust() {
        let policy = DomainTrustPolicy::default()
            .with_low_trust_domains(vec!["contentfarm.example".to_string()]);
        assert_eq!(policy.score(&cite("https://www.energy.gov/fusion")), 0.8);
        assert_eq!(
            policy.score(&cite("https://blog.contentfarm.example/fusion")),
            0.1
        );
        assert_eq!(policy.score(&cite("https://medium.com/@x/fusion")), 0.4);
    }

    #[test]
    fn test_preferred_beats_low_trust() {
        let policy = DomainTrustPolicy::default()
            .with_low_trust_domains(vec!["nature.com".to_string()]);
        assert_eq!(policy.score(&cite("https://nature.com/x")), 1.0);
    }
}
