//! Source scoring settings from TOML (`[evaluation]` section)

use scriptorium_domain::evaluation::evaluator::DEFAULT_QUALITY_THRESHOLD;
use scriptorium_domain::{ConfigIssue, DomainTrustPolicy, SourceEvaluator};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Source scoring settings
///
/// ```toml
/// [evaluation]
/// preferred_domains = ["arxiv.org", "nature.com", "iter.org"]
/// low_trust_domains = ["medium.com", "reddit.com"]
/// trusted_tlds = ["gov", "edu", "int"]
/// threshold = 0.5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEvaluationConfig {
    /// `None` uses the built-in list
    pub preferred_domains: Option<Vec<String>>,
    pub low_trust_domains: Vec<String>,
    /// `None` uses the built-in list
    pub trusted_tlds: Option<Vec<String>>,
    pub threshold: f64,
}

impl Default for FileEvaluationConfig {
    fn default() -> Self {
        Self {
            preferred_domains: None,
            low_trust_domains: Vec::new(),
            trusted_tlds: None,
            threshold: DEFAULT_QUALITY_THRESHOLD,
        }
    }
}

impl FileEvaluationConfig {
    pub fn to_policy(&self) -> DomainTrustPolicy {
        let mut policy = DomainTrustPolicy::default()
            .with_low_trust_domains(normalize(&self.low_trust_domains));
        if let Some(preferred) = &self.preferred_domains {
            policy = policy.with_preferred_domains(normalize(preferred));
        }
        if let Some(tlds) = &self.trusted_tlds {
            policy.trusted_tlds = tlds
                .iter()
                .map(|t| t.trim().trim_start_matches('.').to_lowercase())
                .filter(|t| !t.is_empty())
                .collect();
        }
        policy
    }

    pub fn to_source_evaluator(&self) -> SourceEvaluator {
        SourceEvaluator::new(Arc::new(self.to_policy()), self.threshold)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if !(0.0..=1.0).contains(&self.threshold) {
            issues.push(ConfigIssue::error(
                "evaluation.threshold",
                "must be between 0.0 and 1.0",
            ));
        }
        if self.preferred_domains.as_ref().is_some_and(|d| d.is_empty()) {
            issues.push(ConfigIssue::warning(
                "evaluation.preferred_domains",
                "empty list: no source will score as preferred",
            ));
        }
        issues
    }
}

/// Lower-case and strip `www.` so config entries match citation domains.
fn normalize(domains: &[String]) -> Vec<String> {
    domains
        .iter()
        .map(|d| d.trim().to_lowercase())
        .map(|d| d.strip_prefix("www.").map(str::to_string).unwrap_or(d))
        .filter(|d| !d.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptorium_domain::{Citation, ScoringPolicy};

    #[test]
    fn test_policy_from_config() {
        let config = FileEvaluationConfig {
            preferred_domains: Some(vec!["WWW.Example.org".to_string()]),
            low_trust_domains: vec!["medium.com".to_string()],
            trusted_tlds: Some(vec![".gov".to_string()]),
            threshold: 0.5,
        };
        let policy = config.to_policy();
        assert_eq!(policy.preferred_domains, vec!["example.org".to_string()]);
        assert_eq!(policy.trusted_tlds, vec!["gov".to_string()]);

        let cite = |url: &str| Citation::new(url, "").unwrap();
        assert_eq!(policy.score(&cite("https://docs.example.org/a")), 1.0);
        assert_eq!(policy.score(&cite("https://medium.com/p")), 0.1);
        assert!(!policy.is_preferred(&cite("https://arxiv.org/abs/1")));
    }

    #[test]
    fn test_threshold_range() {
        let config = FileEvaluationConfig {
            threshold: 1.5,
            ..Default::default()
        };
        assert!(config.validate()[0].is_error());
    }
}
