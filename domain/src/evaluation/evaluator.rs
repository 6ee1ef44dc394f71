//! Source evaluator

use super::policy::{DomainTrustPolicy, ScoringPolicy};
use crate::research::entities::{Finding, StepId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Default inclusion threshold for quality scores.
pub const DEFAULT_QUALITY_THRESHOLD: f64 = 0.5;

/// A finding together with its quality verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedFinding {
    pub finding: Finding,
    pub quality_score: f64,
    pub included: bool,
}

impl EvaluatedFinding {
    pub fn url(&self) -> &str {
        self.finding.url()
    }

    pub fn domain(&self) -> &str {
        &self.finding.citation.domain
    }

    pub fn step_id(&self) -> &StepId {
        &self.finding.step_id
    }
}

/// Share of preferred-domain citations among one step's findings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceQuality {
    pub step_id: StepId,
    pub total: usize,
    pub preferred: usize,
    /// `preferred / total`, `0.0` for a step without findings
    pub preferred_share: f64,
    /// More than half of the citations come from preferred domains
    pub passed: bool,
}

/// Scores findings with a [`ScoringPolicy`] and applies the inclusion threshold.
#[derive(Debug, Clone)]
pub struct SourceEvaluator {
    policy: Arc<dyn ScoringPolicy>,
    threshold: f64,
}

impl Default for SourceEvaluator {
    fn default() -> Self {
        Self::new(
            Arc::new(DomainTrustPolicy::default()),
            DEFAULT_QUALITY_THRESHOLD,
        )
    }
}

impl SourceEvaluator {
    pub fn new(policy: Arc<dyn ScoringPolicy>, threshold: f64) -> Self {
        Self { policy, threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn evaluate(&self, finding: &Finding) -> EvaluatedFinding {
        let quality_score = self.policy.score(&finding.citation);
        EvaluatedFinding {
            finding: finding.clone(),
            quality_score,
            included: quality_score >= self.threshold,
        }
    }

    pub fn evaluate_all(&self, findings: &[Finding]) -> Vec<EvaluatedFinding> {
        findings.iter().map(|f| self.evaluate(f)).collect()
    }

    pub fn source_quality(&self, step_id: &StepId, findings: &[Finding]) -> SourceQuality {
        let step_findings: Vec<&Finding> =
            findings.iter().filter(|f| &f.step_id == step_id).collect();
        let total = step_findings.len();
        let preferred = step_findings
            .iter()
            .filter(|f| self.policy.is_preferred(&f.citation))
            .count();
        let preferred_share = if total == 0 {
            0.0
        } else {
            preferred as f64 / total as f64
        };
        SourceQuality {
            step_id: step_id.clone(),
            total,
            preferred,
            preferred_share,
            passed: preferred_share > 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::research::entities::Citation;

    fn finding(step: &str, url: &str) -> Finding {
        Finding::new(step, "text", Citation::new(url, "snippet").unwrap())
    }

    #[test]
    fn test_inclusion_follows_threshold() {
        let evaluator = SourceEvaluator::default();
        let preferred = evaluator.evaluate(&finding("1", "https://arxiv.org/abs/1"));
        let unknown = evaluator.evaluate(&finding("1", "https://medium.com/x"));
        assert!(preferred.included);
        assert!(!unknown.included);
        assert_eq!(unknown.quality_score, 0.4);
    }

    #[test]
    fn test_included_implies_score_meets_threshold() {
        let evaluator = SourceEvaluator::new(Arc::new(DomainTrustPolicy::default()), 0.3);
        for url in [
            "https://arxiv.org/abs/1",
            "https://energy.gov/x",
            "https://random.blog/x",
        ] {
            let evaluated = evaluator.evaluate(&finding("1", url));
            assert!(evaluated.included);
            assert!(evaluated.quality_score >= evaluator.threshold());
        }
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let evaluator = SourceEvaluator::default();
        let f = finding("2", "https://www.energy.gov/science/fes");
        assert_eq!(evaluator.evaluate(&f), evaluator.evaluate(&f));
    }

    #[test]
    fn test_source_quality_per_step() {
        let evaluator = SourceEvaluator::default();
        let findings = vec![
            finding("1", "https://arxiv.org/abs/1"),
            finding("1", "https://nature.com/a"),
            finding("1", "https://medium.com/x"),
            finding("2", "https://medium.com/y"),
        ];
        let q1 = evaluator.source_quality(&StepId::new("1"), &findings);
        assert_eq!((q1.total, q1.preferred), (3, 2));
        assert!(q1.passed);

        let q2 = evaluator.source_quality(&StepId::new("2"), &findings);
        assert!(!q2.passed);

        let q3 = evaluator.source_quality(&StepId::new("3"), &findings);
        assert_eq!(q3.preferred_share, 0.0);
    }
}
