//! Research domain entities

use serde::{Deserialize, Serialize};

/// Identifier of a research step within a plan (1-based plan position).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StepId(String);

impl StepId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id for the step at `index` (0-based) in the plan.
    pub fn from_index(index: usize) -> Self {
        Self((index + 1).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<T: Into<String>> From<T> for StepId {
    fn from(s: T) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a research step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    #[default]
    Pending,
    Researched,
    Failed,
}

impl StepStatus {
    pub fn as_str(&self) -> &str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::Researched => "researched",
            StepStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, StepStatus::Pending)
    }
}

/// One atomic research question of the plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchStep {
    pub id: StepId,
    pub question: String,
    pub status: StepStatus,
}

impl ResearchStep {
    pub fn new(id: impl Into<StepId>, question: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            status: StepStatus::Pending,
        }
    }

    /// Build the ordered steps for a list of planner questions.
    pub fn from_questions(questions: &[String]) -> Vec<Self> {
        questions
            .iter()
            .enumerate()
            .map(|(i, q)| Self::new(StepId::from_index(i), q.clone()))
            .collect()
    }

    pub fn mark_researched(&mut self) {
        self.status = StepStatus::Researched;
    }

    pub fn mark_failed(&mut self) {
        self.status = StepStatus::Failed;
    }

    pub fn is_researched(&self) -> bool {
        self.status == StepStatus::Researched
    }
}

/// Source reference backing a finding
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Citation {
    pub url: String,
    pub domain: String,
    pub snippet: String,
}

impl Citation {
    /// Build a citation, deriving the domain from the URL.
    ///
    /// Returns `None` unless `url` is an absolute http(s) URL with a host.
    pub fn new(url: impl Into<String>, snippet: impl Into<String>) -> Option<Self> {
        let url = url.into();
        let domain = domain_of(&url)?;
        Some(Self {
            url,
            domain,
            snippet: snippet.into(),
        })
    }
}

/// A single piece of researched information with its source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Step that produced this finding (non-owning back-reference)
    pub step_id: StepId,
    pub text: String,
    pub citation: Citation,
}

impl Finding {
    pub fn new(step_id: impl Into<StepId>, text: impl Into<String>, citation: Citation) -> Self {
        Self {
            step_id: step_id.into(),
            text: text.into(),
            citation,
        }
    }

    pub fn url(&self) -> &str {
        &self.citation.url
    }
}

/// Extract the host of an http(s) URL, lower-cased and without `www.`.
///
/// ```
/// use scriptorium_domain::research::entities::domain_of;
///
/// assert_eq!(domain_of("https://www.Nature.com/articles/x").as_deref(), Some("nature.com"));
/// assert_eq!(domain_of("ftp://example.org"), None);
/// ```
pub fn domain_of(url: &str) -> Option<String> {
    let lower = url.trim().to_ascii_lowercase();
    let rest = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))?;

    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
    let host = host_port.split(':').next().unwrap_or_default();
    let host = host.trim_end_matches('.');
    let host = host.strip_prefix("www.").unwrap_or(host);

    if host.is_empty() || !host.contains('.') {
        return None;
    }
    Some(host.to_string())
}
