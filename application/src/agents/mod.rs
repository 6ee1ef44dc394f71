//! Role agents.
//!
//! Each pipeline role has a fixed interface ([`Planner`], [`Researcher`],
//! [`Writer`], [`Editor`]). [`GatewayAgent`] implements all four on top of
//! an [`LlmGateway`](crate::ports::llm_gateway::LlmGateway); which role it
//! plays is decided by the [`RoleConfig`](scriptorium_domain::RoleConfig) it
//! is built with.

mod gateway_agent;

pub use gateway_agent::GatewayAgent;

use crate::ports::llm_gateway::GatewayError;
use async_trait::async_trait;
use scriptorium_domain::{
    AgentRole, Draft, EditorVerdict, EvaluatedFinding, Finding, ResearchStep, Revision, Topic,
};
use thiserror::Error;

/// Errors a role agent can return
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgentError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Unusable {role} response: {detail}")]
    Unusable { role: AgentRole, detail: String },
}

impl AgentError {
    pub fn unusable(role: AgentRole, detail: impl Into<String>) -> Self {
        AgentError::Unusable {
            role,
            detail: detail.into(),
        }
    }
}

/// Breaks a topic into research questions.
#[async_trait]
pub trait Planner: Send + Sync {
    /// Returns a non-empty, de-duplicated list of at most `max_steps` questions.
    async fn plan(&self, topic: &Topic, max_steps: usize) -> Result<Vec<String>, AgentError>;
}

/// Answers one research question with cited findings.
#[async_trait]
pub trait Researcher: Send + Sync {
    /// May return an empty list; the controller decides what that means.
    async fn research(&self, step: &ResearchStep, date: &str) -> Result<Vec<Finding>, AgentError>;
}

/// Produces draft bodies.
#[async_trait]
pub trait Writer: Send + Sync {
    async fn write(
        &self,
        topic: &Topic,
        findings: &[EvaluatedFinding],
        revision: Option<Revision<'_>>,
    ) -> Result<String, AgentError>;
}

/// Judges drafts.
#[async_trait]
pub trait Editor: Send + Sync {
    async fn review(
        &self,
        draft: &Draft,
        criteria: &[String],
        steps: &[ResearchStep],
    ) -> Result<EditorVerdict, AgentError>;
}
