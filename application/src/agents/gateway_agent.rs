//! Gateway-backed role agent

use super::{AgentError, Editor, Planner, Researcher, Writer};
use crate::ports::llm_gateway::LlmGateway;
use async_trait::async_trait;
use scriptorium_domain::util::truncate_str;
use scriptorium_domain::{
    Draft, EditorVerdict, EvaluatedFinding, Finding, PromptTemplate, ResearchStep, Revision,
    RoleConfig, Topic, parse_editor_verdict, parse_findings, parse_plan,
};
use std::sync::Arc;
use tracing::debug;

/// One agent implementation for every role.
///
/// Behaviour differs only through the [`RoleConfig`]: the model, the system
/// prompt and the temperature sent with each call.
pub struct GatewayAgent {
    gateway: Arc<dyn LlmGateway>,
    config: RoleConfig,
}

impl GatewayAgent {
    pub fn new(gateway: Arc<dyn LlmGateway>, config: RoleConfig) -> Self {
        Self { gateway, config }
    }

    pub fn config(&self) -> &RoleConfig {
        &self.config
    }

    async fn ask(&self, prompt: &str) -> Result<String, AgentError> {
        debug!(
            "{} -> {} ({} bytes)",
            self.config.role,
            self.config.model,
            prompt.len()
        );
        let response = self.gateway.invoke(&self.config, prompt).await?;
        debug!(
            "{} <- {}",
            self.config.role,
            truncate_str(&response, 120).replace('\n', " ")
        );
        Ok(response)
    }
}

#[async_trait]
impl Planner for GatewayAgent {
    async fn plan(&self, topic: &Topic, max_steps: usize) -> Result<Vec<String>, AgentError> {
        let prompt = PromptTemplate::planner_prompt(topic.content(), max_steps);
        let response = self.ask(&prompt).await?;

        let mut questions = parse_plan(&response).ok_or_else(|| {
            AgentError::unusable(
                self.config.role,
                format!("no questions in: {}", truncate_str(&response, 200)),
            )
        })?;
        questions.truncate(max_steps);
        Ok(questions)
    }
}

#[async_trait]
impl Researcher for GatewayAgent {
    async fn research(&self, step: &ResearchStep, date: &str) -> Result<Vec<Finding>, AgentError> {
        let prompt = PromptTemplate::researcher_prompt(&step.question, date);
        let response = self.ask(&prompt).await?;
        Ok(parse_findings(&step.id, &response))
    }
}

#[async_trait]
impl Writer for GatewayAgent {
    async fn write(
        &self,
        topic: &Topic,
        findings: &[EvaluatedFinding],
        revision: Option<Revision<'_>>,
    ) -> Result<String, AgentError> {
        let prompt = PromptTemplate::writer_prompt(topic.content(), findings, revision);
        let body = self.ask(&prompt).await?;
        if body.trim().is_empty() {
            return Err(AgentError::unusable(self.config.role, "empty draft"));
        }
        Ok(body.trim().to_string())
    }
}

#[async_trait]
impl Editor for GatewayAgent {
    async fn review(
        &self,
        draft: &Draft,
        criteria: &[String],
        steps: &[ResearchStep],
    ) -> Result<EditorVerdict, AgentError> {
        let prompt = PromptTemplate::editor_prompt(draft, criteria, steps);
        let response = self.ask(&prompt).await?;
        if response.trim().is_empty() {
            return Err(AgentError::unusable(self.config.role, "empty verdict"));
        }
        Ok(parse_editor_verdict(&response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_gateway::GatewayError;
    use scriptorium_domain::{AgentRole, StepId};
    use std::sync::Mutex;

    /// Returns one fixed reply and remembers the last request.
    struct EchoGateway {
        reply: Result<String, GatewayError>,
        last: Mutex<Option<(RoleConfig, String)>>,
    }

    impl EchoGateway {
        fn new(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                last: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl LlmGateway for EchoGateway {
        async fn invoke(&self, role: &RoleConfig, prompt: &str) -> Result<String, GatewayError> {
            *self.last.lock().unwrap() = Some((role.clone(), prompt.to_string()));
            self.reply.clone()
        }
    }

    fn agent(gateway: Arc<EchoGateway>, role: AgentRole) -> GatewayAgent {
        GatewayAgent::new(gateway, RoleConfig::for_role(role))
    }

    #[tokio::test]
    async fn test_planner_parses_and_caps() {
        let gateway = Arc::new(EchoGateway::new(r#"["a?", "b?", "c?"]"#));
        let planner = agent(gateway.clone(), AgentRole::Planner);
        let topic = Topic::new("Fusion").unwrap();

        let plan = planner.plan(&topic, 2).await.unwrap();
        assert_eq!(plan, vec!["a?".to_string(), "b?".to_string()]);

        let (role, prompt) = gateway.last.lock().unwrap().clone().unwrap();
        assert_eq!(role.role, AgentRole::Planner);
        assert!(prompt.contains("Fusion"));
    }

    #[tokio::test]
    async fn test_planner_rejects_unparseable_output() {
        let gateway = Arc::new(EchoGateway::new(""));
        let planner = agent(gateway, AgentRole::Planner);
        let topic = Topic::new("Fusion").unwrap();

        let err = planner.plan(&topic, 5).await.unwrap_err();
        assert!(matches!(err, AgentError::Unusable { role: AgentRole::Planner, .. }));
    }

    #[tokio::test]
    async fn test_researcher_attributes_findings_to_step() {
        let gateway = Arc::new(EchoGateway::new(
            r#"[{"text": "ITER is under construction", "url": "https://www.iter.org/proj", "snippet": "site"}]"#,
        ));
        let researcher = agent(gateway.clone(), AgentRole::Researcher);
        let step = ResearchStep::new("2", "What is ITER?");

        let findings = researcher.research(&step, "2026-10-19").await.unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].step_id, StepId::new("2"));
        assert_eq!(findings[0].citation.domain, "iter.org");

        let (_, prompt) = gateway.last.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("2026-10-19"));
    }

    #[tokio::test]
    async fn test_gateway_errors_propagate() {
        let gateway = Arc::new(EchoGateway {
            reply: Err(GatewayError::Timeout),
            last: Mutex::new(None),
        });
        let writer = agent(gateway, AgentRole::Writer);
        let topic = Topic::new("Fusion").unwrap();

        let err = writer.write(&topic, &[], None).await.unwrap_err();
        assert_eq!(err, AgentError::Gateway(GatewayError::Timeout));
    }

    #[tokio::test]
    async fn test_editor_parses_verdict() {
        let gateway = Arc::new(EchoGateway::new(
            r#"{"approved": false, "feedback": [{"section": "Intro", "comment": "Too vague"}]}"#,
        ));
        let editor = agent(gateway, AgentRole::Editor);
        let draft = Draft::new(1, "Body", vec![]);

        let verdict = editor.review(&draft, &[], &[]).await.unwrap();
        assert!(!verdict.approved);
        assert_eq!(verdict.feedback[0].section, "Intro");
    }
}
