//! OnboardingAgent: the classifying generation client.
//!
//! Wraps a `ChatBackend` and turns each reply into a `GenerationOutcome`:
//! recitation stops, stopped candidates and blocked prompts become `Filtered`
//! (the user should change the input), everything else is either `Success`
//! or a propagated `AgentError::Service`. Nothing is retried here.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::{ChatBackend, FinishReason, LlmError, ModelReply};
use crate::models::profile::EmployeeProfile;
use crate::onboarding::prompt_builder::{build_onboarding_prompt, PromptError};
use crate::onboarding::prompts::KNOWLEDGE_ASSISTANCE_PREFIX;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error("knowledge query is empty")]
    EmptyQuery,

    #[error("generation service error: {0}")]
    Service(#[from] LlmError),
}

/// Why a generation was withheld.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FilterReason {
    Recitation,
    CandidateStopped(String),
    PromptBlocked(String),
}

impl FilterReason {
    /// Instructive message shown to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            FilterReason::Recitation => {
                "Generation was stopped because the response recited existing content. \
                Please adjust the inputs and try again."
            }
            FilterReason::CandidateStopped(_) => {
                "Generation was stopped by the service. Please adjust the inputs and try again."
            }
            FilterReason::PromptBlocked(_) => {
                "The request was blocked by the service. Please rephrase the inputs and try again."
            }
        }
    }
}

/// The result of one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Success(String),
    Filtered(FilterReason),
}

/// Owns the model handle. The credential is held by the backend, never by ambient state.
#[derive(Clone)]
pub struct OnboardingAgent {
    backend: Arc<dyn ChatBackend>,
}

impl OnboardingAgent {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    /// Builds the plan prompt and sends it as the only message of a new conversation.
    pub async fn generate_onboarding_plan(
        &self,
        profile: &EmployeeProfile,
    ) -> Result<GenerationOutcome, AgentError> {
        let prompt = build_onboarding_prompt(profile)?;
        info!("Requesting onboarding plan ({} prompt chars)", prompt.len());

        let outcome = classify(self.backend.send_message(&prompt).await)?;
        log_filtered("onboarding plan", &outcome);
        Ok(outcome)
    }

    /// Answers a free-text question from a new hire.
    ///
    /// Blank queries are rejected before any remote call.
    pub async fn provide_knowledge_assistance(
        &self,
        query: &str,
    ) -> Result<GenerationOutcome, AgentError> {
        if query.trim().is_empty() {
            return Err(AgentError::EmptyQuery);
        }

        let message = format!("{KNOWLEDGE_ASSISTANCE_PREFIX}{query}");
        let outcome = classify(self.backend.send_message(&message).await)?;
        log_filtered("knowledge assistance", &outcome);
        Ok(outcome)
    }
}

fn classify(reply: Result<ModelReply, LlmError>) -> Result<GenerationOutcome, AgentError> {
    match reply {
        Ok(ModelReply {
            finish_reason: FinishReason::Recitation,
            ..
        }) => Ok(GenerationOutcome::Filtered(FilterReason::Recitation)),
        Ok(ModelReply {
            text: Some(text), ..
        }) if !text.trim().is_empty() => Ok(GenerationOutcome::Success(text)),
        Ok(_) => Err(AgentError::Service(LlmError::EmptyContent)),
        Err(LlmError::CandidateStopped { reason }) => Ok(GenerationOutcome::Filtered(
            FilterReason::CandidateStopped(reason),
        )),
        Err(LlmError::PromptBlocked { reason }) => {
            Ok(GenerationOutcome::Filtered(FilterReason::PromptBlocked(reason)))
        }
        Err(e) => Err(AgentError::Service(e)),
    }
}

fn log_filtered(call: &str, outcome: &GenerationOutcome) {
    if let GenerationOutcome::Filtered(reason) = outcome {
        warn!("{call} generation filtered: {reason:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedBackend;

    fn profile() -> EmployeeProfile {
        EmployeeProfile {
            name: "Jane Doe".to_string(),
            role: "Engineer".to_string(),
            department: "R&D".to_string(),
            start_date: "2024-03-01".to_string(),
            previous_experience: "3 years backend".to_string(),
            goals: "ship onboarding docs".to_string(),
        }
    }

    fn agent_with(backend: ScriptedBackend) -> (OnboardingAgent, Arc<ScriptedBackend>) {
        let backend = Arc::new(backend);
        (OnboardingAgent::new(backend.clone()), backend)
    }

    #[tokio::test]
    async fn test_plan_success_returns_text() {
        let (agent, backend) = agent_with(ScriptedBackend::new().with_text("Day 1: meet team"));
        let outcome = agent.generate_onboarding_plan(&profile()).await.unwrap();

        assert_eq!(outcome, GenerationOutcome::Success("Day 1: meet team".to_string()));
        let sent = backend.sent_messages();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("**Name:** Jane Doe"));
    }

    #[tokio::test]
    async fn test_recitation_is_filtered_not_error() {
        let (agent, _) = agent_with(ScriptedBackend::new().with_recitation());
        let outcome = agent.generate_onboarding_plan(&profile()).await.unwrap();
        assert_eq!(outcome, GenerationOutcome::Filtered(FilterReason::Recitation));
    }

    #[tokio::test]
    async fn test_recitation_with_partial_text_is_still_filtered() {
        let (agent, _) = agent_with(ScriptedBackend::new().with_reply(Ok(ModelReply {
            text: Some("partial".to_string()),
            finish_reason: FinishReason::Recitation,
        })));
        let outcome = agent.generate_onboarding_plan(&profile()).await.unwrap();
        assert_eq!(outcome, GenerationOutcome::Filtered(FilterReason::Recitation));
    }

    #[tokio::test]
    async fn test_stopped_candidate_is_filtered() {
        let (agent, _) = agent_with(ScriptedBackend::new().with_reply(Err(
            LlmError::CandidateStopped {
                reason: "SAFETY".to_string(),
            },
        )));
        let outcome = agent.generate_onboarding_plan(&profile()).await.unwrap();
        assert_eq!(
            outcome,
            GenerationOutcome::Filtered(FilterReason::CandidateStopped("SAFETY".to_string()))
        );
    }

    #[tokio::test]
    async fn test_service_fault_propagates() {
        let (agent, _) = agent_with(ScriptedBackend::new().with_reply(Err(LlmError::Api {
            status: 500,
            message: "boom".to_string(),
        })));
        let err = agent.generate_onboarding_plan(&profile()).await.unwrap_err();
        assert!(matches!(err, AgentError::Service(LlmError::Api { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_blank_text_on_normal_finish_is_a_service_error() {
        let (agent, _) = agent_with(ScriptedBackend::new().with_text("  "));
        let err = agent.generate_onboarding_plan(&profile()).await.unwrap_err();
        assert!(matches!(err, AgentError::Service(LlmError::EmptyContent)));
    }

    #[tokio::test]
    async fn test_knowledge_query_is_prefixed() {
        let (agent, backend) = agent_with(ScriptedBackend::new().with_text("See the wiki."));
        let outcome = agent
            .provide_knowledge_assistance("Where are the docs?")
            .await
            .unwrap();

        assert_eq!(outcome, GenerationOutcome::Success("See the wiki.".to_string()));
        assert_eq!(
            backend.sent_messages(),
            vec![format!("{KNOWLEDGE_ASSISTANCE_PREFIX}Where are the docs?")]
        );
    }

    #[tokio::test]
    async fn test_empty_query_makes_no_remote_call() {
        let (agent, backend) = agent_with(ScriptedBackend::new().with_text("unused"));
        let err = agent.provide_knowledge_assistance("  \n ").await.unwrap_err();

        assert!(matches!(err, AgentError::EmptyQuery));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_knowledge_path_classifies_like_plan_path() {
        let (agent, _) = agent_with(ScriptedBackend::new().with_recitation());
        let outcome = agent.provide_knowledge_assistance("question").await.unwrap();
        assert_eq!(outcome, GenerationOutcome::Filtered(FilterReason::Recitation));
    }

    #[tokio::test]
    async fn test_each_call_is_an_independent_conversation() {
        let (agent, backend) = agent_with(
            ScriptedBackend::new()
                .with_text("plan")
                .with_text("answer"),
        );
        agent.generate_onboarding_plan(&profile()).await.unwrap();
        agent.provide_knowledge_assistance("second").await.unwrap();

        let sent = backend.sent_messages();
        assert_eq!(sent.len(), 2);
        assert!(!sent[1].contains("Jane Doe"), "no history carried across calls");
    }

    #[test]
    fn test_filter_reason_serializes_with_kind_tag() {
        let value = serde_json::to_value(FilterReason::CandidateStopped("SAFETY".into())).unwrap();
        assert_eq!(value["kind"], "candidate_stopped");
        assert_eq!(value["detail"], "SAFETY");
    }
}
