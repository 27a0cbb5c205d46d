//! LLM Client: the single point of entry for all Gemini API calls in OnboardMate.
//!
//! ARCHITECTURAL RULE: No other module may call the Gemini API directly.
//! All LLM interactions MUST go through a `ChatBackend`.
//!
//! Every call opens a fresh conversation: the request carries exactly one user
//! message and no history. Sampling parameters are fixed process-wide.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[cfg(test)]
pub mod testing;

/// Fixed sampling configuration applied to every request.
pub const SAMPLING: SamplingConfig = SamplingConfig {
    temperature: 0.7,
    top_p: 0.95,
    top_k: 40,
    max_output_tokens: 8192,
    response_mime_type: "text/plain",
};

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The candidate stopped for a reason other than a normal finish or recitation.
    #[error("Generation stopped: {reason}")]
    CandidateStopped { reason: String },

    /// The prompt itself was blocked; no candidate was produced.
    #[error("Prompt blocked: {reason}")]
    PromptBlocked { reason: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    /// Transport faults, rate limits and server errors may succeed on a later attempt.
    fn is_transient(&self) -> bool {
        match self {
            LlmError::Http(_) => true,
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub response_mime_type: &'static str,
}

/// Timeout and retry knobs for the remote call.
///
/// The default is a single attempt with no timeout.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub timeout: Option<Duration>,
    pub max_retries: u32,
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: None,
            max_retries: 0,
            base_backoff: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Exponential backoff before retry `attempt` (1-based): base, 2×base, 4×base, ...
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_backoff * (1u32 << (attempt.saturating_sub(1)).min(16))
    }
}

/// Why the model stopped producing the candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    MaxTokens,
    Recitation,
    Unspecified,
    Other(String),
}

impl FinishReason {
    pub fn from_api(raw: Option<&str>) -> Self {
        match raw {
            None | Some("FINISH_REASON_UNSPECIFIED") => FinishReason::Unspecified,
            Some("STOP") => FinishReason::Stop,
            Some("MAX_TOKENS") => FinishReason::MaxTokens,
            Some("RECITATION") => FinishReason::Recitation,
            Some(other) => FinishReason::Other(other.to_string()),
        }
    }
}

/// The text of the first candidate and how it finished.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelReply {
    pub text: Option<String>,
    pub finish_reason: FinishReason,
}

/// A stateless, single-message conversation with a generative model.
///
/// Carried in `OnboardingAgent` as `Arc<dyn ChatBackend>` so tests can script replies.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send_message(&self, message: &str) -> Result<ModelReply, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: SamplingConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    message: String,
}

impl Candidate {
    fn text(&self) -> Option<String> {
        let parts = &self.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.is_empty()).then_some(text)
    }
}

/// Turns a decoded response into a reply, raising the stop and block signals as errors.
fn interpret_response(response: GenerateContentResponse) -> Result<ModelReply, LlmError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(LlmError::PromptBlocked { reason });
        }
        return Err(LlmError::EmptyContent);
    };

    let finish_reason = match FinishReason::from_api(candidate.finish_reason.as_deref()) {
        FinishReason::Other(reason) => return Err(LlmError::CandidateStopped { reason }),
        known => known,
    };

    Ok(ModelReply {
        text: candidate.text(),
        finish_reason,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Gemini client
// ────────────────────────────────────────────────────────────────────────────

/// The Gemini `generateContent` client used by all services in OnboardMate.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    api_base: String,
    policy: RetryPolicy,
}

impl GeminiClient {
    pub fn new(
        api_key: String,
        model: String,
        api_base: String,
        policy: RetryPolicy,
    ) -> Result<Self, LlmError> {
        let mut builder = Client::builder();
        if let Some(timeout) = policy.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            api_key,
            model,
            api_base: api_base.trim_end_matches('/').to_string(),
            policy,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base, self.model
        )
    }

    async fn attempt(&self, request: &GenerateContentRequest<'_>) -> Result<ModelReply, LlmError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GoogleError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let decoded: GenerateContentResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &decoded.usage_metadata {
            debug!(
                "Gemini call succeeded: prompt_tokens={}, candidate_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        interpret_response(decoded)
    }
}

#[async_trait]
impl ChatBackend for GeminiClient {
    /// Sends one message in a new, empty conversation.
    /// Retries transient faults only, as allowed by the configured `RetryPolicy`.
    async fn send_message(&self, message: &str) -> Result<ModelReply, LlmError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: message }],
            }],
            generation_config: SAMPLING,
        };

        let mut attempt = 0;
        loop {
            match self.attempt(&request).await {
                Err(e) if e.is_transient() && attempt < self.policy.max_retries => {
                    attempt += 1;
                    let delay = self.policy.backoff(attempt);
                    warn!(
                        "Gemini call failed ({e}), retry {}/{} after {}ms",
                        attempt,
                        self.policy.max_retries,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                result => return result,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const ENDPOINT: &str = "/v1beta/models/test-model:generateContent";

    fn client_for(server: &MockServer, policy: RetryPolicy) -> GeminiClient {
        GeminiClient::new(
            "test-key".to_string(),
            "test-model".to_string(),
            server.uri(),
            policy,
        )
        .unwrap()
    }

    fn candidate_body(text: &str, finish_reason: &str) -> serde_json::Value {
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": finish_reason
            }],
            "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 7 }
        })
    }

    #[test]
    fn test_sampling_config_serializes_in_api_casing() {
        let value = serde_json::to_value(SAMPLING).unwrap();
        assert_eq!(value["topK"], 40);
        assert_eq!(value["maxOutputTokens"], 8192);
        assert_eq!(value["responseMimeType"], "text/plain");
    }

    #[test]
    fn test_backoff_doubles_per_attempt() {
        let policy = RetryPolicy {
            base_backoff: Duration::from_millis(100),
            ..RetryPolicy::default()
        };
        assert_eq!(policy.backoff(1), Duration::from_millis(100));
        assert_eq!(policy.backoff(2), Duration::from_millis(200));
        assert_eq!(policy.backoff(3), Duration::from_millis(400));
    }

    #[test]
    fn test_finish_reason_mapping() {
        assert_eq!(FinishReason::from_api(Some("STOP")), FinishReason::Stop);
        assert_eq!(FinishReason::from_api(None), FinishReason::Unspecified);
        assert_eq!(
            FinishReason::from_api(Some("RECITATION")),
            FinishReason::Recitation
        );
        assert_eq!(
            FinishReason::from_api(Some("SAFETY")),
            FinishReason::Other("SAFETY".to_string())
        );
    }

    #[tokio::test]
    async fn test_sends_single_message_with_fixed_config() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{ "role": "user", "parts": [{ "text": "hello" }] }],
                "generationConfig": { "topK": 40, "maxOutputTokens": 8192 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body("hi", "STOP")))
            .expect(1)
            .mount(&server)
            .await;

        let reply = client_for(&server, RetryPolicy::default())
            .send_message("hello")
            .await
            .unwrap();
        assert_eq!(reply.text.as_deref(), Some("hi"));
        assert_eq!(reply.finish_reason, FinishReason::Stop);
    }

    #[tokio::test]
    async fn test_recitation_is_returned_as_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(candidate_body("", "RECITATION")),
            )
            .mount(&server)
            .await;

        let reply = client_for(&server, RetryPolicy::default())
            .send_message("x")
            .await
            .unwrap();
        assert_eq!(reply.finish_reason, FinishReason::Recitation);
        assert_eq!(reply.text, None);
    }

    #[tokio::test]
    async fn test_safety_stop_raises_candidate_stopped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body("", "SAFETY")))
            .mount(&server)
            .await;

        let err = client_for(&server, RetryPolicy::default())
            .send_message("x")
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::CandidateStopped { ref reason } if reason == "SAFETY"));
    }

    #[tokio::test]
    async fn test_blocked_prompt_without_candidates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "promptFeedback": { "blockReason": "SAFETY" }
            })))
            .mount(&server)
            .await;

        let err = client_for(&server, RetryPolicy::default())
            .send_message("x")
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::PromptBlocked { .. }));
    }

    #[tokio::test]
    async fn test_api_error_message_is_extracted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server, RetryPolicy::default())
            .send_message("x")
            .await
            .unwrap_err();
        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_default_policy_makes_one_attempt_on_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server, RetryPolicy::default())
            .send_message("x")
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Api { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_configured_retries_repeat_transient_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let policy = RetryPolicy {
            max_retries: 2,
            base_backoff: Duration::from_millis(1),
            ..RetryPolicy::default()
        };
        let err = client_for(&server, policy).send_message("x").await.unwrap_err();
        assert!(matches!(err, LlmError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(403).set_body_string("denied"))
            .expect(1)
            .mount(&server)
            .await;

        let policy = RetryPolicy {
            max_retries: 3,
            base_backoff: Duration::from_millis(1),
            ..RetryPolicy::default()
        };
        let err = client_for(&server, policy).send_message("x").await.unwrap_err();
        assert!(matches!(err, LlmError::Api { status: 403, ref message } if message == "denied"));
    }
}
