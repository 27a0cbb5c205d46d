//! Axum route handlers for the knowledge assistance view.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::knowledge::faq::{FaqEntry, EXAMPLE_QUESTIONS, GENERAL_FAQS};
use crate::onboarding::agent::{FilterReason, GenerationOutcome};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct KnowledgeQueryRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum KnowledgeQueryResponse {
    Answered {
        answer: String,
    },
    Filtered {
        reason: FilterReason,
        message: &'static str,
    },
}

#[derive(Debug, Serialize)]
pub struct FaqResponse {
    pub example_questions: &'static [&'static str],
    pub faqs: &'static [FaqEntry],
}

/// POST /api/v1/knowledge/query
///
/// Forwards the question to the model. Never touches the record store.
pub async fn handle_knowledge_query(
    State(state): State<AppState>,
    Json(request): Json<KnowledgeQueryRequest>,
) -> Result<Json<KnowledgeQueryResponse>, AppError> {
    let response = match state
        .agent
        .provide_knowledge_assistance(&request.query)
        .await?
    {
        GenerationOutcome::Success(answer) => KnowledgeQueryResponse::Answered { answer },
        GenerationOutcome::Filtered(reason) => KnowledgeQueryResponse::Filtered {
            message: reason.user_message(),
            reason,
        },
    };
    Ok(Json(response))
}

/// GET /api/v1/knowledge/faq
pub async fn handle_faq() -> Json<FaqResponse> {
    Json(FaqResponse {
        example_questions: EXAMPLE_QUESTIONS,
        faqs: GENERAL_FAQS,
    })
}
