//! Axum route handlers for the onboarding plan view.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::pdf::read_document;
use crate::models::profile::PlanForm;
use crate::models::record::PersistedRecord;
use crate::onboarding::agent::FilterReason;
use crate::onboarding::pipeline::{submit_onboarding_plan, PlanSubmission};
use crate::state::AppState;

/// File name offered to the browser for every plan download.
const DOWNLOAD_FILE_NAME: &str = "onboarding_plan.pdf";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlanResponse {
    Generated {
        plan: String,
        message: &'static str,
        document_id: Uuid,
        download_url: String,
        line_count: usize,
        page_count: usize,
        /// Snapshot of the record store after the append.
        records: Vec<PersistedRecord>,
    },
    Filtered {
        reason: FilterReason,
        message: &'static str,
    },
}

#[derive(Debug, Serialize)]
pub struct RecordsResponse {
    pub records: Vec<PersistedRecord>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/onboarding/plan
///
/// Generates a plan, saves the employee row, and exports the plan as a PDF.
/// A filtered generation is a normal 200 response with `status: "filtered"`.
pub async fn handle_generate_plan(
    State(state): State<AppState>,
    Json(form): Json<PlanForm>,
) -> Result<Json<PlanResponse>, AppError> {
    if !form.has_any_input() {
        return Err(AppError::Validation(
            "Please provide required details for the onboarding plan (Name, Role, Department, \
            Start Date, Previous Experience, and Goals)."
                .to_string(),
        ));
    }

    let profile = form.into_profile(chrono::Local::now().date_naive());
    let submission =
        submit_onboarding_plan(&state.agent, state.records.as_ref(), &state.exporter, profile)
            .await?;

    let response = match submission {
        PlanSubmission::Generated { plan, document } => PlanResponse::Generated {
            // The row and document already exist; a failed re-read must not lose the plan.
            records: state.records.records().await.unwrap_or_else(|e| {
                warn!("Could not read record snapshot after saving plan: {e}");
                Vec::new()
            }),
            message: "Employee details saved to the record store.",
            document_id: document.id,
            download_url: format!("/api/v1/onboarding/plans/{}/pdf", document.id),
            line_count: document.line_count(),
            page_count: document.page_count,
            plan,
        },
        PlanSubmission::Filtered { reason } => PlanResponse::Filtered {
            message: reason.user_message(),
            reason,
        },
    };

    Ok(Json(response))
}

/// GET /api/v1/onboarding/records
///
/// Returns every saved employee row for the snapshot table.
pub async fn handle_list_records(
    State(state): State<AppState>,
) -> Result<Json<RecordsResponse>, AppError> {
    let records = state.records.records().await?;
    Ok(Json(RecordsResponse { records }))
}

/// GET /api/v1/onboarding/plans/:id/pdf
///
/// Streams a previously exported plan as an attachment.
pub async fn handle_download_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let path = state
        .exporter
        .document_path(id)
        .ok_or_else(|| AppError::NotFound(format!("Plan document {id} not found")))?;

    let bytes = read_document(&path).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{DOWNLOAD_FILE_NAME}\""),
            ),
        ],
        Bytes::from(bytes),
    ))
}
