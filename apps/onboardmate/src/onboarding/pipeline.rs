//! Onboarding plan pipeline.
//!
//! Flow: generate plan → (success only) render PDF → append record.
//!
//! A filtered outcome or any error writes nothing: the record store and the
//! export directory are touched only after a confirmed `Success`. A row is only
//! kept alongside its document: if the append fails the fresh PDF is removed.

use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::export::{ExportedDocument, PdfExporter};
use crate::models::profile::EmployeeProfile;
use crate::models::record::PersistedRecord;
use crate::onboarding::agent::{FilterReason, GenerationOutcome, OnboardingAgent};
use crate::records::RecordStore;

/// What the caller gets back from one plan submission.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlanSubmission {
    Generated {
        plan: String,
        document: ExportedDocument,
    },
    Filtered {
        reason: FilterReason,
    },
}

/// Runs one plan submission end to end.
pub async fn submit_onboarding_plan(
    agent: &OnboardingAgent,
    store: &dyn RecordStore,
    exporter: &PdfExporter,
    profile: EmployeeProfile,
) -> Result<PlanSubmission, AppError> {
    let plan = match agent.generate_onboarding_plan(&profile).await? {
        GenerationOutcome::Success(plan) => plan,
        GenerationOutcome::Filtered(reason) => return Ok(PlanSubmission::Filtered { reason }),
    };

    let document = exporter.render(&plan).await?;

    if let Err(e) = store.append(&PersistedRecord::from(&profile)).await {
        if let Err(remove_err) = tokio::fs::remove_file(&document.path).await {
            warn!(
                "Could not remove orphaned plan {}: {remove_err}",
                document.path.display()
            );
        }
        return Err(e.into());
    }
    info!("Saved employee details for '{}'", profile.name);

    Ok(PlanSubmission::Generated { plan, document })
}
