use std::sync::Arc;

use crate::config::Config;
use crate::export::PdfExporter;
use crate::onboarding::agent::OnboardingAgent;
use crate::records::RecordStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub agent: OnboardingAgent,
    /// Pluggable record store. Default: CsvRecordStore at RECORD_STORE_PATH.
    pub records: Arc<dyn RecordStore>,
    pub exporter: PdfExporter,
    pub config: Config,
}
