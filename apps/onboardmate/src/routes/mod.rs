pub mod health;
pub mod ui;

use axum::{
    routing::{get, post},
    Router,
};

use crate::knowledge::handlers as knowledge;
use crate::onboarding::handlers as onboarding;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ui::index_handler))
        .route("/health", get(health::health_handler))
        // Onboarding plan view
        .route("/api/v1/onboarding/plan", post(onboarding::handle_generate_plan))
        .route(
            "/api/v1/onboarding/records",
            get(onboarding::handle_list_records),
        )
        .route(
            "/api/v1/onboarding/plans/:id/pdf",
            get(onboarding::handle_download_plan),
        )
        // Knowledge assistance view
        .route(
            "/api/v1/knowledge/query",
            post(knowledge::handle_knowledge_query),
        )
        .route("/api/v1/knowledge/faq", get(knowledge::handle_faq))
        .with_state(state)
}
