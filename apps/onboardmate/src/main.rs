mod config;
mod errors;
mod export;
mod knowledge;
mod llm_client;
mod models;
mod onboarding;
mod records;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::export::{PageLayout, PdfExporter};
use crate::llm_client::GeminiClient;
use crate::onboarding::agent::OnboardingAgent;
use crate::onboarding::prompt_builder::check_template;
use crate::onboarding::prompts::ONBOARDING_PLAN_TEMPLATE;
use crate::records::CsvRecordStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing GEMINI_API_KEY before anything is served)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting OnboardMate v{}", env!("CARGO_PKG_VERSION"));

    check_template(ONBOARDING_PLAN_TEMPLATE)?;

    // Initialize Gemini client; the credential lives only inside this handle
    let gemini = GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
        config.gemini_api_base.clone(),
        config.retry_policy(),
    )?;
    info!(
        "Gemini client initialized (model: {}, timeout: {:?}, max_retries: {})",
        gemini.model(),
        config.gemini_timeout,
        config.gemini_max_retries
    );
    let agent = OnboardingAgent::new(Arc::new(gemini));

    let records = Arc::new(CsvRecordStore::new(config.record_store_path.clone()));
    info!("Record store: {}", records.path().display());

    let exporter = PdfExporter::new(config.pdf_output_dir.clone(), PageLayout::default());
    info!(
        "PDF exporter: {} ({} lines per page)",
        config.pdf_output_dir.display(),
        exporter.layout().lines_per_page()
    );

    // Build app state
    let state = AppState {
        agent,
        records,
        exporter,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the UI is served from a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
