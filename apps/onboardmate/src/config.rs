use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::RetryPolicy;

const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Application configuration loaded from environment variables.
/// Startup fails if `GEMINI_API_KEY` is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_base: String,
    /// Per-attempt timeout for the remote call. `None` waits for the service indefinitely.
    pub gemini_timeout: Option<Duration>,
    pub gemini_max_retries: u32,
    pub record_store_path: PathBuf,
    pub pdf_output_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let gemini_timeout = get("GEMINI_TIMEOUT_SECS")
            .map(|v| v.parse::<u64>())
            .transpose()
            .context("GEMINI_TIMEOUT_SECS must be a whole number of seconds")?
            .map(Duration::from_secs);

        Ok(Config {
            gemini_api_key: get("GEMINI_API_KEY").context(
                "Required environment variable 'GEMINI_API_KEY' is not set",
            )?,
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_api_base: get("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            gemini_timeout,
            gemini_max_retries: get("GEMINI_MAX_RETRIES")
                .unwrap_or_else(|| "0".to_string())
                .parse::<u32>()
                .context("GEMINI_MAX_RETRIES must be a non-negative integer")?,
            record_store_path: get("RECORD_STORE_PATH")
                .unwrap_or_else(|| "onboarding_data.csv".to_string())
                .into(),
            pdf_output_dir: get("PDF_OUTPUT_DIR")
                .unwrap_or_else(|| "plans".to_string())
                .into(),
            port: get("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            timeout: self.gemini_timeout,
            max_retries: self.gemini_max_retries,
            ..RetryPolicy::default()
        }
    }
}
