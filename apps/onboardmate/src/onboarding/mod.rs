// Onboarding plan generation.
// Implements: prompt templating, outcome classification, persistence + PDF export pipeline.
// All LLM calls go through llm_client; no direct Gemini HTTP calls here.

pub mod agent;
pub mod handlers;
pub mod pipeline;
pub mod prompt_builder;
pub mod prompts;
