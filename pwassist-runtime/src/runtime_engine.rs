use std::sync::Arc;
use std::time::Duration;

use pwassist_core::config::{Credentials, ServerConfig};
use pwassist_engine::gateway::ProviderGateway;
use pwassist_engine::orchestrator::RequestOrchestrator;
use pwassist_engine::traits::CompletionBackend;
use pwassist_providers::runtime::HttpRuntime;

use crate::backends::{GeminiBackend, OpenAiBackend};

/// Builds the gateway once at startup. Both backends share one HTTP client.
///
/// Missing credentials only produce a warning here; each backend reports them
/// again as a structured error when it is actually called.
pub fn build_gateway_from_config(
    cfg: &ServerConfig,
    creds: Credentials,
) -> anyhow::Result<ProviderGateway> {
    let runtime = HttpRuntime::new(
        Duration::from_secs(cfg.connect_timeout_secs),
        Duration::from_secs(cfg.request_timeout_secs),
    )?;

    let creds = creds.normalized();
    if creds.openai_api_key.is_none() {
        log::warn!("OpenAI API key is missing.");
    }
    if creds.gemini_api_key.is_none() {
        log::warn!("Gemini API key is missing.");
    }

    let openai: Arc<dyn CompletionBackend> = Arc::new(OpenAiBackend::new(
        runtime.clone(),
        cfg.openai.clone(),
        creds.openai_api_key,
    ));
    let gemini: Arc<dyn CompletionBackend> = Arc::new(GeminiBackend::new(
        runtime,
        cfg.gemini.clone(),
        creds.gemini_api_key,
    ));

    Ok(ProviderGateway::new(openai, gemini))
}

pub fn build_orchestrator_from_config(
    cfg: &ServerConfig,
    creds: Credentials,
) -> anyhow::Result<RequestOrchestrator> {
    Ok(RequestOrchestrator::new(build_gateway_from_config(cfg, creds)?))
}
