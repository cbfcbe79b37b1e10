//! Concrete completion backends over the wire helpers in `pwassist-providers`.

use async_trait::async_trait;
use pwassist_core::config::BackendConfig;
use pwassist_core::types::Provider;
use pwassist_engine::traits::{BackendFailure, CompletionBackend};
use pwassist_providers::gemini::{GeminiConfig, build_generate_content_request};
use pwassist_providers::openai_compatible::{
    ChatMessage, OpenAiCompatibleChatConfig, build_chat_completions_request,
};
use pwassist_providers::parse::{
    parse_api_error_message, parse_gemini_generate_content, parse_openai_chat_completion,
};
use pwassist_providers::request::HttpRequest;
use pwassist_providers::runtime::{HttpResponse, HttpRuntime};

#[derive(Clone)]
pub struct OpenAiBackend {
    runtime: HttpRuntime,
    config: BackendConfig,
    api_key: Option<String>,
}

impl std::fmt::Debug for OpenAiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiBackend")
            .field("config", &self.config)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl OpenAiBackend {
    pub fn new(runtime: HttpRuntime, config: BackendConfig, api_key: Option<String>) -> Self {
        Self {
            runtime,
            config,
            api_key,
        }
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, BackendFailure> {
        let provider = self.provider();
        let api_key = self
            .api_key
            .clone()
            .ok_or(BackendFailure::ConfigurationError(provider))?;

        let cfg = OpenAiCompatibleChatConfig {
            base_url: self.config.base_url.clone(),
            api_key,
            model: self.config.model.clone(),
        };
        let req = build_chat_completions_request(
            &cfg,
            &[
                ChatMessage::system(system_prompt),
                ChatMessage::user(user_prompt),
            ],
        );

        let resp = send(&self.runtime, provider, &req).await?;
        parse_openai_chat_completion(&resp.body)
            .map_err(|e| BackendFailure::call(provider, format!("{e:#}")))?
            .ok_or(BackendFailure::EmptyProviderResponse(provider))
    }
}

#[derive(Clone)]
pub struct GeminiBackend {
    runtime: HttpRuntime,
    config: BackendConfig,
    api_key: Option<String>,
}

impl std::fmt::Debug for GeminiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiBackend")
            .field("config", &self.config)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl GeminiBackend {
    pub fn new(runtime: HttpRuntime, config: BackendConfig, api_key: Option<String>) -> Self {
        Self {
            runtime,
            config,
            api_key,
        }
    }
}

#[async_trait]
impl CompletionBackend for GeminiBackend {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, BackendFailure> {
        let provider = self.provider();
        let api_key = self
            .api_key
            .clone()
            .ok_or(BackendFailure::ConfigurationError(provider))?;

        let cfg = GeminiConfig {
            base_url: self.config.base_url.clone(),
            api_key,
            model: self.config.model.clone(),
        };
        let req = build_generate_content_request(&cfg, system_prompt, user_prompt);

        let resp = send(&self.runtime, provider, &req).await?;
        parse_gemini_generate_content(&resp.body)
            .map_err(|e| BackendFailure::call(provider, format!("{e:#}")))?
            .ok_or(BackendFailure::EmptyProviderResponse(provider))
    }
}

/// Executes the request and turns transport errors and non-2xx statuses into
/// [`BackendFailure::BackendCallError`].
async fn send(
    runtime: &HttpRuntime,
    provider: Provider,
    req: &HttpRequest,
) -> Result<HttpResponse, BackendFailure> {
    let resp = runtime
        .execute(req)
        .await
        .map_err(|e| BackendFailure::call(provider, format!("{e:#}")))?;

    if !resp.is_success() {
        let detail = parse_api_error_message(&resp.body).unwrap_or_else(|| resp.body_text());
        return Err(BackendFailure::call(
            provider,
            format!("status={} {}", resp.status, detail.trim()),
        ));
    }

    Ok(resp)
}
