use async_trait::async_trait;
use pwassist_core::types::Provider;
use thiserror::Error;

/// Why a backend could not produce text.
///
/// Only the gateway sees these; callers above it get a [`crate::gateway::ProviderError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendFailure {
    #[error("{} API key is not configured.", .0.display_name())]
    ConfigurationError(Provider),

    #[error("{} API returned an empty result.", .0.display_name())]
    EmptyProviderResponse(Provider),

    #[error("{} API call failed: {detail}", .provider.display_name())]
    BackendCallError { provider: Provider, detail: String },
}

impl BackendFailure {
    pub fn call(provider: Provider, detail: impl Into<String>) -> Self {
        BackendFailure::BackendCallError {
            provider,
            detail: detail.into(),
        }
    }
}

/// Produces completion text for a (system, user) prompt pair.
///
/// Implementations own their credential and must report a missing one as
/// [`BackendFailure::ConfigurationError`] before doing any I/O.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    fn provider(&self) -> Provider;

    fn model(&self) -> &str;

    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, BackendFailure>;
}
