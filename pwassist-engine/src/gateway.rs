use crate::traits::{BackendFailure, CompletionBackend};
use pwassist_core::prompt::BuiltPrompt;
use pwassist_core::types::{Mode, Provider};
use std::sync::Arc;
use thiserror::Error;

/// A failed dispatch, tagged with who was asked and for what.
///
/// Displays as `LLM API (<provider> - <mode>) <message>`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("LLM API ({provider} - {mode}) {failure}")]
pub struct ProviderError {
    pub provider: Provider,
    pub mode: Mode,
    failure: BackendFailure,
}

impl ProviderError {
    pub fn message(&self) -> String {
        self.failure.to_string()
    }

    #[cfg(test)]
    pub(crate) fn failure(&self) -> &BackendFailure {
        &self.failure
    }
}

/// Routes a prompt pair to the backend selected by [`Provider`].
///
/// One attempt per call; nothing is retried.
#[derive(Clone)]
pub struct ProviderGateway {
    openai: Arc<dyn CompletionBackend>,
    gemini: Arc<dyn CompletionBackend>,
}

impl ProviderGateway {
    pub fn new(openai: Arc<dyn CompletionBackend>, gemini: Arc<dyn CompletionBackend>) -> Self {
        debug_assert_eq!(openai.provider(), Provider::OpenAi);
        debug_assert_eq!(gemini.provider(), Provider::Gemini);
        Self { openai, gemini }
    }

    fn backend(&self, provider: Provider) -> &Arc<dyn CompletionBackend> {
        match provider {
            Provider::OpenAi => &self.openai,
            Provider::Gemini => &self.gemini,
        }
    }

    pub async fn dispatch(
        &self,
        provider: Provider,
        mode: Mode,
        prompt: &BuiltPrompt,
    ) -> Result<String, ProviderError> {
        let backend = self.backend(provider);
        log::info!(
            "dispatching mode={mode} provider={provider} model={}",
            backend.model()
        );

        let outcome = backend
            .complete(&prompt.system_prompt, &prompt.user_prompt)
            .await
            .and_then(|text| {
                if text.trim().is_empty() {
                    Err(BackendFailure::EmptyProviderResponse(provider))
                } else {
                    Ok(text)
                }
            });

        match outcome {
            Ok(text) => {
                log::info!("received result from {provider} (len={})", text.len());
                Ok(text)
            }
            Err(failure) => {
                log::error!("provider={provider} mode={mode}: {failure}");
                Err(ProviderError {
                    provider,
                    mode,
                    failure,
                })
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays a fixed reply and records the prompts it was given.
    pub(crate) struct ScriptedBackend {
        pub provider: Provider,
        pub reply: Result<String, BackendFailure>,
        pub calls: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedBackend {
        pub fn new(provider: Provider, reply: Result<String, BackendFailure>) -> Arc<Self> {
            Arc::new(Self {
                provider,
                reply,
                calls: Mutex::new(vec![]),
            })
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionBackend for ScriptedBackend {
        fn provider(&self) -> Provider {
            self.provider
        }

        fn model(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            system_prompt: &str,
            user_prompt: &str,
        ) -> Result<String, BackendFailure> {
            self.calls
                .lock()
                .unwrap()
                .push((system_prompt.to_string(), user_prompt.to_string()));
            self.reply.clone()
        }
    }

    fn prompt() -> BuiltPrompt {
        BuiltPrompt {
            system_prompt: "sys".into(),
            user_prompt: "user".into(),
        }
    }

    #[tokio::test]
    async fn routes_to_selected_backend() {
        let openai = ScriptedBackend::new(Provider::OpenAi, Ok("from openai".into()));
        let gemini = ScriptedBackend::new(Provider::Gemini, Ok("from gemini".into()));
        let gateway = ProviderGateway::new(openai.clone(), gemini.clone());

        let text = gateway
            .dispatch(Provider::Gemini, Mode::Generate, &prompt())
            .await
            .unwrap();
        assert_eq!(text, "from gemini");
        assert_eq!(openai.call_count(), 0);
        assert_eq!(
            gemini.calls.lock().unwrap()[0],
            ("sys".to_string(), "user".to_string())
        );
    }

    #[tokio::test]
    async fn blank_text_is_an_empty_response() {
        let gateway = ProviderGateway::new(
            ScriptedBackend::new(Provider::OpenAi, Ok(" \n ".into())),
            ScriptedBackend::new(Provider::Gemini, Ok("unused".into())),
        );

        let err = gateway
            .dispatch(Provider::OpenAi, Mode::Analyze, &prompt())
            .await
            .unwrap_err();
        assert_eq!(
            err.failure(),
            &BackendFailure::EmptyProviderResponse(Provider::OpenAi)
        );
        assert_eq!(
            err.to_string(),
            "LLM API (openai - analyze) OpenAI API returned an empty result."
        );
    }

    #[tokio::test]
    async fn failures_carry_provider_and_mode() {
        let gateway = ProviderGateway::new(
            ScriptedBackend::new(Provider::OpenAi, Ok("unused".into())),
            ScriptedBackend::new(
                Provider::Gemini,
                Err(BackendFailure::ConfigurationError(Provider::Gemini)),
            ),
        );

        let err = gateway
            .dispatch(Provider::Gemini, Mode::Generate, &prompt())
            .await
            .unwrap_err();
        assert_eq!(err.provider, Provider::Gemini);
        assert_eq!(err.mode, Mode::Generate);
        assert_eq!(err.message(), "Gemini API key is not configured.");
    }
}
