use crate::gateway::ProviderGateway;
use pwassist_core::envelope::ResponseEnvelope;
use pwassist_core::prompt::build_prompt;
use pwassist_core::schema::{ValidationFailure, coerce, validate_semantics};
use serde_json::Value;

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_METHOD_NOT_ALLOWED: u16 = 405;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// Verbs accepted by the submission endpoint, as sent in the `Allow` header.
pub const ALLOWED_METHODS: &str = "POST";

/// Transport-neutral outcome of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handled {
    pub status: u16,
    pub envelope: ResponseEnvelope,
    /// Set only for 405 responses.
    pub allow: Option<&'static str>,
}

impl Handled {
    fn new(status: u16, envelope: ResponseEnvelope) -> Self {
        Self {
            status,
            envelope,
            allow: None,
        }
    }

    fn invalid(failure: &ValidationFailure) -> Self {
        Self::new(STATUS_BAD_REQUEST, ResponseEnvelope::from(failure))
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Validation -> prompt -> provider -> envelope. Every stage short-circuits.
#[derive(Clone)]
pub struct RequestOrchestrator {
    gateway: ProviderGateway,
}

impl RequestOrchestrator {
    pub fn new(gateway: ProviderGateway) -> Self {
        Self { gateway }
    }

    /// Entry point for raw HTTP input: verb check, then JSON decoding.
    pub async fn handle(&self, method: &str, body: &[u8]) -> Handled {
        if method != ALLOWED_METHODS {
            log::warn!("rejected {method} request");
            return Handled {
                status: STATUS_METHOD_NOT_ALLOWED,
                envelope: ResponseEnvelope::failure(format!("Method {method} Not Allowed")),
                allow: Some(ALLOWED_METHODS),
            };
        }

        let raw = match decode_body(body) {
            Ok(v) => v,
            Err(failure) => {
                log::error!("request body rejected ({}): {:?}", failure.class(), failure.details());
                return Handled::invalid(&failure);
            }
        };

        self.handle_value(&raw).await
    }

    /// Runs an already-decoded body through both validation stages and the gateway.
    pub async fn handle_value(&self, raw: &Value) -> Handled {
        let input = match coerce(raw) {
            Ok(input) => input,
            Err(failure) => {
                log::error!("initial validation failed: {:?}", failure.details());
                return Handled::invalid(&failure);
            }
        };

        let payload = match validate_semantics(input) {
            Ok(payload) => payload,
            Err(failure) => {
                log::error!("input validation failed: {:?}", failure.details());
                return Handled::invalid(&failure);
            }
        };

        let prompt = build_prompt(&payload);
        let (provider, mode) = (payload.provider, payload.mode());

        match self.gateway.dispatch(provider, mode, &prompt).await {
            Ok(result) => Handled::new(STATUS_OK, ResponseEnvelope::success(result)),
            Err(e) => Handled::new(STATUS_INTERNAL_ERROR, ResponseEnvelope::failure(e.to_string())),
        }
    }
}

fn decode_body(body: &[u8]) -> Result<Value, ValidationFailure> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ValidationFailure::malformed("body", "Request body is empty."));
    }
    serde_json::from_slice(body)
        .map_err(|e| ValidationFailure::malformed("body", format!("Malformed JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::tests::ScriptedBackend;
    use crate::traits::BackendFailure;
    use pwassist_core::prompt::{SYSTEM_PROMPT_ANALYZE, SYSTEM_PROMPT_GENERATE};
    use pwassist_core::types::Provider;
    use serde_json::json;
    use std::sync::Arc;

    struct Fixture {
        orchestrator: RequestOrchestrator,
        openai: Arc<ScriptedBackend>,
        gemini: Arc<ScriptedBackend>,
    }

    fn fixture(
        openai: Result<String, BackendFailure>,
        gemini: Result<String, BackendFailure>,
    ) -> Fixture {
        let openai = ScriptedBackend::new(Provider::OpenAi, openai);
        let gemini = ScriptedBackend::new(Provider::Gemini, gemini);
        Fixture {
            orchestrator: RequestOrchestrator::new(ProviderGateway::new(
                openai.clone(),
                gemini.clone(),
            )),
            openai,
            gemini,
        }
    }

    fn ok_fixture() -> Fixture {
        fixture(Ok("openai says hi".into()), Ok("gemini says hi".into()))
    }

    fn body(v: Value) -> Vec<u8> {
        serde_json::to_vec(&v).unwrap()
    }

    #[tokio::test]
    async fn non_post_is_405_with_allow() {
        let f = ok_fixture();
        let handled = f.orchestrator.handle("GET", b"").await;
        assert_eq!(handled.status, STATUS_METHOD_NOT_ALLOWED);
        assert_eq!(handled.allow, Some("POST"));
        assert_eq!(
            handled.envelope,
            ResponseEnvelope::failure("Method GET Not Allowed")
        );
        assert_eq!(f.openai.call_count(), 0);
    }

    #[tokio::test]
    async fn method_match_is_case_sensitive() {
        let f = ok_fixture();
        let handled = f
            .orchestrator
            .handle("post", &body(json!({"codegenCode": "await page.goto('/');"})))
            .await;
        assert_eq!(handled.status, STATUS_METHOD_NOT_ALLOWED);
        assert_eq!(
            handled.envelope,
            ResponseEnvelope::failure("Method post Not Allowed")
        );
        assert_eq!(f.openai.call_count(), 0);
    }

    #[tokio::test]
    async fn analyze_success_uses_openai_by_default() {
        let f = ok_fixture();
        let handled = f
            .orchestrator
            .handle("POST", &body(json!({"mode": "analyze", "codegenCode": "await page.goto('/');"})))
            .await;

        assert!(handled.is_success());
        assert_eq!(handled.envelope, ResponseEnvelope::success("openai says hi"));
        let calls = f.openai.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, SYSTEM_PROMPT_ANALYZE);
        assert!(calls[0].1.contains("await page.goto('/');"));
        assert_eq!(f.gemini.call_count(), 0);
    }

    #[tokio::test]
    async fn generate_routes_to_gemini() {
        let f = ok_fixture();
        let handled = f
            .orchestrator
            .handle_value(&json!({
                "mode": "generate",
                "llmProvider": "gemini",
                "scenario": "Given a user on the home page",
            }))
            .await;

        assert_eq!(handled.envelope, ResponseEnvelope::success("gemini says hi"));
        assert_eq!(f.gemini.calls.lock().unwrap()[0].0, SYSTEM_PROMPT_GENERATE);
    }

    #[tokio::test]
    async fn empty_code_is_400_before_any_call() {
        let f = ok_fixture();
        let handled = f
            .orchestrator
            .handle("POST", &body(json!({"mode": "analyze", "codegenCode": ""})))
            .await;

        assert_eq!(handled.status, STATUS_BAD_REQUEST);
        assert_eq!(
            serde_json::to_value(&handled.envelope).unwrap(),
            json!({
                "error": "Input validation error.",
                "details": {"codegenCode": ["Codegen code cannot be empty."]}
            })
        );
        assert_eq!(f.openai.call_count(), 0);
    }

    #[tokio::test]
    async fn wrong_types_and_bad_json_are_400() {
        let f = ok_fixture();

        let handled = f
            .orchestrator
            .handle("POST", &body(json!({"mode": "analyze", "codegenCode": ["x"]})))
            .await;
        assert_eq!(handled.status, STATUS_BAD_REQUEST);
        assert_eq!(handled.envelope.error_message(), Some("Invalid request format."));

        let handled = f.orchestrator.handle("POST", b"{not json").await;
        assert_eq!(handled.status, STATUS_BAD_REQUEST);

        let handled = f.orchestrator.handle("POST", b"  ").await;
        assert_eq!(handled.status, STATUS_BAD_REQUEST);
        assert_eq!(f.openai.call_count(), 0);
    }

    #[tokio::test]
    async fn provider_failure_is_500_naming_provider_and_mode() {
        let f = fixture(
            Err(BackendFailure::call(Provider::OpenAi, "http request failed")),
            Ok("unused".into()),
        );
        let handled = f
            .orchestrator
            .handle("POST", &body(json!({"mode": "generate", "scenario": "Given a user..."})))
            .await;

        assert_eq!(handled.status, STATUS_INTERNAL_ERROR);
        let message = handled.envelope.error_message().unwrap();
        assert_eq!(
            message,
            "LLM API (openai - generate) OpenAI API call failed: http request failed"
        );
        assert!(message.contains("openai") && message.contains("generate"));
        assert_eq!(f.openai.call_count(), 1);
    }
}
