//! HTTP-level tests for the submission endpoint, run in-process against the router.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use pwassist_core::types::Provider;
use pwassist_engine::gateway::ProviderGateway;
use pwassist_engine::orchestrator::RequestOrchestrator;
use pwassist_engine::traits::{BackendFailure, CompletionBackend};
use pwassist_server::router::{SUBMIT_PATH, build_router};
use serde_json::{Value, json};
use tower::ServiceExt;

struct FixedBackend {
    provider: Provider,
    reply: Result<String, BackendFailure>,
}

#[async_trait::async_trait]
impl CompletionBackend for FixedBackend {
    fn provider(&self) -> Provider {
        self.provider
    }

    fn model(&self) -> &str {
        "fixed"
    }

    async fn complete(&self, _system: &str, _user: &str) -> Result<String, BackendFailure> {
        self.reply.clone()
    }
}

fn app(gemini_reply: Result<String, BackendFailure>) -> axum::Router {
    let gateway = ProviderGateway::new(
        Arc::new(FixedBackend {
            provider: Provider::OpenAi,
            reply: Ok("Looks good.\n```ts\nawait page.getByRole('button').click();\n```".into()),
        }),
        Arc::new(FixedBackend {
            provider: Provider::Gemini,
            reply: gemini_reply,
        }),
    );
    build_router(RequestOrchestrator::new(gateway))
}

fn post(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(SUBMIT_PATH)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let resp = app(Ok("x".into()))
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn success_returns_result() {
    let resp = app(Ok("x".into()))
        .oneshot(post(json!({"mode": "analyze", "codegenCode": "await page.goto('/');"})))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert!(body["result"].as_str().unwrap().starts_with("Looks good."));
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn get_is_405_with_allow_header() {
    let resp = app(Ok("x".into()))
        .oneshot(Request::builder().uri(SUBMIT_PATH).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(resp.headers().get(header::ALLOW).unwrap(), "POST");
    assert_eq!(body_json(resp).await, json!({"error": "Method GET Not Allowed"}));
}

#[tokio::test]
async fn empty_code_is_400_with_details() {
    let resp = app(Ok("x".into()))
        .oneshot(post(json!({"mode": "analyze", "codegenCode": ""})))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(resp).await,
        json!({
            "error": "Input validation error.",
            "details": {"codegenCode": ["Codegen code cannot be empty."]}
        })
    );
}

#[tokio::test]
async fn unknown_provider_is_400_invalid_format() {
    let resp = app(Ok("x".into()))
        .oneshot(post(json!({"mode": "generate", "llmProvider": "claude", "scenario": "Given"})))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "Invalid request format.");
    assert!(body["details"]["llmProvider"].is_array());
}

#[tokio::test]
async fn provider_failure_is_500() {
    let resp = app(Err(BackendFailure::call(
        Provider::Gemini,
        "error sending request",
    )))
    .oneshot(post(json!({
        "mode": "generate",
        "llmProvider": "gemini",
        "scenario": "Given a user..."
    })))
    .await
    .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(resp).await,
        json!({"error": "LLM API (gemini - generate) Gemini API call failed: error sending request"})
    );
}
