//! Router construction and handlers.

use std::any::Any;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{any, get};
use axum::Router;
use pwassist_core::envelope::ResponseEnvelope;
use pwassist_engine::orchestrator::{Handled, RequestOrchestrator};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub const SUBMIT_PATH: &str = "/api/analyze-codegen";

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<RequestOrchestrator>,
}

pub fn build_router(orchestrator: RequestOrchestrator) -> Router {
    let state = AppState {
        orchestrator: Arc::new(orchestrator),
    };

    Router::new()
        .route("/api/health", get(health))
        // Every verb reaches the orchestrator so it can answer 405 with its own body.
        .route(SUBMIT_PATH, any(analyze_codegen))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(panic_response))
                .layer(
                    CorsLayer::new()
                        .allow_origin(AnyOrigin)
                        .allow_methods([Method::POST])
                        .allow_headers([header::CONTENT_TYPE]),
                ),
        )
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn analyze_codegen(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Response {
    let handled = state.orchestrator.handle(method.as_str(), &body).await;
    if !handled.is_success() {
        tracing::warn!(status = handled.status, "request failed");
    }
    into_response(handled)
}

fn into_response(handled: Handled) -> Response {
    let status = StatusCode::from_u16(handled.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = (status, Json(handled.envelope)).into_response();
    if let Some(allow) = handled.allow {
        response
            .headers_mut()
            .insert(header::ALLOW, HeaderValue::from_static(allow));
    }
    response
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(detail, "handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ResponseEnvelope::failure(
            "An unknown error occurred during the API call.",
        )),
    )
        .into_response()
}
