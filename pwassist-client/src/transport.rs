use async_trait::async_trait;
use pwassist_core::types::{Mode, RequestInput};
use pwassist_providers::request::HttpRequest;
use pwassist_providers::runtime::{HttpResponse, HttpRuntime};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::labels::request_failed_message;

pub const SUBMIT_PATH: &str = "/api/analyze-codegen";
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// Why a submission produced no result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The server answered with a non-2xx status.
    #[error("{0}")]
    Api(String),

    /// The request never completed or its response could not be decoded.
    #[error("{0}")]
    Request(String),
}

impl SubmitError {
    /// Banner text for the error, falling back to a mode-specific message.
    pub fn banner(&self, mode: Mode) -> String {
        let msg = self.to_string();
        if msg.trim().is_empty() {
            request_failed_message(mode).to_string()
        } else {
            msg
        }
    }
}

/// Sends one request body to the server and returns the raw result text.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn submit(&self, body: &RequestInput) -> Result<String, SubmitError>;
}

#[derive(Deserialize)]
struct SuccessBody {
    result: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    runtime: HttpRuntime,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(server_url: &str) -> anyhow::Result<Self> {
        let runtime = HttpRuntime::new(Duration::from_secs(10), Duration::from_secs(120))?;
        Ok(Self {
            runtime,
            endpoint: format!("{}{SUBMIT_PATH}", server_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn submit(&self, body: &RequestInput) -> Result<String, SubmitError> {
        let payload =
            serde_json::to_value(body).map_err(|e| SubmitError::Request(e.to_string()))?;
        let req = HttpRequest::post_json(&self.endpoint, &payload, []);

        let resp = self
            .runtime
            .execute(&req)
            .await
            .map_err(|e| SubmitError::Request(format!("{e:#}")))?;

        if !resp.is_success() {
            return Err(SubmitError::Api(api_error_message(&resp)));
        }

        serde_json::from_slice::<SuccessBody>(&resp.body)
            .map(|b| b.result)
            .map_err(|e| SubmitError::Request(format!("decode response: {e}")))
    }
}

fn api_error_message(resp: &HttpResponse) -> String {
    let fallback = || {
        let reason = reqwest::StatusCode::from_u16(resp.status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("");
        format!("API request failed: {} {reason}", resp.status)
            .trim_end()
            .to_string()
    };

    match serde_json::from_slice::<ErrorBody>(&resp.body) {
        Ok(ErrorBody { error: Some(msg) }) if !msg.is_empty() => msg,
        Ok(_) => fallback(),
        Err(e) => {
            log::warn!("error response was not JSON: {e}");
            fallback()
        }
    }
}
