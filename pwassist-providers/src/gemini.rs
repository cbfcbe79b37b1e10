//! Google Gemini `generateContent` requests.

use crate::join_url;
use crate::request::HttpRequest;
use serde::Serialize;

#[derive(Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

/// Builds a single-turn request. The system prompt travels as `systemInstruction`.
pub fn build_generate_content_request(
    cfg: &GeminiConfig,
    system_prompt: &str,
    user_prompt: &str,
) -> HttpRequest {
    let body = GenerateContentRequest {
        contents: vec![GeminiContent {
            role: Some("user"),
            parts: vec![GeminiPart { text: user_prompt }],
        }],
        system_instruction: (!system_prompt.trim().is_empty()).then(|| GeminiContent {
            role: None,
            parts: vec![GeminiPart {
                text: system_prompt,
            }],
        }),
    };

    // Serializing plain structs of strings cannot fail.
    let payload = serde_json::to_value(&body).unwrap_or_default();

    HttpRequest::post_json(
        join_url(
            &cfg.base_url,
            &format!("/models/{}:generateContent", cfg.model),
        ),
        &payload,
        [("x-goog-api-key".to_string(), cfg.api_key.clone())],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Body;

    fn cfg() -> GeminiConfig {
        GeminiConfig {
            base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            api_key: "g-key".into(),
            model: "gemini-2.0-flash-001".into(),
        }
    }

    #[test]
    fn targets_model_endpoint_with_key_header() {
        let req = build_generate_content_request(&cfg(), "sys", "user");
        assert_eq!(
            req.url,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash-001:generateContent"
        );
        assert_eq!(req.header("x-goog-api-key"), Some("g-key"));
        assert!(!format!("{req:?}").contains("g-key"));
    }

    #[test]
    fn body_carries_both_prompts() {
        let req = build_generate_content_request(&cfg(), "You are an expert.", "Convert this.");
        let Body::Json(s) = &req.body else {
            panic!("expected json");
        };
        let v: serde_json::Value = serde_json::from_str(s).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": "Convert this."}]}],
                "systemInstruction": {"parts": [{"text": "You are an expert."}]}
            })
        );
    }

    #[test]
    fn blank_system_prompt_is_omitted() {
        let req = build_generate_content_request(&cfg(), "  ", "Convert this.");
        let Body::Json(s) = &req.body else {
            panic!("expected json");
        };
        assert!(!s.contains("systemInstruction"));
    }
}
