use crate::schema::{FieldErrors, ValidationFailure};
use serde::{Deserialize, Serialize};

/// JSON body returned for every request: `{result}` or `{error, details?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseEnvelope {
    Success {
        result: String,
    },
    Failure {
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<FieldErrors>,
    },
}

impl ResponseEnvelope {
    pub fn success(result: impl Into<String>) -> Self {
        ResponseEnvelope::Success {
            result: result.into(),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        ResponseEnvelope::Failure {
            error: error.into(),
            details: None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ResponseEnvelope::Success { .. } => None,
            ResponseEnvelope::Failure { error, .. } => Some(error),
        }
    }
}

impl From<&ValidationFailure> for ResponseEnvelope {
    fn from(failure: &ValidationFailure) -> Self {
        let details = failure.details();
        ResponseEnvelope::Failure {
            error: failure.to_string(),
            details: (!details.is_empty()).then(|| details.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_both_shapes() {
        assert_eq!(
            serde_json::to_value(ResponseEnvelope::success("ok")).unwrap(),
            json!({"result": "ok"})
        );
        assert_eq!(
            serde_json::to_value(ResponseEnvelope::failure("Method GET Not Allowed")).unwrap(),
            json!({"error": "Method GET Not Allowed"})
        );
    }

    #[test]
    fn validation_failure_carries_details() {
        let failure = crate::schema::validate(&json!({"mode": "analyze", "codegenCode": ""}))
            .unwrap_err();
        let envelope = ResponseEnvelope::from(&failure);
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "error": "Input validation error.",
                "details": {"codegenCode": ["Codegen code cannot be empty."]}
            })
        );
    }

    #[test]
    fn decodes_error_bodies() {
        let envelope: ResponseEnvelope =
            serde_json::from_str(r#"{"error":"LLM API (openai - analyze) boom"}"#).unwrap();
        assert_eq!(envelope.error_message(), Some("LLM API (openai - analyze) boom"));
    }
}
