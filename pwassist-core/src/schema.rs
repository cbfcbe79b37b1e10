//! Two-stage validation of untrusted request bodies.
//!
//! The shape pass turns an arbitrary JSON value into a [`RequestInput`], applying
//! defaults and rejecting wrong primitive types. The semantic pass then requires the
//! text field that belongs to the selected mode, producing a [`RequestPayload`].
//! Keeping the passes apart lets callers tell "wrong type" from "empty for this mode".

use crate::types::{Mode, Provider, RequestInput, RequestPayload, Task};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Field name -> ordered human-readable messages.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

pub const CODEGEN_CODE_EMPTY: &str = "Codegen code cannot be empty.";
pub const SCENARIO_EMPTY: &str = "BDD scenario cannot be empty.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("Invalid request format.")]
    MalformedRequest { details: FieldErrors },

    #[error("Input validation error.")]
    SemanticValidationError { details: FieldErrors },
}

impl ValidationFailure {
    pub fn details(&self) -> &FieldErrors {
        match self {
            ValidationFailure::MalformedRequest { details }
            | ValidationFailure::SemanticValidationError { details } => details,
        }
    }

    /// Short class label for logs.
    pub fn class(&self) -> &'static str {
        match self {
            ValidationFailure::MalformedRequest { .. } => "malformed_request",
            ValidationFailure::SemanticValidationError { .. } => "semantic_validation",
        }
    }

    pub fn malformed(field: &str, message: impl Into<String>) -> Self {
        let mut details = FieldErrors::new();
        details.insert(field.to_string(), vec![message.into()]);
        ValidationFailure::MalformedRequest { details }
    }
}

/// Runs both passes.
pub fn validate(raw: &Value) -> Result<RequestPayload, ValidationFailure> {
    let input = coerce(raw)?;
    validate_semantics(input)
}

/// Shape pass: object check, primitive types, enum membership and defaults.
///
/// Unknown fields are ignored. Every bad field is reported, not just the first.
pub fn coerce(raw: &Value) -> Result<RequestInput, ValidationFailure> {
    let Some(obj) = raw.as_object() else {
        return Err(ValidationFailure::malformed(
            "body",
            format!("Expected a JSON object, received {}.", type_name(raw)),
        ));
    };

    let mut errors = FieldErrors::new();

    let mode = enum_field(obj, "mode", Mode::parse, &Mode::ALL.map(Mode::as_str), &mut errors)
        .unwrap_or_default();
    let llm_provider = enum_field(
        obj,
        "llmProvider",
        Provider::parse,
        &Provider::ALL.map(Provider::as_str),
        &mut errors,
    )
    .unwrap_or_default();
    let codegen_code = string_field(obj, "codegenCode", &mut errors);
    let scenario = string_field(obj, "scenario", &mut errors);

    if !errors.is_empty() {
        return Err(ValidationFailure::MalformedRequest { details: errors });
    }

    Ok(RequestInput {
        mode,
        llm_provider,
        codegen_code,
        scenario,
    })
}

/// Semantic pass: the mode's own text must be present and not blank.
pub fn validate_semantics(input: RequestInput) -> Result<RequestPayload, ValidationFailure> {
    let RequestInput {
        mode,
        llm_provider,
        codegen_code,
        scenario,
    } = input;

    let task = match mode {
        Mode::Analyze => Task::Analyze {
            codegen_code: required_text(codegen_code, mode, CODEGEN_CODE_EMPTY)?,
        },
        Mode::Generate => Task::Generate {
            scenario: required_text(scenario, mode, SCENARIO_EMPTY)?,
        },
    };

    Ok(RequestPayload {
        provider: llm_provider,
        task,
    })
}

fn required_text(
    value: Option<String>,
    mode: Mode,
    message: &str,
) -> Result<String, ValidationFailure> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => {
            let mut details = FieldErrors::new();
            details.insert(mode.input_field().to_string(), vec![message.to_string()]);
            Err(ValidationFailure::SemanticValidationError { details })
        }
    }
}

fn enum_field<T>(
    obj: &Map<String, Value>,
    name: &str,
    parse: impl Fn(&str) -> Option<T>,
    allowed: &[&str],
    errors: &mut FieldErrors,
) -> Option<T> {
    let value = obj.get(name)?;
    let parsed = value.as_str().and_then(&parse);
    if parsed.is_none() {
        let expected = allowed
            .iter()
            .map(|a| format!("'{a}'"))
            .collect::<Vec<_>>()
            .join(" | ");
        let received = match value.as_str() {
            Some(s) => format!("'{s}'"),
            None => type_name(value).to_string(),
        };
        errors
            .entry(name.to_string())
            .or_default()
            .push(format!("Invalid enum value. Expected {expected}, received {received}"));
    }
    parsed
}

fn string_field(obj: &Map<String, Value>, name: &str, errors: &mut FieldErrors) -> Option<String> {
    match obj.get(name)? {
        Value::String(s) => Some(s.clone()),
        other => {
            errors
                .entry(name.to_string())
                .or_default()
                .push(format!("Expected string, received {}", type_name(other)));
            None
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn analyze_without_code_names_codegen_code() {
        for body in [
            json!({"mode": "analyze"}),
            json!({"mode": "analyze", "codegenCode": ""}),
            json!({"mode": "analyze", "codegenCode": "  \n\t "}),
        ] {
            let err = validate(&body).unwrap_err();
            assert!(matches!(err, ValidationFailure::SemanticValidationError { .. }));
            assert_eq!(
                err.details().get("codegenCode"),
                Some(&vec![CODEGEN_CODE_EMPTY.to_string()])
            );
        }
    }

    #[test]
    fn generate_without_scenario_names_scenario() {
        let err = validate(&json!({"mode": "generate", "codegenCode": "x"})).unwrap_err();
        assert!(matches!(err, ValidationFailure::SemanticValidationError { .. }));
        assert_eq!(
            err.details().get("scenario"),
            Some(&vec![SCENARIO_EMPTY.to_string()])
        );
        assert!(!err.details().contains_key("codegenCode"));
    }

    #[test]
    fn defaults_mode_and_provider() {
        let payload = validate(&json!({"codegenCode": "await page.goto('/')"})).unwrap();
        assert_eq!(payload.provider, Provider::OpenAi);
        assert_eq!(
            payload.task,
            Task::Analyze {
                codegen_code: "await page.goto('/')".into()
            }
        );
    }

    #[test]
    fn keeps_text_verbatim() {
        let payload = validate(&json!({
            "mode": "generate",
            "llmProvider": "gemini",
            "scenario": "  Given a user\n",
        }))
        .unwrap();
        assert_eq!(payload.provider, Provider::Gemini);
        assert_eq!(
            payload.task,
            Task::Generate {
                scenario: "  Given a user\n".into()
            }
        );
    }

    #[test]
    fn wrong_types_are_malformed_not_semantic() {
        let err = validate(&json!({"mode": "analyze", "codegenCode": 42})).unwrap_err();
        assert!(matches!(err, ValidationFailure::MalformedRequest { .. }));
        assert_eq!(
            err.details().get("codegenCode"),
            Some(&vec!["Expected string, received number".to_string()])
        );
    }

    #[test]
    fn unknown_enum_values_are_malformed() {
        let err = coerce(&json!({"mode": "summarize", "llmProvider": "claude"})).unwrap_err();
        let details = err.details();
        assert_eq!(
            details["mode"],
            vec!["Invalid enum value. Expected 'analyze' | 'generate', received 'summarize'"]
        );
        assert_eq!(
            details["llmProvider"],
            vec!["Invalid enum value. Expected 'openai' | 'gemini', received 'claude'"]
        );
    }

    #[test]
    fn non_object_body_is_malformed() {
        let err = coerce(&json!(["analyze"])).unwrap_err();
        assert!(matches!(err, ValidationFailure::MalformedRequest { .. }));
        assert!(err.details().contains_key("body"));
    }

    #[test]
    fn validation_is_repeatable() {
        let body = json!({"mode": "analyze", "codegenCode": ""});
        assert_eq!(validate(&body), validate(&body));
    }
}
