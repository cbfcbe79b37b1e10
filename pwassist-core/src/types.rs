use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Analyze,
    Generate,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Analyze, Mode::Generate];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Analyze => "analyze",
            Mode::Generate => "generate",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == value)
    }

    /// The wire field that carries this mode's input text.
    pub fn input_field(self) -> &'static str {
        match self {
            Mode::Analyze => "codegenCode",
            Mode::Generate => "scenario",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Provider {
    #[default]
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "gemini")]
    Gemini,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::OpenAi, Provider::Gemini];

    pub fn as_str(self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Gemini => "gemini",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == value)
    }

    // Used in user-facing error text ("OpenAI API key is not configured.").
    pub fn display_name(self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI",
            Provider::Gemini => "Gemini",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Loosely-typed request as it appears on the wire.
///
/// This is both the output of the shape pass and the body the client sends.
/// It says nothing about whether the text required by `mode` is present.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestInput {
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub llm_provider: Provider,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codegen_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<String>,
}

impl RequestInput {
    /// Builds the body for `mode`, placing `text` in the field that mode reads.
    pub fn for_mode(mode: Mode, provider: Provider, text: impl Into<String>) -> Self {
        let text = text.into();
        let (codegen_code, scenario) = match mode {
            Mode::Analyze => (Some(text), None),
            Mode::Generate => (None, Some(text)),
        };
        Self {
            mode,
            llm_provider: provider,
            codegen_code,
            scenario,
        }
    }
}

/// What the caller asked for. Each variant owns exactly the text its mode needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    Analyze { codegen_code: String },
    Generate { scenario: String },
}

impl Task {
    pub fn mode(&self) -> Mode {
        match self {
            Task::Analyze { .. } => Mode::Analyze,
            Task::Generate { .. } => Mode::Generate,
        }
    }
}

/// A request that passed both validation stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPayload {
    pub provider: Provider,
    pub task: Task,
}

impl RequestPayload {
    pub fn mode(&self) -> Mode {
        self.task.mode()
    }
}
