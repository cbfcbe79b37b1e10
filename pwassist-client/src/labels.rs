use pwassist_core::types::{Mode, Provider};
use std::fmt::Write;

/// User-facing strings for one mode's page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeLabels {
    pub tab_title: &'static str,
    pub page_title: &'static str,
    pub description: &'static str,
    pub input_label: &'static str,
    pub input_placeholder: &'static str,
    pub button_label: &'static str,
    pub result_title: &'static str,
    pub loading_text: &'static str,
}

pub const PROVIDER_PICKER_LABEL: &str = "Select AI model to use:";
pub const ERROR_BANNER_PREFIX: &str = "Error:";

const ANALYZE: ModeLabels = ModeLabels {
    tab_title: "Codegen Code Analysis",
    page_title: "Playwright Codegen Analyzer",
    description: "Paste the code generated using Playwright Test Generator's 'Record a New Test' feature below, select the AI model for analysis, and click the 'Analyze with AI' button.",
    input_label: "Enter Playwright Codegen Code:",
    input_placeholder: "Paste your Playwright Codegen code here.",
    button_label: "Analyze with AI",
    result_title: "AI Analysis Result:",
    loading_text: "AI is analyzing...",
};

const GENERATE: ModeLabels = ModeLabels {
    tab_title: "BDD Test Generation",
    page_title: "Playwright BDD Test Generator",
    description: "Enter your BDD scenario below, select the AI model for generation, and click the 'Generate BDD Test' button.",
    input_label: "Enter BDD Scenario:",
    input_placeholder: "Enter your BDD scenario here (e.g., Given-When-Then format).",
    button_label: "Generate BDD Test",
    result_title: "Generated Playwright Test Code:",
    loading_text: "AI is generating code...",
};

pub fn labels(mode: Mode) -> &'static ModeLabels {
    match mode {
        Mode::Analyze => &ANALYZE,
        Mode::Generate => &GENERATE,
    }
}

/// Plain-text help for every mode and the provider choice.
pub fn overview() -> String {
    let mut out = String::new();
    for mode in Mode::ALL {
        let l = labels(mode);
        let _ = writeln!(out, "{mode}: {} ({})", l.tab_title, l.page_title);
        let _ = writeln!(out, "  {}", l.description);
        let _ = writeln!(out, "  {} {}", l.input_label, l.input_placeholder);
        let _ = writeln!(out, "  submit: {}", l.button_label);
    }
    let providers: Vec<&str> = Provider::ALL.iter().map(|p| p.display_name()).collect();
    let _ = writeln!(out, "{PROVIDER_PICKER_LABEL} {}", providers.join(", "));
    out
}

/// Shown when submit is attempted with blank input.
pub fn empty_input_message(mode: Mode) -> &'static str {
    match mode {
        Mode::Analyze => "Please enter the Codegen code.",
        Mode::Generate => "Please enter the BDD scenario.",
    }
}

/// Fallback banner when a failed request carries no message of its own.
pub fn request_failed_message(mode: Mode) -> &'static str {
    match mode {
        Mode::Analyze => "An error occurred during analysis.",
        Mode::Generate => "An error occurred during generation.",
    }
}
