use crate::types::{Mode, RequestPayload, Task};

pub const SYSTEM_PROMPT_ANALYZE: &str = "You are an expert in analyzing Playwright code.";
pub const SYSTEM_PROMPT_GENERATE: &str =
    "You are an expert in generating Playwright BDD test code using TypeScript.";

const ANALYZE_INSTRUCTIONS: &str = "\
Analyze the following Playwright Codegen **TypeScript** code and explain the following improvements in natural language:
- Suggest more robust selectors (e.g., using data-testid attributes).
- Check for unnecessary waits and suggest improvements if any.
- Explain the purpose of the actions and assertions performed in each step in natural language.
- Suggest adding potentially missing important assertions.
- Suggest refactoring for better code readability.
- Provide a brief explanation of the Playwright APIs used in the code.";

const GENERATE_INSTRUCTIONS: &str = "\
Convert the following BDD scenario into a Playwright test code draft using TypeScript syntax:
- Use Playwright's basic functions (describe, test).
- **Write the initial page navigation (page.goto in the Given step) directly within the test() function body.**
- **Wrap subsequent actions (When) and assertions (Then) steps with test.step(), clearly including comments or step names for each step.**
- Include basic Playwright actions or assertion code corresponding to each step.
- Suggest refactoring for better code readability.
- Provide a brief explanation of the Playwright APIs used in the code.";

// The segmenter relies on generated code arriving inside a fenced block.
const GENERATE_FENCING_RULE: &str = "Generate the Playwright test code inside a code block (```typescript), and write any explanations outside the code block.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPrompt {
    pub system_prompt: String,
    pub user_prompt: String,
}

pub fn system_prompt(mode: Mode) -> &'static str {
    match mode {
        Mode::Analyze => SYSTEM_PROMPT_ANALYZE,
        Mode::Generate => SYSTEM_PROMPT_GENERATE,
    }
}

/// Maps a validated request to its prompt pair. User text is embedded verbatim.
pub fn build_prompt(payload: &RequestPayload) -> BuiltPrompt {
    let user_prompt = match &payload.task {
        Task::Analyze { codegen_code } => analysis_prompt(codegen_code),
        Task::Generate { scenario } => generation_prompt(scenario),
    };

    BuiltPrompt {
        system_prompt: system_prompt(payload.mode()).to_string(),
        user_prompt,
    }
}

fn analysis_prompt(codegen_code: &str) -> String {
    format!(
        "{ANALYZE_INSTRUCTIONS}\n\n\
[Start of Codegen Code]\n\
```typescript\n\
{codegen_code}\n\
```\n\
[End of Codegen Code]"
    )
}

fn generation_prompt(scenario: &str) -> String {
    format!(
        "{GENERATE_INSTRUCTIONS}\n\n\
[Start of BDD Scenario]\n\
{scenario}\n\
[End of BDD Scenario]\n\n\
{GENERATE_FENCING_RULE}"
    )
}
