//! Environment overlay for configuration and credentials.
//!
//! Lookups go through a closure so tests never touch the process environment.

use pwassist_core::config::{Credentials, ServerConfig};

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const OPENAI_API_BASE_URL: &str = "OPENAI_API_BASE_URL";
pub const BIND_ADDR: &str = "PWASSIST_BIND_ADDR";

pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Applies env overrides on top of file/default config.
pub fn apply_env_overrides(
    mut cfg: ServerConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> ServerConfig {
    if let Some(url) = non_blank(lookup(OPENAI_API_BASE_URL)) {
        cfg.openai.base_url = url;
    }
    if let Some(addr) = non_blank(lookup(BIND_ADDR)) {
        cfg.bind_addr = addr;
    }
    cfg
}

pub fn credentials_from_env(lookup: impl Fn(&str) -> Option<String>) -> Credentials {
    Credentials {
        openai_api_key: lookup(OPENAI_API_KEY),
        gemini_api_key: lookup(GEMINI_API_KEY),
    }
    .normalized()
}
