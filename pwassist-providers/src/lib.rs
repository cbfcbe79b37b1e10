//! Wire-level building blocks for the completion backends: request models,
//! request builders per vendor, response parsers and the HTTP executor.

pub mod gemini;
pub mod openai_compatible;
pub mod parse;
pub mod request;
pub mod runtime;

pub(crate) fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", base, path)
}
