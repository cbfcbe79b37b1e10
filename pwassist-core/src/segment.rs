use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

fn code_fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Opening fence, optional alphabetic language tag, lazy body, closing fence.
        // A single newline on each side of the body belongs to the fence.
        // An opening fence without a close never matches and stays prose.
        Regex::new(r"(?s)```(?:[A-Za-z]+)?\n?(.*?)\n?```").expect("valid code fence regex")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Text,
    Code,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub content: String,
    /// Position in the segment sequence.
    pub order: usize,
}

impl Segment {
    pub fn is_code(&self) -> bool {
        self.kind == SegmentKind::Code
    }
}

/// Splits an LLM response into prose and fenced code, in source order.
///
/// Never fails. Every returned segment has non-empty, trimmed content.
pub fn segment(raw: &str) -> Vec<Segment> {
    let mut parts: Vec<(SegmentKind, &str)> = vec![];
    let mut last = 0;

    for caps in code_fence_re().captures_iter(raw) {
        let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            parts.push((SegmentKind::Text, &raw[last..whole.start()]));
        }
        parts.push((SegmentKind::Code, body.as_str()));
        last = whole.end();
    }

    if last < raw.len() {
        parts.push((SegmentKind::Text, &raw[last..]));
    }

    parts
        .into_iter()
        .map(|(kind, s)| (kind, s.trim()))
        .filter(|(_, s)| !s.is_empty())
        .enumerate()
        .map(|(order, (kind, s))| Segment {
            kind,
            content: s.to_string(),
            order,
        })
        .collect()
}

/// Code segments only, numbered the way they are rendered (0 = first code block).
pub fn code_blocks(segments: &[Segment]) -> impl Iterator<Item = (usize, &Segment)> {
    segments.iter().filter(|s| s.is_code()).enumerate()
}
