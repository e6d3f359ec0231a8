//! Locate a JSON document inside free-text model output.
//!
//! Models wrap their answer in many ways: bare JSON, a fenced block with or
//! without a language tag, or JSON in the middle of a sentence. Strategies are
//! tried in a fixed order and the first candidate that parses wins. Only syntax
//! is checked here; the shape is checked by the caller.

use serde_json::Value;

use crate::curation::errors::CurationError;

const FENCE: &str = "```";

/// A fenced block: optional info string (e.g. `json`) and its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FencedBlock<'a> {
    tag: &'a str,
    body: &'a str,
}

/// Extract the first syntactically valid JSON document from `raw`.
///
/// Order:
/// 1. the whole trimmed text
/// 2. the body of the first fenced block (tag stripped)
/// 3. the body of the first untagged fenced block
/// 4. the span from the first `{` to the last `}`
///
/// On failure the raw text is returned inside the error for diagnostics.
pub fn extract_json(raw: &str) -> Result<Value, CurationError> {
    let trimmed = raw.trim();
    let blocks = fenced_blocks(trimmed);

    let candidates = [
        Some(trimmed),
        blocks.first().map(|b| b.body),
        blocks.iter().find(|b| b.tag.is_empty()).map(|b| b.body),
        brace_span(trimmed),
    ];

    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .find_map(|c| serde_json::from_str::<Value>(c).ok())
        .ok_or_else(|| CurationError::Extraction {
            raw: raw.to_string(),
        })
}

/// All complete fenced blocks in order of appearance. An unterminated fence ends the scan.
fn fenced_blocks(text: &str) -> Vec<FencedBlock<'_>> {
    let mut blocks = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find(FENCE) {
        let after_open = &rest[open + FENCE.len()..];
        let Some(close) = after_open.find(FENCE) else {
            break;
        };
        let inner = &after_open[..close];
        blocks.push(split_info_string(inner));
        rest = &after_open[close + FENCE.len()..];
    }

    blocks
}

/// Split a fence's contents into its info string and body. The first line only
/// counts as a tag when it is a single word like `json` or `JSON5`.
fn split_info_string(inner: &str) -> FencedBlock<'_> {
    if let Some((first, body)) = inner.split_once('\n') {
        let tag = first.trim();
        let looks_like_tag = !tag.is_empty()
            && tag
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '+');
        if looks_like_tag {
            return FencedBlock { tag, body };
        }
    }
    FencedBlock { tag: "", body: inner }
}

fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_bare_json() {
        assert_eq!(extract_json("  {\"a\":1}\n").unwrap(), json!({"a": 1}));
    }

    #[test]
    fn reads_tagged_fence_inside_prose() {
        let raw = "Here you go:\n```json\n{\"a\":1}\n```\nHope it helps!";
        assert_eq!(extract_json(raw).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn reads_untagged_fence() {
        let raw = "Sure!\n```\n{\"a\":2}\n```";
        assert_eq!(extract_json(raw).unwrap(), json!({"a": 2}));
    }

    #[test]
    fn falls_back_to_untagged_fence_when_first_block_is_not_json() {
        let raw = "```text\nnot json\n```\nthen\n```\n{\"b\":3}\n```";
        assert_eq!(extract_json(raw).unwrap(), json!({"b": 3}));
    }

    #[test]
    fn brace_scan_finds_embedded_object() {
        assert_eq!(extract_json("prefix {\"a\":1} suffix").unwrap(), json!({"a": 1}));
        let nested = "I picked {\"selections\":[{\"character\":\"Tim\",\"items\":[]}]} for you.";
        assert_eq!(
            extract_json(nested).unwrap(),
            json!({"selections": [{"character": "Tim", "items": []}]})
        );
    }

    #[test]
    fn failure_keeps_raw_text() {
        let err = extract_json("no json here").unwrap_err();
        match err {
            CurationError::Extraction { raw } => assert_eq!(raw, "no json here"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unbalanced_braces_fail() {
        assert!(extract_json("{ \"a\": 1 ").is_err());
        assert!(extract_json("} backwards {").is_err());
        assert!(extract_json("```json\n{\"a\":\n```").is_err());
    }

    #[test]
    fn inline_fence_without_newline_is_untagged() {
        let block = split_info_string("{\"a\":1}");
        assert_eq!(block.tag, "");
        assert_eq!(block.body, "{\"a\":1}");
        let tagged = split_info_string("json\n{}\n");
        assert_eq!(tagged.tag, "json");
    }
}
