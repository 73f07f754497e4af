//! Block extraction from raw producer output.
//!
//! The producer writes JSON arrays surrounded by arbitrary text (shell noise,
//! headers, partial writes). Candidate blocks are found with a lenient
//! non-greedy `[...]` scan that spans newlines. The scan does not track nesting:
//! a block containing an inner array or a `]` inside a string value is cut at
//! the first `]` and then fails to parse, which only drops that block.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{BridgeError, Result};

#[allow(clippy::expect_used)]
static BLOCK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\[.*?\]").expect("invalid block regex"));

/// Identity used when an entity carries no `pod` field.
pub const DEFAULT_IDENTITY: &str = "unknown";
/// Raw value used when an entity carries no `cpu` / `memory` field.
pub const DEFAULT_QUANTITY: &str = "0";

/// One entity parsed from a block, values still unit-suffixed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodResourceRecord {
    pub identity: String,
    pub cpu_raw: String,
    pub memory_raw: String,
}

/// Records recovered from one producer output, in block order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub records: Vec<PodResourceRecord>,
    /// Number of candidate blocks that failed to parse.
    pub rejected_blocks: usize,
}

/// Lazily yield every candidate block in `text`.
pub fn blocks(text: &str) -> impl Iterator<Item = &str> {
    BLOCK_PATTERN.find_iter(text).map(|m| m.as_str())
}

/// Parse a single candidate block into records.
///
/// Fails when the block is not valid JSON or is not an array. Array elements
/// that are not objects are skipped.
pub fn parse_block(block: &str) -> Result<Vec<PodResourceRecord>> {
    let value: Value =
        serde_json::from_str(block).map_err(|e| BridgeError::BlockParse(e.to_string()))?;

    let Value::Array(items) = value else {
        return Err(BridgeError::BlockParse("block is not an array".into()));
    };

    let mut out = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        match item {
            Value::Object(obj) => out.push(record_from_object(&obj)),
            other => {
                tracing::warn!(index = idx, kind = kind_of(&other), "skipping non-object entity");
            }
        }
    }
    Ok(out)
}

/// Extract all records from raw producer output.
///
/// Never fails: zero blocks yields an empty extraction, and a malformed block
/// is logged and skipped while the remaining blocks are still processed.
pub fn extract(text: &str) -> Extraction {
    let mut extraction = Extraction::default();

    for (idx, block) in blocks(text).enumerate() {
        match parse_block(block) {
            Ok(mut records) => extraction.records.append(&mut records),
            Err(e) => {
                tracing::error!(block = idx, error = %e, "error parsing block");
                extraction.rejected_blocks += 1;
            }
        }
    }

    extraction
}

fn record_from_object(obj: &Map<String, Value>) -> PodResourceRecord {
    PodResourceRecord {
        identity: field_text(obj, "pod").unwrap_or_else(|| DEFAULT_IDENTITY.to_string()),
        cpu_raw: field_text(obj, "cpu").unwrap_or_else(|| DEFAULT_QUANTITY.to_string()),
        memory_raw: field_text(obj, "memory").unwrap_or_else(|| DEFAULT_QUANTITY.to_string()),
    }
}

// Strings are taken verbatim, numbers as their decimal text.
fn field_text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn finds_blocks_across_newlines() {
        let text = "noise [\n{\"pod\":\"a\"}\n] more [1] tail";
        let found: Vec<&str> = blocks(text).collect();
        assert_eq!(found, vec!["[\n{\"pod\":\"a\"}\n]", "[1]"]);
    }

    #[test]
    fn no_blocks_is_empty() {
        let ex = extract("Namespace: default\nnothing here\n");
        assert!(ex.records.is_empty());
        assert_eq!(ex.rejected_blocks, 0);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let records = parse_block(r#"[{"cpu":"100m"},{}]"#).unwrap();
        assert_eq!(records[0].identity, "unknown");
        assert_eq!(records[0].cpu_raw, "100m");
        assert_eq!(records[0].memory_raw, "0");
        assert_eq!(records[1].cpu_raw, "0");
    }

    #[test]
    fn numeric_fields_become_text() {
        let records = parse_block(r#"[{"pod":"x","cpu":2,"memory":1024}]"#).unwrap();
        assert_eq!(records[0].cpu_raw, "2");
        assert_eq!(records[0].memory_raw, "1024");
    }

    #[test]
    fn non_array_block_is_rejected() {
        // the lenient scan never yields an object on its own, but callers may
        let err = parse_block(r#"{"pod":"x"}"#).unwrap_err();
        assert_eq!(err.stage().as_str(), "extract");
    }

    #[test]
    fn non_object_elements_are_skipped() {
        let records = parse_block(r#"["web", {"pod":"db"}, null]"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].identity, "db");
    }

    #[test]
    fn nested_array_is_cut_short() {
        let ex = extract(r#"[{"pod":"a","tags":["x"]}]"#);
        assert!(ex.records.is_empty());
        assert_eq!(ex.rejected_blocks, 1);
    }
}
