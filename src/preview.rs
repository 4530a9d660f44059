//! Text-preview extraction for opaque event and record payloads.
//!
//! Payloads are arbitrary JSON. The extractor picks a single representative
//! string for the compact table view:
//!
//! 1. the first canonical field ([`CANONICAL_FIELDS`]) at the top level holding
//!    a non-empty string,
//! 2. the same check under the `content` sub-key,
//! 3. the first string longer than [`MIN_SCANNED_CHARS`] found by a
//!    depth-first scan bounded by [`MAX_SCAN_DEPTH`],
//! 4. otherwise [`COMPLEX_SENTINEL`].
//!
//! Object keys are visited in insertion order (`serde_json` is built with
//! `preserve_order`).

use serde_json::{Map, Value};

use crate::format::truncate_preview;

/// Field names checked before falling back to a scan, in priority order.
pub const CANONICAL_FIELDS: [&str; 6] = [
    "text",
    "content",
    "message",
    "description",
    "summary",
    "value",
];

/// Deepest level the fallback scan descends to (the root is depth 0).
pub const MAX_SCAN_DEPTH: usize = 3;

/// Strings must be strictly longer than this to be picked by the scan.
pub const MIN_SCANNED_CHARS: usize = 10;

/// Returned when no string could be found at all.
pub const COMPLEX_SENTINEL: &str = "Complex data structure";

/// Extracted preview of a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// A representative string taken from the payload.
    Text(String),
    /// No usable string; display [`COMPLEX_SENTINEL`].
    Complex,
}

impl Preview {
    /// Full preview text, without truncation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Complex => COMPLEX_SENTINEL,
        }
    }
}

/// Preview cell for a table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPreview {
    /// Both content and metadata are absent or empty objects.
    NoContent,
    /// Display text, already truncated for the table.
    Text(String),
}

/// Extract a preview string from `value`.
#[must_use]
pub fn extract_preview(value: &Value) -> Preview {
    if let Some(obj) = value.as_object() {
        if let Some(text) = canonical_field(obj) {
            return Preview::Text(text.to_string());
        }
        if let Some(text) = obj
            .get("content")
            .and_then(Value::as_object)
            .and_then(canonical_field)
        {
            return Preview::Text(text.to_string());
        }
    }

    first_long_string(value, 0).map_or(Preview::Complex, |text| Preview::Text(text.to_string()))
}

/// Build the table preview for an item's content and metadata payloads.
///
/// The two payloads are merged under `content` and `metadata` before
/// extraction; the result is truncated for display. The payloads themselves
/// are never modified.
#[must_use]
pub fn content_preview(content: Option<&Value>, metadata: Option<&Value>) -> ContentPreview {
    let mut merged = Map::new();
    if let Some(content) = content.filter(|v| has_content(v)) {
        merged.insert("content".to_string(), content.clone());
    }
    if let Some(metadata) = metadata.filter(|v| has_content(v)) {
        merged.insert("metadata".to_string(), metadata.clone());
    }
    if merged.is_empty() {
        return ContentPreview::NoContent;
    }

    let preview = extract_preview(&Value::Object(merged));
    ContentPreview::Text(truncate_preview(preview.as_str()).into_owned())
}

fn canonical_field(obj: &Map<String, Value>) -> Option<&str> {
    CANONICAL_FIELDS
        .iter()
        .filter_map(|field| obj.get(*field).and_then(Value::as_str))
        .find(|text| !text.is_empty())
}

fn first_long_string(value: &Value, depth: usize) -> Option<&str> {
    if depth > MAX_SCAN_DEPTH {
        return None;
    }
    match value {
        Value::String(text) if text.chars().count() > MIN_SCANNED_CHARS => Some(text.as_str()),
        Value::Object(obj) => obj
            .values()
            .find_map(|child| first_long_string(child, depth + 1)),
        Value::Array(items) => items
            .iter()
            .find_map(|child| first_long_string(child, depth + 1)),
        _ => None,
    }
}

/// Null and empty strings, objects or arrays carry nothing worth previewing.
fn has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.is_empty(),
        Value::Object(obj) => !obj.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}
