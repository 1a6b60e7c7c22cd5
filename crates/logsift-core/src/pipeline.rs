//! The text entry point: raw blob in, [`ParseResult`] out.
//!
//! A pasted export often holds several logical entries back to back
//! ("Received ... event" lines, or one field-set per line). The splitter
//! finds those boundaries, each entry runs through tokenizer → parser →
//! coercion, and redaction is applied per record. Whole-blob JSON is passed
//! through directly so a JSON export does not have to round-trip the text
//! grammar.

use crate::coerce;
use crate::error::{ParseError, Result};
use crate::node::{Node, Object, Record};
use crate::parser;
use crate::redact::{redact_record, RedactionConfig};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Knobs for one parse invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
    /// Replace base64-looking string values with their decoded text.
    pub decode_base64: bool,
    /// Sensitive-field masking; disabled by default.
    pub redaction: RedactionConfig,
    /// Guard against pathological nesting.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            decode_base64: true,
            redaction: RedactionConfig::default(),
            max_depth: 128,
        }
    }
}

/// Summary counters for one parse invocation. For CSV input `total_rows`
/// counts every data row seen; for text input it counts logical entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    pub total_rows: usize,
    pub parsed_rows: usize,
    pub skipped_rows: usize,
}

/// The output envelope: ordered records plus counters.
/// Invariant: `count == records.len()` and
/// `stats.total_rows == stats.parsed_rows + stats.skipped_rows`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseResult {
    pub records: Vec<Record>,
    pub count: usize,
    pub stats: ParseStats,
}

impl ParseResult {
    pub fn new(records: Vec<Record>, skipped_rows: usize) -> Self {
        let parsed_rows = records.len();
        Self {
            count: parsed_rows,
            stats: ParseStats {
                total_rows: parsed_rows + skipped_rows,
                parsed_rows,
                skipped_rows,
            },
            records,
        }
    }
}

/// Parse a raw text blob into normalized records.
///
/// Fails the whole call on any lexical or structural problem; per-entry
/// recovery belongs to the CSV path, where one bad row must not sink the
/// batch. Empty input is an error, never an empty success.
pub fn parse(text: &str, options: &ParseOptions) -> Result<ParseResult> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    // Whole-blob JSON: a JSON array fans out to one record per element.
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        if let Ok(node) = serde_json::from_str::<Node>(trimmed) {
            let records = match node {
                Node::Array(items) => items
                    .into_iter()
                    .map(|item| finish_record(into_record(item), options))
                    .collect(),
                other => vec![finish_record(into_record(other), options)],
            };
            return Ok(ParseResult::new(records, 0));
        }
    }

    let entries = split_entries(trimmed);
    if entries.len() > 1 {
        tracing::debug!(entries = entries.len(), "split text blob into logical entries");
    }
    let mut records = Vec::with_capacity(entries.len());
    for entry in entries {
        records.push(parse_content(entry, options)?);
    }
    Ok(ParseResult::new(records, 0))
}

/// Parse one logical entry (or one CSV content cell) into a single record.
///
/// JSON content is passed through; anything else goes through the text
/// grammar. Non-empty content that yields no fields at all becomes the
/// plain-text fallback record rather than an error. Lexical/structural
/// errors propagate, and the caller decides whether they are fatal.
pub fn parse_content(content: &str, options: &ParseOptions) -> Result<Record> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        if let Ok(node) = serde_json::from_str::<Node>(trimmed) {
            return Ok(finish_record(into_record(node), options));
        }
    }

    let object = parser::parse_text(trimmed, options.max_depth)?;
    let record = if object.is_empty() {
        plain_text_record(trimmed)
    } else {
        Record::new(object)
    };
    Ok(finish_record(record, options))
}

/// A record for content that carries no structure at all.
fn plain_text_record(content: &str) -> Record {
    let mut fields = Object::new();
    fields.insert("message".to_string(), Node::from(content));
    fields.insert("format".to_string(), Node::from("plain_text"));
    Record::new(fields)
}

/// Wrap a parsed JSON value as a record. Non-object values cannot stand as
/// records on their own, so they land under a `value` key.
fn into_record(node: Node) -> Record {
    match node {
        Node::Object(obj) => Record::new(obj),
        other => {
            let mut fields = Object::new();
            fields.insert("value".to_string(), other);
            Record::new(fields)
        }
    }
}

/// Apply the post-parse passes in order: base64 decoding, then redaction.
fn finish_record(record: Record, options: &ParseOptions) -> Record {
    let mut record = record;
    if options.decode_base64 {
        for value in record.fields.values_mut() {
            coerce::decode_base64_strings(value);
        }
    }
    if options.redaction.enabled {
        record = redact_record(&record, &options.redaction);
    }
    record
}

// ---------------------------------------------------------------------------
// Entry splitting
// ---------------------------------------------------------------------------

/// "Received <Word> event ", the platform's event-log preamble.
static RECEIVED_EVENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Received\s+\w+\s+event\s+").expect("static regex"));

/// "Processing ... metadata: ", an alternate preamble shape.
static PROCESSING_METADATA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Processing\s+.*?\s+metadata:\s+").expect("static regex"));

/// A newline followed by what looks like a fresh top-level field.
static NEWLINE_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*[A-Za-z_][A-Za-z0-9_]*:").expect("static regex"));

/// Split a blob into logical entries.
///
/// Each pattern proposes boundaries at its match starts; boundaries inside
/// braces or quotes are discarded so a multi-line nested entry stays whole.
/// The pattern producing the most entries wins, and the whole blob is the
/// fallback.
pub fn split_entries(text: &str) -> Vec<&str> {
    split_with(text, &[&RECEIVED_EVENT, &PROCESSING_METADATA, &NEWLINE_FIELD])
}

/// Split only on the prose event preambles, never on bare newline-field
/// boundaries. This is the right granularity for a CSV content cell, where
/// a quoted multi-line cell is one entry whose newlines are just
/// whitespace.
pub fn split_event_entries(text: &str) -> Vec<&str> {
    split_with(text, &[&RECEIVED_EVENT, &PROCESSING_METADATA])
}

fn split_with<'a>(text: &'a str, patterns: &[&Lazy<Regex>]) -> Vec<&'a str> {
    let mut best: Vec<&'a str> = vec![text];
    for pattern in patterns {
        let offsets: Vec<usize> = pattern.find_iter(text).map(|m| m.start()).collect();
        let boundaries = top_level_offsets(text, &offsets);
        let candidate = split_at(text, &boundaries);
        if candidate.len() > best.len() {
            best = candidate;
        }
    }
    best
}

/// Filter candidate offsets down to those sitting at brace depth zero and
/// outside any quoted string.
fn top_level_offsets(text: &str, offsets: &[usize]) -> Vec<usize> {
    let mut keep = Vec::with_capacity(offsets.len());
    let mut candidates = offsets.iter().copied().peekable();
    let mut depth: usize = 0;
    let mut in_string = false;
    let mut escaped = false;

    for (pos, byte) in text.bytes().enumerate() {
        while candidates.peek() == Some(&pos) {
            candidates.next();
            if depth == 0 && !in_string && pos > 0 {
                keep.push(pos);
            }
        }
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    keep
}

fn split_at<'a>(text: &'a str, boundaries: &[usize]) -> Vec<&'a str> {
    let mut pieces = Vec::with_capacity(boundaries.len() + 1);
    let mut start = 0;
    for &boundary in boundaries {
        pieces.push(&text[start..boundary]);
        start = boundary;
    }
    pieces.push(&text[start..]);
    pieces
        .into_iter()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}
