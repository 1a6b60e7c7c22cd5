//! logsift-core — parsing and normalization engine for logsift.
//!
//! Turns protobuf-style text dumps into ordered JSON record trees, with
//! optional base64 payload decoding and sensitive-field redaction.
//!
//! # Architecture
//!
//! ```text
//! Tokenizer ──► Parser ──► Coercion ──► (Redaction) ──► Records ──► Formatter
//! ```
//!
//! Everything is a pure function over explicit inputs and configuration; the
//! engine holds no global state, so every stage is testable in isolation.
//! The CSV companion crate (`logsift-csv`) feeds each row's content cell
//! through [`parse_content`] and owns the per-row error policy.

pub mod coerce;
pub mod config;
pub mod error;
pub mod format;
pub mod node;
pub mod parser;
pub mod pipeline;
pub mod redact;
pub mod tokenizer;

pub use config::Config;
pub use error::{ParseError, Result};
pub use format::{format_records, write_output, OutputFormat};
pub use node::{Node, Number, Object, Record};
pub use pipeline::{parse, parse_content, ParseOptions, ParseResult, ParseStats};
pub use redact::{redact_record, RedactionConfig, MASK_TOKEN, SENSITIVE_KEY_PATTERNS};

/// Decode raw caller bytes into text, mapping invalid UTF-8 to the typed
/// encoding error instead of a panic or lossy replacement.
pub fn text_from_bytes(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| ParseError::Encoding(e.to_string()))
}
