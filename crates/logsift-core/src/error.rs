//! Error types for the parsing pipeline.
//!
//! Every public entry point returns either a full [`crate::ParseResult`] or
//! exactly one of these variants. Offsets are byte positions into the input
//! the caller handed us.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    /// Malformed token: unterminated quote, bad number literal, stray byte.
    #[error("lexical error at offset {offset}: {message}")]
    Lexical { offset: usize, message: String },

    /// Unbalanced braces, missing `:`, or nesting past the configured depth.
    #[error("structure error at offset {offset}: {message}")]
    Structure { offset: usize, message: String },

    /// Empty or whitespace-only input to a parse entry point.
    #[error("empty input")]
    EmptyInput,

    /// Missing header, missing content column, or an unreadable CSV shape.
    #[error("csv format error: {0}")]
    CsvFormat(String),

    /// Input bytes are not valid UTF-8 text.
    #[error("input is not valid text: {0}")]
    Encoding(String),

    /// A cooperative cancellation signal fired before the batch completed.
    #[error("parse cancelled before completion")]
    Cancelled,

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// True for the per-row error kinds the CSV loop converts into
    /// "row skipped" instead of aborting the batch.
    pub fn is_row_recoverable(&self) -> bool {
        matches!(
            self,
            ParseError::Lexical { .. } | ParseError::Structure { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;
