//! Row extraction: run each row's content cell through the parsing engine.
//!
//! The per-row error policy lives here: a row whose content cell is empty
//! or unparseable is counted and skipped, never fatal. Structural problems
//! with the file itself (no header, missing content column) abort the call.

use crate::reader::{read_table, CsvTable};
use logsift_core::pipeline::split_event_entries;
use logsift_core::{
    parse_content, Node, Object, ParseError, ParseOptions, ParseResult, Record, Result,
};
use serde::Serialize;

/// Options for one CSV extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvOptions {
    /// Name of the column holding the raw log text.
    pub content_column: String,
    /// Merge the other columns onto each record under `_metadata`.
    pub include_metadata: bool,
    pub parse: ParseOptions,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            content_column: "Content".to_string(),
            include_metadata: true,
            parse: ParseOptions::default(),
        }
    }
}

/// Row counters reported without extracting anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CsvSummary {
    pub total_rows: usize,
    pub non_empty: usize,
    pub empty: usize,
}

/// Extract and parse every row of `data`.
///
/// Rows survive in file order; `stats.total_rows` counts every data row,
/// parsed or skipped.
pub fn parse_csv(data: &str, options: &CsvOptions) -> Result<ParseResult> {
    let (table, content_idx) = open(data, &options.content_column)?;
    let mut records = Vec::with_capacity(table.rows.len());
    let mut skipped = 0;
    for (row_idx, row) in table.rows.iter().enumerate() {
        match extract_row(row, row_idx, content_idx, &table.header, options)? {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }
    Ok(ParseResult::new(records, skipped))
}

/// Count rows by content-cell emptiness without parsing anything.
pub fn csv_stats(data: &str, content_column: &str) -> Result<CsvSummary> {
    let (table, content_idx) = open(data, content_column)?;
    let total_rows = table.rows.len();
    let non_empty = table
        .rows
        .iter()
        .filter(|row| {
            row.get(content_idx)
                .map(|cell| !cell.trim().is_empty())
                .unwrap_or(false)
        })
        .count();
    Ok(CsvSummary { total_rows, non_empty, empty: total_rows - non_empty })
}

/// Shared preamble: reject empty input, read the table, resolve the
/// content column.
pub(crate) fn open(data: &str, content_column: &str) -> Result<(CsvTable, usize)> {
    if data.trim().is_empty() {
        return Err(ParseError::EmptyInput);
    }
    let table = read_table(data)?;
    let content_idx = table.column(content_column).ok_or_else(|| {
        ParseError::CsvFormat(format!(
            "column '{}' not found; available columns: {}",
            content_column,
            table.header.join(", ")
        ))
    })?;
    Ok((table, content_idx))
}

/// Process one row. `Ok(None)` means skipped-and-counted. `row_idx` is
/// zero-based over data rows; diagnostics report the one-based file line
/// (header is line 1).
pub(crate) fn extract_row(
    row: &[String],
    row_idx: usize,
    content_idx: usize,
    header: &[String],
    options: &CsvOptions,
) -> Result<Option<Record>> {
    let line = row_idx + 2;
    let content = row.get(content_idx).map(|cell| cell.trim()).unwrap_or("");
    if content.is_empty() {
        tracing::debug!(line, "content cell is empty; skipping row");
        return Ok(None);
    }

    // One row, one record: a cell that holds several complete event
    // entries keeps only the first.
    let entries = split_event_entries(content);
    let entry = match entries.as_slice() {
        [] => {
            tracing::debug!(line, "content cell is empty; skipping row");
            return Ok(None);
        }
        [single] => *single,
        [first, rest @ ..] => {
            tracing::warn!(
                line,
                dropped = rest.len(),
                "content cell holds multiple entries; keeping the first"
            );
            *first
        }
    };

    match parse_content(entry, &options.parse) {
        Ok(mut record) => {
            if options.include_metadata {
                attach_metadata(&mut record, row, content_idx, header);
            }
            Ok(Some(record))
        }
        Err(err) if err.is_row_recoverable() => {
            tracing::debug!(line, error = %err, "row content failed to parse; skipping row");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Append the non-content columns, in header order, under `_metadata`.
/// Cells missing from a ragged row become empty strings.
fn attach_metadata(record: &mut Record, row: &[String], content_idx: usize, header: &[String]) {
    let mut metadata = Object::new();
    for (idx, name) in header.iter().enumerate() {
        if idx == content_idx {
            continue;
        }
        let cell = row.get(idx).cloned().unwrap_or_default();
        metadata.insert(name.clone(), Node::String(cell));
    }
    record
        .fields
        .insert("_metadata".to_string(), Node::Object(metadata));
}
