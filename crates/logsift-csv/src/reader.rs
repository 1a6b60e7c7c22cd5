//! Hand-rolled CSV reader.
//!
//! Standard quoting rules: a field starting with `"` runs to the matching
//! quote, doubled quotes escape a literal quote, and quoted fields may
//! contain delimiters and newlines. Works over the whole input rather than
//! per line so embedded newlines do not break records. Both LF and CRLF
//! record terminators are accepted, and ragged rows are the caller's
//! problem; the reader reports what it saw.

use logsift_core::{ParseError, Result};
use memchr::{memchr, memchr3};

/// A parsed table: the header row plus every data row, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Index of a named column, if present.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }
}

/// Parse `data` into a header row and data rows. Fully blank lines are
/// dropped; an input with no rows at all is a format error.
pub fn read_table(data: &str) -> Result<CsvTable> {
    let mut records = Vec::new();
    let mut pos = 0;
    while pos < data.len() {
        let (record, next) = read_record(data, pos);
        pos = next;
        // A record of one empty field is a blank line, not data.
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }
        records.push(record);
    }
    if records.is_empty() {
        return Err(ParseError::CsvFormat("input has no header row".to_string()));
    }
    let header = records.remove(0);
    Ok(CsvTable { header, rows: records })
}

/// Read one record starting at byte `pos`; returns the fields and the
/// offset just past the record terminator.
fn read_record(data: &str, pos: usize) -> (Vec<String>, usize) {
    let bytes = data.as_bytes();
    let n = bytes.len();
    let mut fields = Vec::new();
    let mut i = pos;

    loop {
        let field;
        if i < n && bytes[i] == b'"' {
            let (value, next) = read_quoted(data, i + 1);
            field = value;
            i = next;
            // Tolerate stray bytes between the closing quote and the next
            // delimiter by skipping to it.
            while i < n && !matches!(bytes[i], b',' | b'\n' | b'\r') {
                i += 1;
            }
        } else {
            let end = memchr3(b',', b'\n', b'\r', &bytes[i..])
                .map(|off| i + off)
                .unwrap_or(n);
            field = data[i..end].to_string();
            i = end;
        }
        fields.push(field);

        if i >= n {
            return (fields, n);
        }
        match bytes[i] {
            b',' => i += 1,
            b'\r' => {
                i += 1;
                if i < n && bytes[i] == b'\n' {
                    i += 1;
                }
                return (fields, i);
            }
            // b'\n'
            _ => return (fields, i + 1),
        }
    }
}

/// Read a quoted field body starting just past the opening quote; returns
/// the unescaped value and the offset just past the closing quote. An
/// unterminated quote swallows the rest of the input.
fn read_quoted(data: &str, mut i: usize) -> (String, usize) {
    let bytes = data.as_bytes();
    let n = bytes.len();
    let mut value = String::new();
    loop {
        match memchr(b'"', &bytes[i..]) {
            None => {
                value.push_str(&data[i..]);
                return (value, n);
            }
            Some(off) => {
                let quote = i + off;
                value.push_str(&data[i..quote]);
                if quote + 1 < n && bytes[quote + 1] == b'"' {
                    value.push('"');
                    i = quote + 2;
                } else {
                    return (value, quote + 1);
                }
            }
        }
    }
}
