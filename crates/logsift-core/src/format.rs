//! Output rendering for normalized records.
//!
//! Three layouts: `pretty` (indented JSON, blank line between records),
//! `compact` (JSON Lines), and `array` (one indented JSON array). Key order
//! in the output is the insertion order of the underlying objects; the
//! serializer never reorders or retypes anything.

use crate::error::Result;
use crate::node::Record;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Compact,
    Array,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Pretty => write!(f, "pretty"),
            OutputFormat::Compact => write!(f, "compact"),
            OutputFormat::Array => write!(f, "array"),
        }
    }
}

/// Render `records` as a single text blob in the requested layout.
pub fn format_records(records: &[Record], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Pretty => {
            let mut rendered = Vec::with_capacity(records.len());
            for record in records {
                rendered.push(serde_json::to_string_pretty(record)?);
            }
            Ok(rendered.join("\n\n"))
        }
        OutputFormat::Compact => {
            let mut rendered = Vec::with_capacity(records.len());
            for record in records {
                rendered.push(serde_json::to_string(record)?);
            }
            Ok(rendered.join("\n"))
        }
        OutputFormat::Array => Ok(serde_json::to_string_pretty(records)?),
    }
}

/// Write formatted output to `path`.
///
/// A directory target gets one `log_entry_<n>.json` file per record
/// (numbered from 1, in record order); `array` format in a directory goes to
/// a single `records.json` instead, since splitting an array per file would
/// change its meaning. Any other target receives the whole blob.
pub fn write_output(records: &[Record], format: OutputFormat, path: &Path) -> Result<()> {
    if path.is_dir() {
        match format {
            OutputFormat::Array => {
                std::fs::write(path.join("records.json"), format_records(records, format)?)?;
            }
            OutputFormat::Pretty | OutputFormat::Compact => {
                for (i, record) in records.iter().enumerate() {
                    let rendered = match format {
                        OutputFormat::Pretty => serde_json::to_string_pretty(record)?,
                        _ => serde_json::to_string(record)?,
                    };
                    std::fs::write(path.join(format!("log_entry_{}.json", i + 1)), rendered)?;
                }
            }
        }
        return Ok(());
    }
    std::fs::write(path, format_records(records, format)?)?;
    Ok(())
}
