//! Concurrent row processing.
//!
//! Rows are independent, so the batch fans out over a scoped worker pool:
//! each worker takes one contiguous chunk and produces that chunk's
//! outcomes in place, so reassembly is a flatten in chunk order and the
//! surviving records keep exact file order. Cancellation is cooperative,
//! checked between rows, never mid-row, so a cancelled run can never emit
//! a half-processed record.

use crate::extract::{extract_row, open, CsvOptions};
use logsift_core::{ParseError, ParseResult, Record, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation signal shared between the caller and the
/// worker pool.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

enum RowOutcome {
    Parsed(Record),
    Skipped,
}

/// Parallel variant of [`crate::parse_csv`].
///
/// Results are identical to the sequential path for any `workers` value;
/// `workers` is clamped to the row count. A cancellation observed before
/// the batch finishes returns [`ParseError::Cancelled`] instead of a
/// partial result.
pub fn parse_csv_parallel(
    data: &str,
    options: &CsvOptions,
    workers: usize,
    cancel: &CancelFlag,
) -> Result<ParseResult> {
    let (table, content_idx) = open(data, &options.content_column)?;
    if table.rows.is_empty() {
        return Ok(ParseResult::new(Vec::new(), 0));
    }

    let workers = workers.clamp(1, table.rows.len());
    let chunk_size = table.rows.len().div_ceil(workers);
    let header = &table.header;

    let chunk_results: Vec<Result<Vec<RowOutcome>>> = std::thread::scope(|scope| {
        let handles: Vec<_> = table
            .rows
            .chunks(chunk_size)
            .enumerate()
            .map(|(chunk_idx, chunk)| {
                let cancel = cancel.clone();
                scope.spawn(move || {
                    let mut outcomes = Vec::with_capacity(chunk.len());
                    for (i, row) in chunk.iter().enumerate() {
                        if cancel.is_cancelled() {
                            return Err(ParseError::Cancelled);
                        }
                        let row_idx = chunk_idx * chunk_size + i;
                        outcomes.push(
                            match extract_row(row, row_idx, content_idx, header, options)? {
                                Some(record) => RowOutcome::Parsed(record),
                                None => RowOutcome::Skipped,
                            },
                        );
                    }
                    Ok(outcomes)
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(result) => result,
                Err(payload) => std::panic::resume_unwind(payload),
            })
            .collect()
    });

    let mut records = Vec::with_capacity(table.rows.len());
    let mut skipped = 0;
    for chunk in chunk_results {
        for outcome in chunk? {
            match outcome {
                RowOutcome::Parsed(record) => records.push(record),
                RowOutcome::Skipped => skipped += 1,
            }
        }
    }
    Ok(ParseResult::new(records, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use logsift_core::{Node, ParseOptions};
    use pretty_assertions::assert_eq;

    fn options() -> CsvOptions {
        CsvOptions {
            parse: ParseOptions { decode_base64: false, ..ParseOptions::default() },
            ..CsvOptions::default()
        }
    }

    fn sample_csv(rows: usize) -> String {
        let mut data = String::from("Date,Content\n");
        for i in 0..rows {
            data.push_str(&format!("2024-01-01,seq:{i}\n"));
        }
        data
    }

    #[test]
    fn matches_sequential_output() {
        let data = sample_csv(23);
        let sequential = crate::parse_csv(&data, &options()).unwrap();
        for workers in [1, 2, 4, 16, 64] {
            let parallel =
                parse_csv_parallel(&data, &options(), workers, &CancelFlag::new()).unwrap();
            assert_eq!(parallel, sequential, "workers = {workers}");
        }
    }

    #[test]
    fn preserves_row_order() {
        let data = sample_csv(40);
        let result = parse_csv_parallel(&data, &options(), 8, &CancelFlag::new()).unwrap();
        for (i, record) in result.records.iter().enumerate() {
            assert_eq!(record.get("seq"), Some(&Node::from(i as i64)), "row {i}");
        }
    }

    #[test]
    fn pre_cancelled_run_reports_cancellation() {
        let cancel = CancelFlag::new();
        cancel.cancel();
        let err = parse_csv_parallel(&sample_csv(4), &options(), 2, &cancel).unwrap_err();
        assert!(matches!(err, ParseError::Cancelled));
    }

    #[test]
    fn header_only_input_yields_empty_result() {
        let result =
            parse_csv_parallel("Date,Content\n", &options(), 4, &CancelFlag::new()).unwrap();
        assert_eq!(result.count, 0);
        assert_eq!(result.stats.total_rows, 0);
    }
}
