//! logsift-csv — CSV row extraction for logsift.
//!
//! Reads a delimited export with a header row, locates the content column,
//! and runs each row's cell through the `logsift-core` pipeline, optionally
//! merging the remaining columns onto the record as `_metadata`. One bad
//! row is skipped and counted; it never sinks the batch.
//!
//! Rows are independent, so [`parse_csv_parallel`] offers the same contract
//! fanned out over a worker pool, with results reassembled in file order
//! and a cooperative [`CancelFlag`] checked between rows.

pub mod extract;
pub mod parallel;
pub mod reader;

pub use extract::{csv_stats, parse_csv, CsvOptions, CsvSummary};
pub use parallel::{parse_csv_parallel, CancelFlag};
pub use reader::{read_table, CsvTable};
