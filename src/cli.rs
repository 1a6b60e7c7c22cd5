//! Command-line surface: two subcommands mirroring the two entry points of
//! the engine (raw text and CSV) plus the shared output/redaction flags.

use clap::{Args, Parser, Subcommand, ValueEnum};
use logsift_core::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "logsift",
    about = "Normalize protobuf-text and CSV log exports into uniform JSON"
)]
pub struct Cli {
    /// Write debug logs to /tmp/logsift-debug.log (tail -f to inspect).
    #[arg(long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse a raw text dump (argument, file, or stdin).
    Text {
        /// Log text to parse; falls back to --file, then stdin.
        text: Option<String>,

        /// Input file containing logs.
        #[arg(short, long)]
        file: Option<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Extract and parse the content column of a CSV export.
    Csv {
        /// Input CSV file.
        #[arg(short, long)]
        file: PathBuf,

        /// Column holding the log content (default comes from config).
        #[arg(short = 'c', long)]
        content_column: Option<String>,

        /// Leave the other columns out instead of merging them as _metadata.
        #[arg(long)]
        no_metadata: bool,

        /// Only count rows; extract nothing.
        #[arg(long)]
        count: bool,

        /// Process rows on this many worker threads.
        #[arg(long, default_value_t = 1)]
        jobs: usize,

        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args)]
pub struct CommonArgs {
    /// Do not decode base64-looking string values.
    #[arg(long)]
    pub no_decode: bool,

    /// Mask sensitive fields (keys, tokens, secrets).
    #[arg(long)]
    pub redact: bool,

    /// Characters kept at each end of a masked value (default comes from
    /// config).
    #[arg(long)]
    pub keep_chars: Option<usize>,

    /// Output layout.
    #[arg(long, value_enum, default_value_t = FormatArg::Pretty)]
    pub format: FormatArg,

    /// Write output here instead of stdout; a directory gets one file per
    /// record.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Pretty,
    Compact,
    Array,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Pretty => OutputFormat::Pretty,
            FormatArg::Compact => OutputFormat::Compact,
            FormatArg::Array => OutputFormat::Array,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_text_subcommand() {
        let cli = Cli::try_parse_from([
            "logsift", "text", "id:1", "--redact", "--keep-chars", "6", "--format", "compact",
        ])
        .unwrap();
        match cli.command {
            Command::Text { text, common, .. } => {
                assert_eq!(text.as_deref(), Some("id:1"));
                assert!(common.redact);
                assert_eq!(common.keep_chars, Some(6));
                assert_eq!(common.format, FormatArg::Compact);
            }
            _ => panic!("expected text subcommand"),
        }
    }

    #[test]
    fn parses_csv_subcommand() {
        let cli = Cli::try_parse_from([
            "logsift", "csv", "-f", "logs.csv", "-c", "Message", "--no-metadata", "--jobs", "4",
        ])
        .unwrap();
        match cli.command {
            Command::Csv { file, content_column, no_metadata, jobs, .. } => {
                assert_eq!(file, PathBuf::from("logs.csv"));
                assert_eq!(content_column.as_deref(), Some("Message"));
                assert!(no_metadata);
                assert_eq!(jobs, 4);
            }
            _ => panic!("expected csv subcommand"),
        }
    }
}
