mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command, CommonArgs};
use logsift_core::{format_records, write_output, Config, ParseOptions, ParseResult};
use logsift_csv::{CancelFlag, CsvOptions};
use std::io::Read;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/logsift-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("logsift debug log started — tail -f /tmp/logsift-debug.log");
    }

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(error = %err, "could not load config; using built-in defaults");
            Config::defaults()
        }
    };

    match cli.command {
        Command::Text { text, file, common } => {
            let input = read_text_input(text, file)?;
            let options = parse_options(&config, &common);
            let result = logsift_core::parse(&input, &options)?;
            emit(&result, &common)
        }
        Command::Csv { file, content_column, no_metadata, count, jobs, common } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let data = logsift_core::text_from_bytes(&bytes)?;
            let column = content_column.unwrap_or_else(|| config.csv.content_column.clone());

            if count {
                let summary = logsift_csv::csv_stats(data, &column)?;
                println!("{}", serde_json::to_string_pretty(&summary)?);
                return Ok(());
            }

            let options = CsvOptions {
                content_column: column,
                include_metadata: !no_metadata && config.csv.include_metadata,
                parse: parse_options(&config, &common),
            };
            let result = if jobs > 1 {
                logsift_csv::parse_csv_parallel(data, &options, jobs, &CancelFlag::new())?
            } else {
                logsift_csv::parse_csv(data, &options)?
            };
            emit(&result, &common)
        }
    }
}

/// Layer the per-invocation flags over the configured defaults.
fn parse_options(config: &Config, common: &CommonArgs) -> ParseOptions {
    let mut options = config.parse_options();
    if common.no_decode {
        options.decode_base64 = false;
    }
    options.redaction.enabled = common.redact;
    if let Some(keep_chars) = common.keep_chars {
        options.redaction.keep_chars = keep_chars;
    }
    options
}

/// Input precedence for the text subcommand: argument, file, stdin.
fn read_text_input(text: Option<String>, file: Option<PathBuf>) -> anyhow::Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    let bytes = match file {
        Some(path) => std::fs::read(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };
    Ok(logsift_core::text_from_bytes(&bytes)?.to_string())
}

fn emit(result: &ParseResult, common: &CommonArgs) -> anyhow::Result<()> {
    let format = common.format.into();
    match &common.output {
        Some(path) => {
            write_output(&result.records, format, path)?;
            eprintln!("{} record(s) written to {}", result.count, path.display());
        }
        None => println!("{}", format_records(&result.records, format)?),
    }
    Ok(())
}
