//! Configuration types for logsift.
//!
//! [`Config::load`] reads `~/.config/logsift/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::defaults`] returns
//! the same defaults without touching the filesystem (useful in tests).

use crate::redact::{RedactionConfig, SENSITIVE_KEY_PATTERNS};
use crate::ParseOptions;
use serde::Deserialize;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[parse]
max_depth     = 128
decode_base64 = true

[redaction]
keep_chars = 4
patterns   = [
    "public_key", "private_key", "secret", "token", "api_key",
    "password", "credential", "auth", "authorization",
]

[csv]
content_column   = "Content"
include_metadata = true
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration, loaded from
/// `~/.config/logsift/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub parse: ParseSection,
    #[serde(default)]
    pub redaction: RedactionSection,
    #[serde(default)]
    pub csv: CsvSection,
}

/// `[parse]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ParseSection {
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default = "default_decode_base64")]
    pub decode_base64: bool,
}

fn default_max_depth() -> usize { 128 }
fn default_decode_base64() -> bool { true }

impl Default for ParseSection {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            decode_base64: default_decode_base64(),
        }
    }
}

/// `[redaction]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct RedactionSection {
    #[serde(default = "default_keep_chars")]
    pub keep_chars: usize,
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,
}

fn default_keep_chars() -> usize { 4 }
fn default_patterns() -> Vec<String> {
    SENSITIVE_KEY_PATTERNS.iter().map(|s| s.to_string()).collect()
}

impl Default for RedactionSection {
    fn default() -> Self {
        Self {
            keep_chars: default_keep_chars(),
            patterns: default_patterns(),
        }
    }
}

/// `[csv]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct CsvSection {
    #[serde(default = "default_content_column")]
    pub content_column: String,
    #[serde(default = "default_include_metadata")]
    pub include_metadata: bool,
}

fn default_content_column() -> String { "Content".to_string() }
fn default_include_metadata() -> bool { true }

impl Default for CsvSection {
    fn default() -> Self {
        Self {
            content_column: default_content_column(),
            include_metadata: default_include_metadata(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/logsift/config.toml`, layered on top of the
    /// built-in defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path.as_path()).required(false))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    /// Assemble [`ParseOptions`] from this config, with redaction off; the
    /// caller flips it on per invocation.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            decode_base64: self.parse.decode_base64,
            max_depth: self.parse.max_depth,
            redaction: RedactionConfig {
                enabled: false,
                keep_chars: self.redaction.keep_chars,
                patterns: self.redaction.patterns.clone(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("logsift")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load() {
        let cfg = Config::defaults();
        assert_eq!(cfg.parse.max_depth, 128);
        assert!(cfg.parse.decode_base64);
        assert_eq!(cfg.csv.content_column, "Content");
        assert_eq!(cfg.redaction.keep_chars, 4);
        assert_eq!(cfg.redaction.patterns.len(), 9);
    }

    #[test]
    fn defaults_match_parse_options() {
        let opts = Config::defaults().parse_options();
        assert!(opts.decode_base64);
        assert!(!opts.redaction.enabled);
        assert_eq!(opts.max_depth, 128);
    }
}
