//! Application configuration loading for CLI defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use bookshelf_core::TokenizerMode;

/// Accepted range for `max_keywords` (same as the CLI flag).
pub const MAX_KEYWORDS_RANGE: std::ops::RangeInclusive<u64> = 1..=100;

/// Accepted range for `max_pages` (same as the CLI flag).
pub const MAX_PAGES_RANGE: std::ops::RangeInclusive<u64> = 1..=1000;

/// TOML-backed file configuration for bookshelf defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// Default catalogue database file.
    pub database: Option<PathBuf>,
    /// Default keyword count for extraction.
    pub max_keywords: Option<u8>,
    /// Default number of leading pages to analyze.
    pub max_pages: Option<u16>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
    /// Extra stop-words, one per line.
    pub stopwords_file: Option<PathBuf>,
    /// Word splitting strategy.
    pub tokenizer: Option<TokenizerMode>,
}

impl FileConfig {
    /// Validates config values against CLI constraints.
    pub fn validate(&self) -> Result<()> {
        if let Some(max_keywords) = self.max_keywords
            && !MAX_KEYWORDS_RANGE.contains(&u64::from(max_keywords))
        {
            bail!(
                "Invalid config value for `max_keywords`: {max_keywords}. Expected range: 1..=100"
            );
        }

        if let Some(max_pages) = self.max_pages
            && !MAX_PAGES_RANGE.contains(&u64::from(max_pages))
        {
            bail!("Invalid config value for `max_pages`: {max_pages}. Expected range: 1..=1000");
        }

        Ok(())
    }
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Returns the stable string label for display output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Verbose => "verbose",
            Self::Quiet => "quiet",
            Self::Debug => "debug",
        }
    }

    /// Log filter used when neither `RUST_LOG` nor a CLI flag decides.
    #[must_use]
    pub fn filter_level(self) -> &'static str {
        match self {
            Self::Default => "info",
            Self::Verbose => "debug",
            Self::Quiet => "error",
            Self::Debug => "trace",
        }
    }
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
    /// Indicates whether configuration was loaded from disk.
    pub loaded_from_file: bool,
}

impl LoadedConfig {
    /// The parsed config, or all-unset defaults when no file was loaded.
    #[must_use]
    pub fn file_config(&self) -> FileConfig {
        self.config.clone().unwrap_or_default()
    }
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/bookshelf/config.toml`
/// 2. `$HOME/.config/bookshelf/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("bookshelf")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("bookshelf")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from default path if present.
pub fn load_default_file_config() -> Result<LoadedConfig> {
    let path = resolve_default_config_path();
    let Some(path_ref) = path.as_deref() else {
        return Ok(LoadedConfig {
            path,
            config: None,
            loaded_from_file: false,
        });
    };

    if !path_ref.exists() {
        return Ok(LoadedConfig {
            path,
            config: None,
            loaded_from_file: false,
        });
    }

    let config = load_file_config(path_ref)?;
    Ok(LoadedConfig {
        path,
        config: Some(config),
        loaded_from_file: true,
    })
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_number = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_number}: expected key = value");
        };

        let key = raw_key.trim();
        let value = raw_value.trim();

        match key {
            "database" => {
                let parsed = parse_string_literal(value).with_context(|| {
                    format!("Invalid `database` value on line {line_number}")
                })?;
                cfg.database = Some(PathBuf::from(parsed));
            }
            "max_keywords" => {
                let parsed = parse_integer_u64(value).with_context(|| {
                    format!("Invalid `max_keywords` value on line {line_number}")
                })?;
                cfg.max_keywords = Some(narrow(
                    parsed,
                    "max_keywords",
                    &MAX_KEYWORDS_RANGE,
                    line_number,
                )?);
            }
            "max_pages" => {
                let parsed = parse_integer_u64(value).with_context(|| {
                    format!("Invalid `max_pages` value on line {line_number}")
                })?;
                cfg.max_pages = Some(narrow(parsed, "max_pages", &MAX_PAGES_RANGE, line_number)?);
            }
            "verbosity" => {
                let parsed = parse_string_literal(value).with_context(|| {
                    format!("Invalid `verbosity` value on line {line_number}")
                })?;
                cfg.verbosity = Some(parse_verbosity(&parsed).with_context(|| {
                    format!("Invalid `verbosity` value '{parsed}' on line {line_number}")
                })?);
            }
            "stopwords_file" => {
                let parsed = parse_string_literal(value).with_context(|| {
                    format!("Invalid `stopwords_file` value on line {line_number}")
                })?;
                cfg.stopwords_file = Some(PathBuf::from(parsed));
            }
            "tokenizer" => {
                let parsed = parse_string_literal(value).with_context(|| {
                    format!("Invalid `tokenizer` value on line {line_number}")
                })?;
                let mode = parsed.parse::<TokenizerMode>().map_err(|e| {
                    anyhow::anyhow!("Invalid `tokenizer` value on line {line_number}: {e}")
                })?;
                cfg.tokenizer = Some(mode);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_number}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Range-checks `value` and narrows it to the field's integer type.
fn narrow<T: TryFrom<u64>>(
    value: u64,
    field: &str,
    range: &std::ops::RangeInclusive<u64>,
    line_number: usize,
) -> Result<T> {
    if !range.contains(&value) {
        bail!(
            "Invalid config value for `{field}` on line {line_number}: {value}. Expected range: {}..={}",
            range.start(),
            range.end()
        );
    }
    T::try_from(value).map_err(|_| anyhow::anyhow!("`{field}` out of range on line {line_number}"))
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}

fn parse_verbosity(value: &str) -> Result<VerbositySetting> {
    match value {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        _ => bail!("Expected one of: default, verbose, quiet, debug"),
    }
}
