//! Optional TOML configuration file.
//!
//! ```toml
//! [display]
//! show_controllers_only = false
//! series_filter = "API"
//! filters_only_sample_series = true
//! format_fallback = "raw"
//!
//! [output]
//! format = "text"
//! label_width = 40
//! ```
//!
//! Every key is optional. Values set here override the dashboard's own
//! defaults and are overridden by command-line flags.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use reporttablelib::{FormatFallback, RenderOptions};
use serde::Deserialize;
use tracing::debug;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "reporttable.toml";

/// Default width of the label (first) column in text output.
pub const DEFAULT_LABEL_WIDTH: usize = 40;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub display: DisplayConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub show_controllers_only: Option<bool>,
    pub series_filter: Option<String>,
    pub filters_only_sample_series: Option<bool>,
    pub format_fallback: Option<FormatFallback>,
}

impl DisplayConfig {
    /// Overlay the configured values on `options`.
    pub fn apply(&self, mut options: RenderOptions) -> RenderOptions {
        if let Some(enabled) = self.show_controllers_only {
            options = options.controllers_only(enabled);
        }
        if let Some(filter) = &self.series_filter {
            options = options.filter(filter.clone());
        }
        if let Some(enabled) = self.filters_only_sample_series {
            options = options.filters_only_sample_series(enabled);
        }
        if let Some(fallback) = self.format_fallback {
            options = options.format_fallback(fallback);
        }
        options
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: Option<OutputFormat>,
    pub label_width: Option<usize>,
}

/// Output sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
    Html,
}

impl OutputFormat {
    pub const NAMES: [&'static str; 4] = ["text", "json", "csv", "html"];
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "html" => Ok(OutputFormat::Html),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Html => "html",
        };
        f.write_str(name)
    }
}

/// Load the configuration.
///
/// An explicit path must exist. Without one, `reporttable.toml` in the
/// working directory is used when present, else the empty config.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !candidate.is_file() {
                return Ok(Config::default());
            }
            candidate
        }
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    let config = parse_config(&content)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

pub fn parse_config(content: &str) -> Result<Config> {
    Ok(toml::from_str(content)?)
}
