//! Display and sort options for rendering tables.
//!
//! This module contains the configuration types that control which rows a
//! rendered table shows and in which order.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What to do when a cell formatter fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormatFallback {
    /// Show the raw value text and keep going
    #[default]
    Raw,
    /// Show a `-` placeholder
    Placeholder,
    /// Drop the whole row
    SkipRow,
    /// Stop rendering and return the error
    Abort,
}

impl FromStr for FormatFallback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "raw" => Ok(FormatFallback::Raw),
            "placeholder" => Ok(FormatFallback::Placeholder),
            "skip-row" | "skip" => Ok(FormatFallback::SkipRow),
            "abort" => Ok(FormatFallback::Abort),
            _ => Err(format!("Unknown format fallback: {}", s)),
        }
    }
}

/// User-adjustable display preferences shared by every table of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Only show controller rows (for datasets that can tell them apart)
    pub show_controllers_only: bool,
    /// Case-insensitive regular expression matched against the series column
    pub series_filter: Option<String>,
    /// The filter only applies to datasets that support controller
    /// discrimination; other tables show every row
    pub filters_only_sample_series: bool,
    /// Recovery policy for formatter failures
    pub format_fallback: FormatFallback,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_controllers_only: false,
            series_filter: None,
            filters_only_sample_series: true,
            format_fallback: FormatFallback::Raw,
        }
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the series filter (an empty pattern clears it)
    pub fn filter(mut self, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        self.series_filter = if pattern.is_empty() {
            None
        } else {
            Some(pattern)
        };
        self
    }

    /// Builder: show controllers only
    pub fn controllers_only(mut self, enabled: bool) -> Self {
        self.show_controllers_only = enabled;
        self
    }

    /// Builder: restrict the filter to controller-aware datasets
    pub fn filters_only_sample_series(mut self, enabled: bool) -> Self {
        self.filters_only_sample_series = enabled;
        self
    }

    /// Builder: set the formatter failure policy
    pub fn format_fallback(mut self, fallback: FormatFallback) -> Self {
        self.format_fallback = fallback;
        self
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending (A-Z, smallest first)
    #[default]
    Ascending,
    /// Descending (Z-A, largest first)
    Descending,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" | "0" => Ok(SortDirection::Ascending),
            "desc" | "descending" | "1" => Ok(SortDirection::Descending),
            _ => Err(format!("Unknown sort direction: {}", s)),
        }
    }
}

/// One sort criterion: a column and a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: usize,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn ascending(column: usize) -> Self {
        Self {
            column,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(column: usize) -> Self {
        Self {
            column,
            direction: SortDirection::Descending,
        }
    }
}

/// Default sort order of a table body; earlier keys take precedence.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortSpec(pub Vec<SortKey>);

impl SortSpec {
    /// No sorting: data order
    pub fn none() -> Self {
        Self::default()
    }

    /// Sort by a single column
    pub fn by(key: SortKey) -> Self {
        Self(vec![key])
    }

    /// Builder: add a tie-breaking key
    pub fn then(mut self, key: SortKey) -> Self {
        self.0.push(key);
        self
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for SortSpec {
    type Err = String;

    /// Parse `COL[:DIR][,COL[:DIR]...]`, e.g. `0:asc,3:desc`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut keys = Vec::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (column, direction) = match part.split_once(':') {
                Some((c, d)) => (c.trim(), d.trim().parse::<SortDirection>()?),
                None => (part, SortDirection::Ascending),
            };
            let column = column
                .parse::<usize>()
                .map_err(|_| format!("Invalid sort column: {}", column))?;
            keys.push(SortKey { column, direction });
        }
        Ok(SortSpec(keys))
    }
}
