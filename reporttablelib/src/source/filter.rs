//! Report discovery with glob pattern support.
//!
//! This module finds dashboard scripts (`dashboard.js`) under a directory
//! of generated reports, with support for include/exclude glob patterns.

use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::ReportTableError;
use crate::Result;

/// File name of the script that embeds the report data.
pub const DASHBOARD_FILE: &str = "dashboard.js";

/// Configuration for report filtering.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    /// Glob patterns to include (if empty, include every dashboard)
    pub include: Vec<Pattern>,
    /// Glob patterns to exclude
    pub exclude: Vec<Pattern>,
}

impl FilterConfig {
    /// Create a new empty filter config (includes every dashboard).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an include pattern.
    pub fn include(mut self, pattern: &str) -> Result<Self> {
        self.include.push(compile(pattern)?);
        Ok(self)
    }

    /// Add an exclude pattern.
    pub fn exclude(mut self, pattern: &str) -> Result<Self> {
        self.exclude.push(compile(pattern)?);
        Ok(self)
    }

    /// Add multiple exclude patterns.
    pub fn exclude_many(mut self, patterns: &[&str]) -> Result<Self> {
        for pattern in patterns {
            self = self.exclude(pattern)?;
        }
        Ok(self)
    }

    /// Check if a path matches the filter criteria.
    ///
    /// A path matches if:
    /// 1. Its file name is `dashboard.js`
    /// 2. It matches at least one include pattern (or include is empty)
    /// 3. It doesn't match any exclude pattern
    pub fn matches(&self, path: &Path) -> bool {
        if path.file_name().is_none_or(|name| name != DASHBOARD_FILE) {
            return false;
        }

        let path_str = path.to_string_lossy();

        if self.exclude.iter().any(|p| p.matches(&path_str)) {
            return false;
        }

        self.include.is_empty() || self.include.iter().any(|p| p.matches(&path_str))
    }
}

fn compile(pattern: &str) -> Result<Pattern> {
    Pattern::new(pattern).map_err(|e| ReportTableError::InvalidGlob {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// Check if a directory should be skipped during traversal.
fn should_skip_dir(name: &str) -> bool {
    name.starts_with('.')
}

/// Discover dashboard scripts under a directory.
///
/// Walks the directory tree and returns every `dashboard.js` that matches
/// the filter, sorted by path.
pub fn discover_dashboards(root: impl AsRef<Path>, filter: &FilterConfig) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();

    if !root.exists() {
        return Err(ReportTableError::PathNotFound(root.to_path_buf()));
    }

    let mut files = Vec::new();

    if root.is_file() {
        if filter.matches(root) {
            files.push(root.to_path_buf());
        }
        return Ok(files);
    }

    let walker = WalkDir::new(root).follow_links(true).into_iter();

    for entry in walker.filter_entry(|e| {
        if e.depth() == 0 {
            return true;
        }
        if e.file_type().is_dir() {
            let name = e.file_name().to_str().unwrap_or("");
            return !should_skip_dir(name);
        }
        true
    }) {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                debug!(error = %err, "skipping unreadable entry");
                continue;
            }
        };

        let path = entry.path();

        if path.is_file() && filter.matches(path) {
            files.push(path.to_path_buf());
        }
    }

    // Sort for deterministic output
    files.sort();

    Ok(files)
}
