//! Error types for reporttablelib

use std::path::PathBuf;
use thiserror::Error;

use crate::format::FormatError;

/// Errors that can occur while loading or rendering report tables
#[derive(Error, Debug)]
pub enum ReportTableError {
    /// Dataset shape does not match what the renderer needs
    #[error("invalid table configuration: {0}")]
    Configuration(String),

    /// A cell formatter failed and the fallback policy is to abort
    #[error("formatting failed: {0}")]
    Formatting(#[from] FormatError),

    /// Series filter is not a valid regular expression
    #[error("invalid filter pattern '{pattern}': {message}")]
    FilterPattern { pattern: String, message: String },

    /// Invalid glob pattern
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Path does not exist
    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),

    /// Dashboard script did not contain the expected data
    #[error("cannot extract report data from '{path}': {message}")]
    Extract { path: PathBuf, message: String },

    /// Malformed JSON dataset
    #[error("invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
