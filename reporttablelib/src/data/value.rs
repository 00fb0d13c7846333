//! Cell values as they appear in dashboard data blobs.
//!
//! Dashboard rows mix labels, counts, percentages and durations in a single
//! array, so a cell is either a string or a number. Numbers are kept as
//! `f64` because that is what the blobs contain (`1.0`, `13.87...`, `73494`).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A single raw cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Numeric cell (counts, times, rates, scores)
    Number(f64),
    /// Text cell (labels, error messages, empty padding)
    Text(String),
}

impl Value {
    /// The numeric value, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    /// The string value, if this is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Number(_) => None,
            Value::Text(s) => Some(s),
        }
    }

    /// Text representation used when a value is displayed or matched
    /// without a formatter.
    pub fn text(&self) -> String {
        match self {
            Value::Number(n) => number_text(*n),
            Value::Text(s) => s.clone(),
        }
    }

    /// Ordering used for table sorting: numbers numerically, text
    /// case-insensitively, numbers before text.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.total_cmp(b),
            (Value::Text(a), Value::Text(b)) => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b)),
            (Value::Number(_), Value::Text(_)) => Ordering::Less,
            (Value::Text(_), Value::Number(_)) => Ordering::Greater,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Render a number the way the dashboard's browser code stringifies it:
/// integral values drop the fractional part, everything else uses the
/// shortest round-trip decimal.
pub fn number_text(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        // Covers -0.0 as well
        return "0".to_string();
    }
    if n.fract() == 0.0 {
        return format!("{:.0}", n);
    }
    format!("{}", n)
}
