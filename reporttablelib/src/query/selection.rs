//! Row selection: decide which item rows a rendered table shows.
//!
//! Two independent predicates must both pass for an item row:
//!
//! 1. **Series filter** - passes when there is no filter, when the filter is
//!    restricted to sample series and the dataset cannot tell controllers
//!    apart, or when the filter matches the row's series column
//!    (case-insensitive).
//! 2. **Controllers toggle** - passes when the toggle is off, when the
//!    dataset cannot tell controllers apart, or when the row is a controller.
//!
//! The overall row never goes through selection.

use regex::{Regex, RegexBuilder};

use super::options::RenderOptions;
use crate::data::dataset::{Dataset, Row};
use crate::error::ReportTableError;
use crate::Result;

/// A compiled, case-insensitive series filter.
#[derive(Debug, Clone)]
pub struct SeriesFilter {
    regex: Regex,
}

impl SeriesFilter {
    /// Compile a filter pattern.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| ReportTableError::FilterPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { regex })
    }

    /// Whether the pattern matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Row predicate for one dataset under one set of options.
#[derive(Debug, Clone)]
pub struct RowSelection {
    filter: Option<SeriesFilter>,
    filter_exempt: bool,
    controllers_only: bool,
    series_column: usize,
}

impl RowSelection {
    /// Build the predicate. Fails if the filter pattern does not compile.
    pub fn new(dataset: &Dataset, options: &RenderOptions, series_column: usize) -> Result<Self> {
        let filter = match options.series_filter.as_deref() {
            Some(pattern) if !pattern.is_empty() => Some(SeriesFilter::new(pattern)?),
            _ => None,
        };
        let discriminates = dataset.supports_controllers_discrimination;

        Ok(Self {
            filter,
            filter_exempt: options.filters_only_sample_series && !discriminates,
            controllers_only: options.show_controllers_only && discriminates,
            series_column,
        })
    }

    /// Series filter predicate.
    pub fn passes_filter(&self, row: &Row) -> bool {
        match &self.filter {
            None => true,
            Some(_) if self.filter_exempt => true,
            Some(filter) => {
                let text = row
                    .get(self.series_column)
                    .map(|v| v.text())
                    .unwrap_or_default();
                filter.is_match(&text)
            }
        }
    }

    /// Controllers toggle predicate.
    pub fn passes_controllers(&self, row: &Row) -> bool {
        !self.controllers_only || row.is_controller
    }

    /// Both predicates, plus the empty-row guard.
    pub fn includes(&self, row: &Row) -> bool {
        self.passes_filter(row) && self.passes_controllers(row) && !row.is_empty()
    }

    /// Indices of the included item rows, in data order.
    pub fn select(&self, dataset: &Dataset) -> Vec<usize> {
        dataset
            .items
            .iter()
            .enumerate()
            .filter(|(_, row)| self.includes(row))
            .map(|(index, _)| index)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::value::Value;

    fn dataset(discriminates: bool) -> Dataset {
        Dataset::new(["Label", "Count"])
            .with_controllers_discrimination(discriminates)
            .with_item(Row::new(vec!["GET".into(), Value::from(100.0)]))
            .with_item(Row::controller(vec!["Login flow".into(), Value::from(20.0)]))
            .with_item(Row::new(vec!["POST".into(), Value::from(50.0)]))
    }

    #[test]
    fn test_no_filter_selects_all() {
        let ds = dataset(true);
        let selection = RowSelection::new(&ds, &RenderOptions::default(), 0).unwrap();
        assert_eq!(selection.select(&ds), vec![0, 1, 2]);
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let ds = dataset(true);
        let options = RenderOptions::new().filter("get");
        let selection = RowSelection::new(&ds, &options, 0).unwrap();
        assert_eq!(selection.select(&ds), vec![0]);
    }

    #[test]
    fn test_filter_is_a_regex() {
        let ds = dataset(true);
        let options = RenderOptions::new().filter("^(GET|POST)$");
        let selection = RowSelection::new(&ds, &options, 0).unwrap();
        assert_eq!(selection.select(&ds), vec![0, 2]);
    }

    #[test]
    fn test_filter_matches_number_text() {
        let ds = dataset(true);
        let options = RenderOptions::new().filter("^50$");
        let selection = RowSelection::new(&ds, &options, 1).unwrap();
        assert_eq!(selection.select(&ds), vec![2]);
    }

    #[test]
    fn test_invalid_pattern() {
        let ds = dataset(true);
        let options = RenderOptions::new().filter("([");
        let err = RowSelection::new(&ds, &options, 0).unwrap_err();
        match err {
            ReportTableError::FilterPattern { pattern, .. } => assert_eq!(pattern, "(["),
            other => panic!("Expected FilterPattern error, got {other:?}"),
        }
    }

    #[test]
    fn test_controllers_only() {
        let ds = dataset(true);
        let options = RenderOptions::new().controllers_only(true);
        let selection = RowSelection::new(&ds, &options, 0).unwrap();
        assert_eq!(selection.select(&ds), vec![1]);
    }

    #[test]
    fn test_controllers_only_ignored_without_discrimination() {
        let ds = dataset(false);
        let options = RenderOptions::new().controllers_only(true);
        let selection = RowSelection::new(&ds, &options, 0).unwrap();
        assert_eq!(selection.select(&ds), vec![0, 1, 2]);
    }

    // Precedence when both a filter and the controllers toggle are active.
    // Each case lists (discriminates, filters_only_sample_series, expected).
    #[test]
    fn test_filter_and_controllers_precedence() {
        let cases = [
            // Controller-aware: filter "o" keeps "Login flow" and "POST",
            // toggle keeps only the controller.
            (true, true, vec![1]),
            (true, false, vec![1]),
            // Not controller-aware, filter restricted to sample series:
            // filter exempt, toggle ignored.
            (false, true, vec![0, 1, 2]),
            // Not controller-aware, filter applies everywhere: toggle
            // ignored, filter still applies.
            (false, false, vec![1, 2]),
        ];

        for (discriminates, sample_only, expected) in cases {
            let ds = dataset(discriminates);
            let options = RenderOptions::new()
                .filter("o")
                .controllers_only(true)
                .filters_only_sample_series(sample_only);
            let selection = RowSelection::new(&ds, &options, 0).unwrap();
            assert_eq!(
                selection.select(&ds),
                expected,
                "discriminates={discriminates} sample_only={sample_only}"
            );
        }
    }

    #[test]
    fn test_empty_rows_never_selected() {
        let ds = Dataset::new(["Label"])
            .with_item(Row::new(vec![]))
            .with_item(Row::new(vec!["GET".into()]));
        let selection = RowSelection::new(&ds, &RenderOptions::default(), 0).unwrap();
        assert_eq!(selection.select(&ds), vec![1]);
    }
}
