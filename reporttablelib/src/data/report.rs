//! A load-test report: the datasets one dashboard embeds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::dataset::Dataset;
use crate::query::options::RenderOptions;

/// The standard tables a dashboard renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableKind {
    /// Application Performance Index per sampler
    Apdex,
    /// Request statistics (counts, response times, throughput)
    Statistics,
    /// Error types and their share of samples
    Errors,
    /// Most frequent errors for each sampler
    TopErrors,
}

impl TableKind {
    /// All kinds, in dashboard display order.
    pub const ALL: [TableKind; 4] = [
        TableKind::Apdex,
        TableKind::Statistics,
        TableKind::Errors,
        TableKind::TopErrors,
    ];

    /// DOM id of the table in the dashboard page.
    pub fn element_id(&self) -> &'static str {
        match self {
            TableKind::Apdex => "apdexTable",
            TableKind::Statistics => "statisticsTable",
            TableKind::Errors => "errorsTable",
            TableKind::TopErrors => "top5ErrorsBySamplerTable",
        }
    }

    /// Human-readable table title.
    pub fn title(&self) -> &'static str {
        match self {
            TableKind::Apdex => "APDEX (Application Performance Index)",
            TableKind::Statistics => "Statistics",
            TableKind::Errors => "Errors",
            TableKind::TopErrors => "Top 5 Errors by sampler",
        }
    }

    /// Short name used on the command line and as JSON key.
    pub fn name(&self) -> &'static str {
        match self {
            TableKind::Apdex => "apdex",
            TableKind::Statistics => "statistics",
            TableKind::Errors => "errors",
            TableKind::TopErrors => "top-errors",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TableKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "apdex" | "apdextable" => Ok(TableKind::Apdex),
            "statistics" | "stats" | "statisticstable" => Ok(TableKind::Statistics),
            "errors" | "error" | "errorstable" => Ok(TableKind::Errors),
            "top-errors" | "top5" | "top5errorsbysamplertable" => Ok(TableKind::TopErrors),
            _ => Err(format!("Unknown table: {}", s)),
        }
    }
}

/// Pass/fail split shown in the dashboard's requests summary chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RequestsSummary {
    #[serde(rename = "OkPercent")]
    pub ok_percent: f64,
    #[serde(rename = "KoPercent")]
    pub ko_percent: f64,
}

/// A dataset tagged with the table it feeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportTable {
    pub kind: TableKind,
    pub dataset: Dataset,
}

/// Everything extracted from one dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report name (usually the report directory name)
    pub name: String,
    /// Path of the dashboard script the data came from
    pub path: PathBuf,
    /// Pass/fail percentages, when the dashboard embeds them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<RequestsSummary>,
    /// Display preferences the dashboard starts with
    pub defaults: RenderOptions,
    /// Datasets in dashboard order
    pub tables: Vec<ReportTable>,
}

impl Report {
    /// Dataset for a table kind, if the dashboard has it.
    pub fn table(&self, kind: TableKind) -> Option<&Dataset> {
        self.tables
            .iter()
            .find(|t| t.kind == kind)
            .map(|t| &t.dataset)
    }

    /// Headline numbers taken from the overall rows.
    pub fn overview(&self) -> ReportOverview {
        let stats_overall = self
            .table(TableKind::Statistics)
            .and_then(|d| d.overall.as_ref());
        let apdex_overall = self
            .table(TableKind::Apdex)
            .and_then(|d| d.overall.as_ref());

        let stat = |column: usize| {
            stats_overall
                .and_then(|row| row.get(column))
                .and_then(|v| v.as_f64())
        };

        ReportOverview {
            name: self.name.clone(),
            samples: stat(1),
            failures: stat(2),
            error_percent: stat(3),
            apdex: apdex_overall
                .and_then(|row| row.get(0))
                .and_then(|v| v.as_f64()),
            throughput: stat(11),
        }
    }
}

/// Per-report headline numbers, used by the multi-report summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportOverview {
    pub name: String,
    pub samples: Option<f64>,
    pub failures: Option<f64>,
    pub error_percent: Option<f64>,
    pub apdex: Option<f64>,
    pub throughput: Option<f64>,
}
