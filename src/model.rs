//! In-memory representation of the JSON written by
//! `swift test --enable-code-coverage` (an `llvm-cov export` document).
//! Only the fields the aggregator reads are modelled; everything else in the
//! document is ignored on decode.

use std::collections::BTreeMap;
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Per-file coverage keyed by filename, ordered for deterministic output.
pub type FileCoverages = BTreeMap<String, CoverageSummary>;

/// Compute a coverage rate, returning 0.0 when the total is zero.
#[must_use]
pub fn rate(covered: i64, total: i64) -> f64 {
    if total == 0 {
        0.0
    } else {
        covered as f64 / total as f64
    }
}

/// The measurable property coverage is aggregated over.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Lines,
    Functions,
    Instantiations,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Lines => "lines",
            Metric::Functions => "functions",
            Metric::Instantiations => "instantiations",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Count, covered count and percentage (0-100) for one metric of one file.
///
/// The delta engine reuses this shape for signed differences, hence `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CoverageSummary {
    pub count: i64,
    pub covered: i64,
    pub percent: f64,
}

impl CoverageSummary {
    /// Build a summary from counts, deriving the percentage.
    pub fn from_counts(count: i64, covered: i64) -> Self {
        let percent = if count == 0 {
            0.0
        } else {
            covered as f64 * 100.0 / count as f64
        };
        Self {
            count,
            covered,
            percent,
        }
    }

    /// Field-wise difference `self - base`, or `None` if a count overflows.
    #[must_use]
    pub fn diff(&self, base: &CoverageSummary) -> Option<CoverageSummary> {
        Some(CoverageSummary {
            count: self.count.checked_sub(base.count)?,
            covered: self.covered.checked_sub(base.covered)?,
            percent: self.percent - base.percent,
        })
    }
}

/// All three metrics for a single file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSummary {
    pub lines: CoverageSummary,
    pub functions: CoverageSummary,
    pub instantiations: CoverageSummary,
}

impl FileSummary {
    pub fn coverage(&self, metric: Metric) -> CoverageSummary {
        match metric {
            Metric::Lines => self.lines,
            Metric::Functions => self.functions,
            Metric::Instantiations => self.instantiations,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    pub filename: String,
    pub summary: FileSummary,
}

/// One entry of the report's `data` array.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Run {
    pub files: Vec<File>,
}

/// A complete coverage report.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Report {
    pub version: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "data")]
    pub runs: Vec<Run>,
}

impl Report {
    /// Per-file coverage for `metric`, taken from the first run only.
    /// Duplicate filenames resolve to the last entry.
    pub fn file_coverages(&self, metric: Metric) -> FileCoverages {
        let Some(first) = self.runs.first() else {
            return FileCoverages::new();
        };
        first
            .files
            .iter()
            .map(|f| (f.filename.clone(), f.summary.coverage(metric)))
            .collect()
    }

    /// Drop every file matching `is_test`, then drop runs left empty.
    #[must_use]
    pub fn without_files<F>(&self, is_test: F) -> Report
    where
        F: Fn(&str) -> bool,
    {
        let runs = self
            .runs
            .iter()
            .filter_map(|run| {
                let files: Vec<File> = run
                    .files
                    .iter()
                    .filter(|f| !is_test(&f.filename))
                    .cloned()
                    .collect();
                if files.is_empty() {
                    None
                } else {
                    Some(Run { files })
                }
            })
            .collect();
        Report {
            version: self.version.clone(),
            kind: self.kind.clone(),
            runs,
        }
    }
}
