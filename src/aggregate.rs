//! The aggregate: a filtered, single-metric summary of a coverage report,
//! optionally compared against a previously computed aggregate.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::classify::{is_dependency_path, is_excluded_path, ExcludePattern, TestPolicy};
use crate::delta::{delta_per_file, CoverageDelta};
use crate::error::{CodecovError, Result};
use crate::model::{FileCoverages, Metric, Report};

/// Filtering and metric selection applied when building an [`Aggregate`].
#[derive(Debug, Clone, Default)]
pub struct AggregateConfig {
    pub metric: Metric,
    /// Keep files outside the project (see [`is_dependency_path`]).
    pub include_dependencies: bool,
    /// Keep files the test policy recognises as tests.
    pub include_tests: bool,
    /// Regex; matching paths are dropped. Empty means none.
    pub exclude_pattern: Option<String>,
    /// Name used to recognise project-local paths. Empty treats every path
    /// outside the build directory as local.
    pub project_name: String,
    pub test_policy: TestPolicy,
}

/// Comparison against a base aggregate. Either all of these are known or
/// none are.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateDelta {
    pub coverage_delta_per_file: BTreeMap<String, CoverageDelta>,
    pub total_count_delta: i64,
    pub overall_coverage_delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "AggregateRepr")]
pub struct Aggregate {
    coverage_per_file: FileCoverages,
    total_count: i64,
    overall_coverage: f64,
    covered_property: Metric,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    delta: Option<AggregateDelta>,
}

impl Aggregate {
    /// Filter `report` according to `config` and summarise it. When `base` is
    /// given, per-file and overall deltas against it are computed too.
    pub fn new(report: &Report, config: &AggregateConfig, base: Option<&Aggregate>) -> Result<Self> {
        let pattern = ExcludePattern::from_option(config.exclude_pattern.as_deref())?;

        if let Some(base) = base {
            if base.covered_property != config.metric {
                return Err(CodecovError::InvalidBaseAggregate(
                    base.covered_property.to_string(),
                ));
            }
        }

        let filtered;
        let report = if config.include_tests {
            report
        } else {
            filtered = report.without_files(|path| config.test_policy.is_test_path(path));
            &filtered
        };

        let coverage_per_file: FileCoverages = report
            .file_coverages(config.metric)
            .into_iter()
            .filter(|(path, _)| {
                let included = config.include_dependencies
                    || !is_dependency_path(path, &config.project_name);
                included && !is_excluded_path(path, pattern.as_ref())
            })
            .collect();

        let total_count = coverage_per_file
            .values()
            .try_fold(0i64, |acc, c| acc.checked_add(c.count))
            .ok_or(CodecovError::CountOverflow("total count"))?;
        let overall_coverage = if total_count == 0 {
            0.0
        } else {
            coverage_per_file
                .values()
                .map(|c| c.covered as f64 / total_count as f64)
                .sum()
        };

        log::debug!(
            "aggregated {} files ({} {}) at {:.4}",
            coverage_per_file.len(),
            total_count,
            config.metric,
            overall_coverage
        );

        let delta = match base {
            Some(base) => Some(AggregateDelta {
                coverage_delta_per_file: delta_per_file(
                    &coverage_per_file,
                    &base.coverage_per_file,
                )?,
                total_count_delta: total_count
                    .checked_sub(base.total_count)
                    .ok_or(CodecovError::CountOverflow("total count delta"))?,
                overall_coverage_delta: overall_coverage - base.overall_coverage,
            }),
            None => None,
        };

        Ok(Self {
            coverage_per_file,
            total_count,
            overall_coverage,
            covered_property: config.metric,
            delta,
        })
    }

    pub(crate) fn from_parts(
        coverage_per_file: FileCoverages,
        total_count: i64,
        overall_coverage: f64,
        covered_property: Metric,
        delta: Option<AggregateDelta>,
    ) -> Self {
        Self {
            coverage_per_file,
            total_count,
            overall_coverage,
            covered_property,
            delta,
        }
    }

    pub fn coverage_per_file(&self) -> &FileCoverages {
        &self.coverage_per_file
    }

    pub fn total_count(&self) -> i64 {
        self.total_count
    }

    /// Between 0.0 and 1.0.
    pub fn overall_coverage(&self) -> f64 {
        self.overall_coverage
    }

    pub fn covered_property(&self) -> Metric {
        self.covered_property
    }

    pub fn coverage_delta_per_file(&self) -> Option<&BTreeMap<String, CoverageDelta>> {
        self.delta.as_ref().map(|d| &d.coverage_delta_per_file)
    }

    pub fn total_count_delta(&self) -> Option<i64> {
        self.delta.as_ref().map(|d| d.total_count_delta)
    }

    pub fn overall_coverage_delta(&self) -> Option<f64> {
        self.delta.as_ref().map(|d| d.overall_coverage_delta)
    }

    pub fn has_deltas(&self) -> bool {
        self.delta.is_some()
    }

    /// Between 0.0 and 100.0.
    pub fn overall_coverage_percent(&self) -> f64 {
        self.overall_coverage * 100.0
    }

    pub fn overall_coverage_percent_delta(&self) -> Option<f64> {
        self.overall_coverage_delta().map(|d| d * 100.0)
    }

    /// e.g. `"95.00%"`
    pub fn formatted_overall_coverage_percent(&self) -> String {
        format!("{}%", two_places(self.overall_coverage_percent()))
    }

    /// e.g. `"+10.00%"`
    pub fn formatted_overall_coverage_percent_delta(&self) -> Option<String> {
        self.overall_coverage_percent_delta()
            .map(|d| format!("{}%", two_places_with_sign(d)))
    }

    pub fn coverage_decreased(&self) -> bool {
        self.overall_coverage_delta().unwrap_or(0.0) < 0.0
    }

    /// Overall percentage, followed by the delta in parentheses when known.
    pub fn minimal_display(&self) -> String {
        let mut out = self.formatted_overall_coverage_percent();
        if let Some(delta) = self.formatted_overall_coverage_percent_delta() {
            out.push_str(&format!(" ({delta})"));
        }
        out
    }

    /// The percentage delta when known, the overall percentage otherwise.
    pub fn numeric_display(&self) -> f64 {
        self.overall_coverage_percent_delta()
            .unwrap_or_else(|| self.overall_coverage_percent())
    }
}

pub(crate) fn two_places(value: f64) -> String {
    format!("{value:.2}")
}

pub(crate) fn two_places_with_sign(value: f64) -> String {
    let sign = if value > 0.0 { "+" } else { "" };
    format!("{sign}{value:.2}")
}

/// Wire shape of a serialized aggregate. Delta fields are validated as a
/// group when converting.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AggregateRepr {
    coverage_per_file: FileCoverages,
    #[serde(default)]
    coverage_delta_per_file: Option<BTreeMap<String, CoverageDelta>>,
    total_count: i64,
    #[serde(default)]
    total_count_delta: Option<i64>,
    overall_coverage: f64,
    #[serde(default)]
    overall_coverage_delta: Option<f64>,
    #[serde(default)]
    covered_property: Metric,
}

impl TryFrom<AggregateRepr> for Aggregate {
    type Error = String;

    fn try_from(repr: AggregateRepr) -> std::result::Result<Self, Self::Error> {
        let delta = match (
            repr.coverage_delta_per_file,
            repr.total_count_delta,
            repr.overall_coverage_delta,
        ) {
            (None, None, None) => None,
            (Some(per_file), Some(count), Some(overall)) => Some(AggregateDelta {
                coverage_delta_per_file: per_file,
                total_count_delta: count,
                overall_coverage_delta: overall,
            }),
            _ => {
                return Err("delta fields must be either all present or all absent".to_string())
            }
        };
        Ok(Aggregate::from_parts(
            repr.coverage_per_file,
            repr.total_count,
            repr.overall_coverage,
            repr.covered_property,
            delta,
        ))
    }
}
