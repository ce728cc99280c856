//! Turns an [`Aggregate`] into sorted display rows for the table output.

use std::path::Path;

use clap::ValueEnum;

use crate::aggregate::{two_places, two_places_with_sign, Aggregate};
use crate::classify::{is_dependency_path, TestPolicy};
use crate::delta::CoverageDelta;

/// How to sort the coverage table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortOrder {
    #[default]
    Filename,
    #[value(name = "+cov")]
    CoverageAsc,
    #[value(name = "-cov")]
    CoverageDesc,
}

/// Settings that shape the rows, independent of the aggregate itself.
#[derive(Debug, Clone, Default)]
pub struct TableOptions {
    /// Adds the dependency column.
    pub include_dependencies: bool,
    pub project_name: String,
    pub sort_order: SortOrder,
    pub test_policy: TestPolicy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoverageTableRow {
    /// `None` when the dependency column is hidden.
    pub dependency: Option<bool>,
    /// Full path as it appears in the report.
    pub path: String,
    /// Last path component, used for display and sorting.
    pub filename: String,
    /// Percentage, `None` for files that only exist in the base.
    pub coverage: Option<f64>,
    /// `None` when the aggregate has no base.
    pub delta: Option<CoverageDelta>,
}

impl CoverageTableRow {
    fn new(
        path: &str,
        coverage: Option<f64>,
        delta: Option<CoverageDelta>,
        options: &TableOptions,
    ) -> Self {
        let filename = Path::new(path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(path)
            .to_string();
        Self {
            dependency: options
                .include_dependencies
                .then(|| is_dependency_path(path, &options.project_name)),
            path: path.to_string(),
            filename,
            coverage,
            delta,
        }
    }

    pub fn coverage_string(&self) -> String {
        self.coverage
            .map(|c| format!("{}%", two_places(c)))
            .unwrap_or_default()
    }

    pub fn coverage_delta_string(&self) -> String {
        match self.delta {
            None => String::new(),
            Some(CoverageDelta::FileRemoved) => "(Removed)".to_string(),
            Some(CoverageDelta::FileAdded(coverage)) => format!("{}%", two_places(coverage.percent)),
            Some(CoverageDelta::NoChange(_)) => "-".to_string(),
            Some(CoverageDelta::Changed(change)) => {
                format!("{}%", two_places_with_sign(change.percent))
            }
        }
    }

    pub fn dependency_string(&self) -> &'static str {
        if self.dependency.unwrap_or(false) {
            "✓"
        } else {
            ""
        }
    }

    fn sort_key(&self) -> f64 {
        self.coverage.unwrap_or(f64::NEG_INFINITY)
    }
}

/// One line of the rendered table.
#[derive(Debug, Clone, PartialEq)]
pub enum TableEntry {
    File(CoverageTableRow),
    /// Boundary between source and test rows.
    Separator,
}

/// One row per covered file, followed by rows for files removed since the
/// base, sorted by `options.sort_order`. Ties in coverage keep filename order.
pub fn rows(aggregate: &Aggregate, options: &TableOptions) -> Vec<CoverageTableRow> {
    let deltas = aggregate.coverage_delta_per_file();

    let mut rows: Vec<CoverageTableRow> = aggregate
        .coverage_per_file()
        .iter()
        .map(|(path, coverage)| {
            let delta = deltas.and_then(|d| d.get(path)).copied();
            CoverageTableRow::new(path, Some(coverage.percent), delta, options)
        })
        .collect();

    if let Some(deltas) = deltas {
        rows.extend(
            deltas
                .iter()
                .filter(|(_, delta)| delta.is_removed())
                .map(|(path, delta)| CoverageTableRow::new(path, None, Some(*delta), options)),
        );
    }

    rows.sort_by(|a, b| a.filename.cmp(&b.filename));
    match options.sort_order {
        SortOrder::Filename => {}
        SortOrder::CoverageAsc => rows.sort_by(|a, b| a.sort_key().total_cmp(&b.sort_key())),
        SortOrder::CoverageDesc => rows.sort_by(|a, b| b.sort_key().total_cmp(&a.sort_key())),
    }
    rows
}

/// Source rows, a separator, then test rows. Relative order is preserved.
pub fn split_out_tests(rows: Vec<CoverageTableRow>, policy: TestPolicy) -> Vec<TableEntry> {
    let (tests, sources): (Vec<_>, Vec<_>) =
        rows.into_iter().partition(|row| policy.is_test_path(&row.path));

    sources
        .into_iter()
        .map(TableEntry::File)
        .chain(std::iter::once(TableEntry::Separator))
        .chain(tests.into_iter().map(TableEntry::File))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::AggregateConfig;
    use crate::model::{CoverageSummary, File, FileSummary, Report, Run};

    fn test_row(path: &str) -> CoverageTableRow {
        CoverageTableRow::new(path, Some(50.0), None, &TableOptions::default())
    }

    fn with_delta(delta: Option<CoverageDelta>) -> CoverageTableRow {
        CoverageTableRow {
            delta,
            ..test_row("A.swift")
        }
    }

    fn report(files: &[(&str, i64, i64)]) -> Report {
        Report {
            runs: vec![Run {
                files: files
                    .iter()
                    .map(|(name, count, covered)| {
                        let c = CoverageSummary::from_counts(*count, *covered);
                        File {
                            filename: name.to_string(),
                            summary: FileSummary {
                                lines: c,
                                functions: c,
                                instantiations: c,
                            },
                        }
                    })
                    .collect(),
            }],
            ..Default::default()
        }
    }

    fn aggregate(files: &[(&str, i64, i64)], base: Option<&Aggregate>) -> Aggregate {
        let config = AggregateConfig {
            include_dependencies: true,
            include_tests: true,
            ..Default::default()
        };
        Aggregate::new(&report(files), &config, base).unwrap()
    }

    #[test]
    fn test_coverage_delta_string() {
        let example = CoverageSummary::from_counts(10, 9);

        assert_eq!(with_delta(None).coverage_delta_string(), "");
        assert_eq!(
            with_delta(Some(CoverageDelta::FileRemoved)).coverage_delta_string(),
            "(Removed)"
        );
        assert_eq!(
            with_delta(Some(CoverageDelta::FileAdded(example))).coverage_delta_string(),
            "90.00%"
        );
        assert_eq!(
            with_delta(Some(CoverageDelta::Changed(example))).coverage_delta_string(),
            "+90.00%"
        );
        assert_eq!(
            with_delta(Some(CoverageDelta::Changed(CoverageSummary {
                count: 0,
                covered: -1,
                percent: -12.5
            })))
            .coverage_delta_string(),
            "-12.50%"
        );
        assert_eq!(
            with_delta(Some(CoverageDelta::NoChange(CoverageSummary::from_counts(10, 0))))
                .coverage_delta_string(),
            "-"
        );
    }

    #[test]
    fn test_coverage_string() {
        let mut row = test_row("A.swift");
        row.coverage = None;
        assert_eq!(row.coverage_string(), "");
        row.coverage = Some(0.0);
        assert_eq!(row.coverage_string(), "0.00%");
        row.coverage = Some(90.0);
        assert_eq!(row.coverage_string(), "90.00%");
    }

    #[test]
    fn test_dependency_string() {
        let mut row = test_row("A.swift");
        assert_eq!(row.dependency_string(), "");
        row.dependency = Some(false);
        assert_eq!(row.dependency_string(), "");
        row.dependency = Some(true);
        assert_eq!(row.dependency_string(), "✓");
    }

    #[test]
    fn test_row_filename_is_last_component() {
        let row = test_row("/p/Sources/App/Model.swift");
        assert_eq!(row.filename, "Model.swift");
        assert_eq!(row.path, "/p/Sources/App/Model.swift");
    }

    #[test]
    fn test_rows_dependency_column() {
        let agg = aggregate(&[("/p/MyProj/A.swift", 1, 1), ("/p/Lib/B.swift", 1, 1)], None);
        let options = TableOptions {
            include_dependencies: true,
            project_name: "MyProj".to_string(),
            ..Default::default()
        };
        let rows = rows(&agg, &options);
        assert_eq!(rows[0].dependency, Some(false));
        assert_eq!(rows[1].dependency, Some(true));

        let hidden = super::rows(&agg, &TableOptions::default());
        assert!(hidden.iter().all(|r| r.dependency.is_none()));
    }

    #[test]
    fn test_rows_sort_orders() {
        let agg = aggregate(
            &[("/x/C.swift", 10, 5), ("/y/A.swift", 10, 9), ("/z/B.swift", 10, 1)],
            None,
        );
        let names = |order: SortOrder| -> Vec<String> {
            let options = TableOptions {
                sort_order: order,
                ..Default::default()
            };
            rows(&agg, &options).into_iter().map(|r| r.filename).collect()
        };

        assert_eq!(names(SortOrder::Filename), ["A.swift", "B.swift", "C.swift"]);
        assert_eq!(names(SortOrder::CoverageAsc), ["B.swift", "C.swift", "A.swift"]);
        assert_eq!(names(SortOrder::CoverageDesc), ["A.swift", "C.swift", "B.swift"]);
    }

    #[test]
    fn test_rows_include_removed_files() {
        let base = aggregate(&[("A.swift", 10, 5), ("Gone.swift", 10, 10)], None);
        let agg = aggregate(&[("A.swift", 10, 5)], Some(&base));

        let options = TableOptions {
            sort_order: SortOrder::CoverageAsc,
            ..Default::default()
        };
        let rows = rows(&agg, &options);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].filename, "Gone.swift");
        assert_eq!(rows[0].coverage, None);
        assert_eq!(rows[0].coverage_delta_string(), "(Removed)");
        assert_eq!(rows[1].coverage_delta_string(), "-");
    }

    #[test]
    fn test_rows_without_base_have_no_delta() {
        let agg = aggregate(&[("A.swift", 10, 5)], None);
        let rows = rows(&agg, &TableOptions::default());
        assert_eq!(rows[0].delta, None);
    }

    #[test]
    fn test_split_out_tests() {
        let business_logic = test_row("Sources/BusinessLogic.swift");
        let business_logic_tests = test_row("Tests/BusinessLogicTests.swift");
        let test_helper = test_row("Tests/Helpers/MockObject.swift");

        let rows = vec![
            business_logic.clone(),
            business_logic_tests.clone(),
            test_helper.clone(),
        ];

        assert_eq!(
            split_out_tests(rows.clone(), TestPolicy::Substring),
            vec![
                TableEntry::File(business_logic.clone()),
                TableEntry::Separator,
                TableEntry::File(business_logic_tests.clone()),
                TableEntry::File(test_helper.clone()),
            ]
        );
        assert_eq!(
            split_out_tests(rows, TestPolicy::Strict),
            vec![
                TableEntry::File(business_logic),
                TableEntry::File(test_helper),
                TableEntry::Separator,
                TableEntry::File(business_logic_tests),
            ]
        );
    }

    #[test]
    fn test_split_out_tests_empty() {
        assert_eq!(
            split_out_tests(vec![], TestPolicy::Substring),
            vec![TableEntry::Separator]
        );
    }
}
