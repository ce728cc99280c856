//! Output formatting for aggregates.

use std::fmt::Write;

use crate::aggregate::Aggregate;
use crate::table::{rows, split_out_tests, TableEntry, TableOptions};

const DIVIDER: &str = "=-=-=-=-=-=-=-=-=";

/// Trait for formatting an aggregate for display.
pub trait ReportFormatter {
    /// Format the aggregate to a string.
    fn format(&self, aggregate: &Aggregate) -> String;
}

/// Overall percentage, with the delta when a base was given.
pub struct MinimalFormatter;

impl ReportFormatter for MinimalFormatter {
    fn format(&self, aggregate: &Aggregate) -> String {
        format!("{}\n", aggregate.minimal_display())
    }
}

/// A bare number for scripts: the percentage delta if known, else the
/// overall percentage.
pub struct NumericFormatter;

impl ReportFormatter for NumericFormatter {
    fn format(&self, aggregate: &Aggregate) -> String {
        format!("{:.2}\n", aggregate.numeric_display())
    }
}

/// The aggregate serialized as JSON, suitable as a later `--base`.
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn format(&self, aggregate: &Aggregate) -> String {
        match serde_json::to_string(aggregate) {
            Ok(json) => format!("{json}\n"),
            Err(e) => {
                log::error!("could not serialize aggregate: {e}");
                "{}\n".to_string()
            }
        }
    }
}

/// Per-file table with source and test files grouped separately.
pub struct TableFormatter {
    pub options: TableOptions,
}

impl ReportFormatter for TableFormatter {
    fn format(&self, aggregate: &Aggregate) -> String {
        let entries = split_out_tests(rows(aggregate, &self.options), self.options.test_policy);
        let show_dependency = self.options.include_dependencies;
        let show_delta = aggregate.has_deltas();

        let file_width = entries
            .iter()
            .filter_map(|e| match e {
                TableEntry::File(row) => Some(row.filename.chars().count()),
                TableEntry::Separator => None,
            })
            .chain([DIVIDER.len(), "File".len()])
            .max()
            .unwrap_or_default();

        let line = |dependency: &str, file: &str, coverage: &str, delta: &str| -> String {
            let mut s = String::new();
            if show_dependency {
                write!(s, "{dependency:<12} ").unwrap();
            }
            write!(s, "{file:<file_width$} {coverage:>9}").unwrap();
            if show_delta {
                write!(s, " {delta:>10}").unwrap();
            }
            s.trim_end().to_string()
        };

        let mut out = String::new();
        write!(out, "Overall coverage: {}", aggregate.formatted_overall_coverage_percent()).unwrap();
        if let Some(delta) = aggregate.formatted_overall_coverage_percent_delta() {
            write!(out, " ({delta})").unwrap();
        }
        out.push_str("\n\n");

        let header = line("Dependency?", "File", "Coverage", "Delta");
        writeln!(out, "{header}").unwrap();
        writeln!(out, "{}", "-".repeat(header.chars().count())).unwrap();

        for entry in &entries {
            match entry {
                TableEntry::File(row) => {
                    let coverage = row.coverage_string();
                    let delta = row.coverage_delta_string();
                    writeln!(
                        out,
                        "{}",
                        line(row.dependency_string(), &row.filename, &coverage, &delta)
                    )
                    .unwrap();
                }
                TableEntry::Separator => {
                    out.push('\n');
                    writeln!(out, "{DIVIDER}").unwrap();
                    out.push('\n');
                }
            }
        }

        out
    }
}
