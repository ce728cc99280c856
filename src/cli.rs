//! Argument definitions and the command handler for the CLI.
//!
//! [`run`] returns its output as a `String` alongside the pass/fail verdict,
//! making it easy to test without capturing stdout.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use crate::aggregate::{Aggregate, AggregateConfig};
use crate::classify::{project_name_from_dir, TestPolicy};
use crate::error::CodecovError;
use crate::ingest;
use crate::model::Metric;
use crate::report::{
    JsonFormatter, MinimalFormatter, NumericFormatter, ReportFormatter, TableFormatter,
};
use crate::table::{SortOrder, TableOptions};

/// How to display the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PrintFormat {
    #[default]
    Minimal,
    Numeric,
    Table,
    Json,
}

/// Analyze code coverage metrics produced by `swift test --enable-code-coverage`.
#[derive(Parser, Debug)]
#[command(name = "swift-test-codecov", version, about)]
pub struct Args {
    /// The JSON file written by `swift test --enable-code-coverage`, usually
    /// `.build/debug/codecov/<package-name>.json`.
    #[arg(value_name = "CODECOV_FILE")]
    pub codecov_file: PathBuf,

    /// A JSON aggregate from an earlier run (`--print-format json`) to
    /// compare against.
    #[arg(long, value_name = "BASE_FILE")]
    pub base: Option<PathBuf>,

    /// Name of the project's root folder, used to tell project files from
    /// dependencies (default: the current directory's name).
    #[arg(long)]
    pub project_name: Option<String>,

    /// The metric over which to aggregate.
    #[arg(short, long, value_enum, default_value_t)]
    pub metric: Metric,

    /// Minimum coverage percentage (0-100). Lower coverage exits with code 1.
    #[arg(
        short = 'v',
        long = "minimum",
        default_value_t = 0,
        value_parser = clap::value_parser!(u8).range(0..=100)
    )]
    pub minimum: u8,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t)]
    pub print_format: PrintFormat,

    /// Sort order for the coverage table.
    #[arg(short, long, value_enum, default_value_t, allow_hyphen_values = true)]
    pub sort: SortOrder,

    /// Include dependencies in the coverage calculation.
    #[arg(long = "dependencies", overrides_with = "no_dependencies")]
    pub dependencies: bool,

    /// Exclude dependencies from the coverage calculation (default).
    #[arg(long = "no-dependencies", overrides_with = "dependencies")]
    pub no_dependencies: bool,

    /// Include test files in the coverage calculation.
    #[arg(long = "tests", overrides_with = "no_tests")]
    pub tests: bool,

    /// Exclude test files from the coverage calculation (default).
    #[arg(long = "no-tests", overrides_with = "tests")]
    pub no_tests: bool,

    /// Regular expression; matching file paths are left out.
    #[arg(short = 'x', long, value_name = "REGEX")]
    pub exclude_path: Option<String>,

    /// Rule used to recognise test files.
    #[arg(long, value_enum, default_value_t)]
    pub test_policy: TestPolicy,

    /// Exit with code 1 when coverage dropped relative to `--base`.
    #[arg(long)]
    pub fail_on_negative_delta: bool,

    /// Warn when no coverage data was analyzed (default).
    #[arg(long = "warn-missing-tests", overrides_with = "no_warn_missing_tests")]
    pub warn_missing_tests: bool,

    /// Do not warn when no coverage data was analyzed.
    #[arg(long = "no-warn-missing-tests", overrides_with = "warn_missing_tests")]
    pub no_warn_missing_tests: bool,
}

impl Args {
    /// Resolve the aggregation settings. `cwd` supplies the default project
    /// name.
    pub fn aggregate_config(&self, cwd: &Path) -> AggregateConfig {
        AggregateConfig {
            metric: self.metric,
            include_dependencies: self.dependencies,
            include_tests: self.tests,
            exclude_pattern: self.exclude_path.clone(),
            project_name: self
                .project_name
                .clone()
                .unwrap_or_else(|| project_name_from_dir(cwd)),
            test_policy: self.test_policy,
        }
    }

    fn formatter(&self, config: &AggregateConfig) -> Box<dyn ReportFormatter> {
        match self.print_format {
            PrintFormat::Minimal => Box::new(MinimalFormatter),
            PrintFormat::Numeric => Box::new(NumericFormatter),
            PrintFormat::Json => Box::new(JsonFormatter),
            PrintFormat::Table => Box::new(TableFormatter {
                options: TableOptions {
                    include_dependencies: config.include_dependencies,
                    project_name: config.project_name.clone(),
                    sort_order: self.sort,
                    test_policy: config.test_policy,
                },
            }),
        }
    }
}

/// Result of a successful run.
#[derive(Debug)]
pub struct Outcome {
    /// Text for stdout.
    pub output: String,
    /// Whether the coverage requirements were met.
    pub passed: bool,
}

/// Load the report (and base), aggregate it and format the result.
pub fn run(args: &Args, cwd: &Path) -> Result<Outcome> {
    let config = args.aggregate_config(cwd);

    let report =
        ingest::load_report(&args.codecov_file).context("Failed to load coverage report")?;
    let base = args
        .base
        .as_deref()
        .map(|path| ingest::load_base(path).context("Failed to load base aggregate"))
        .transpose()?;

    let aggregate =
        Aggregate::new(&report, &config, base.as_ref()).context("Failed to aggregate coverage")?;

    if aggregate.total_count() == 0 && !args.no_warn_missing_tests {
        log::warn!(
            "No coverage was analyzed. Run this tool from the root of the target project or \
             pass --project-name with the exact name of its root folder; otherwise every file \
             may be filtered out as a dependency."
        );
    }

    let met_minimum = aggregate.overall_coverage_percent() >= f64::from(args.minimum);
    let decreased = args.fail_on_negative_delta && aggregate.coverage_decreased();

    let mut output = args.formatter(&config).format(&aggregate);

    if args.print_format == PrintFormat::Table {
        if !met_minimum {
            writeln!(
                output,
                "\nThe overall coverage did not meet the minimum threshold of {}%",
                args.minimum
            )
            .unwrap();
        }
        if decreased {
            writeln!(output, "\nThe overall coverage decreased relative to the base.").unwrap();
        }
    }

    Ok(Outcome {
        output,
        passed: met_minimum && !decreased,
    })
}

/// What to print on stdout when [`run`] fails. JSON consumers get an empty
/// object for a bad exclude pattern so they still receive parsable output.
pub fn error_output(format: PrintFormat, err: &anyhow::Error) -> Option<String> {
    let bad_pattern = matches!(
        err.downcast_ref::<CodecovError>(),
        Some(CodecovError::InvalidExcludePattern(_))
    );
    (format == PrintFormat::Json && bad_pattern).then(|| "{}\n".to_string())
}
