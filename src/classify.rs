//! Path predicates used while filtering a report: dependency paths, test
//! files and user-supplied exclusions.

use std::path::Path;

use clap::ValueEnum;
use regex::Regex;

use crate::error::Result;

/// Marker for sources compiled out of SwiftPM's build directory
/// (checked-out packages, generated code).
pub const BUILD_ARTIFACT_MARKER: &str = ".build/";

/// True when `path` belongs to code outside the project under test.
///
/// A path is local if it contains `project_name`. With an empty project name
/// every path is local. Anything under the build directory is always a
/// dependency.
pub fn is_dependency_path(path: &str, project_name: &str) -> bool {
    let outside_project = !project_name.is_empty() && !path.contains(project_name);
    outside_project || path.contains(BUILD_ARTIFACT_MARKER)
}

/// The default project name: the last component of `dir`, usually the
/// working directory.
pub fn project_name_from_dir(dir: &Path) -> String {
    dir.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string()
}

/// A compiled exclusion regex.
#[derive(Debug, Clone)]
pub struct ExcludePattern(Regex);

impl ExcludePattern {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self(Regex::new(pattern)?))
    }

    /// Compile an optional pattern. `None` and the empty string both mean
    /// "exclude nothing".
    pub fn from_option(pattern: Option<&str>) -> Result<Option<Self>> {
        match pattern {
            Some(p) if !p.is_empty() => Self::new(p).map(Some),
            _ => Ok(None),
        }
    }
}

/// True iff a pattern is configured and matches somewhere in `path`.
pub fn is_excluded_path(path: &str, pattern: Option<&ExcludePattern>) -> bool {
    pattern.is_some_and(|p| p.0.is_match(path))
}

/// Rule deciding which files are tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TestPolicy {
    /// Any path containing "test", case-insensitively.
    #[default]
    Substring,
    /// Paths inside a `Tests/` folder whose file name ends in `Tests.swift`.
    Strict,
}

const TESTS_FOLDER_MARKER: &str = "Tests/";
const TESTS_FILE_MARKER: &str = "Tests.swift";

impl TestPolicy {
    pub fn is_test_path(&self, path: &str) -> bool {
        match self {
            TestPolicy::Substring => path.to_lowercase().contains("test"),
            TestPolicy::Strict => {
                path.contains(TESTS_FOLDER_MARKER) && path.ends_with(TESTS_FILE_MARKER)
            }
        }
    }
}
