use std::path::PathBuf;

use swift_test_codecov::aggregate::AggregateConfig;
use tempfile::TempDir;

pub const CODECOV: &str = include_str!("../fixtures/codecov.json");
pub const BASE: &str = include_str!("../fixtures/base.json");

/// Write `contents` into a fresh temporary directory, returning the dir
/// handle and file path. The caller must hold onto `TempDir` to keep the
/// file alive.
pub fn write_temp(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

/// Settings matching a run from the root of the fixture project.
pub fn project_config() -> AggregateConfig {
    AggregateConfig {
        project_name: "MyProj".to_string(),
        ..Default::default()
    }
}
