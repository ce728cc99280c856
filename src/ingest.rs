use std::path::Path;

use crate::aggregate::Aggregate;
use crate::error::{CodecovError, Result};
use crate::model::Report;

/// Decode a coverage report from raw JSON bytes.
pub fn parse_report(content: &[u8]) -> serde_json::Result<Report> {
    serde_json::from_slice(content)
}

/// Decode a previously serialized aggregate from raw JSON bytes.
pub fn parse_aggregate(content: &[u8]) -> serde_json::Result<Aggregate> {
    serde_json::from_slice(content)
}

/// Read and decode the coverage report at `path`.
pub fn load_report(path: &Path) -> Result<Report> {
    let content = read(path)?;
    let report = parse_report(&content).map_err(|source| CodecovError::FileDecode {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!(
        "loaded {} run(s) from {}",
        report.runs.len(),
        path.display()
    );
    Ok(report)
}

/// Read and decode a base aggregate written by an earlier `--print-format json` run.
pub fn load_base(path: &Path) -> Result<Aggregate> {
    let content = read(path)?;
    let base = parse_aggregate(&content).map_err(|source| CodecovError::FileDecode {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!(
        "loaded base aggregate of {} files ({}) from {}",
        base.coverage_per_file().len(),
        base.covered_property(),
        path.display()
    );
    Ok(base)
}

fn read(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| CodecovError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}
