//! Per-file comparison of two coverage snapshots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CodecovError, Result};
use crate::model::{CoverageSummary, FileCoverages};

/// How a file's coverage relates to the base snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CoverageDelta {
    /// Present now, absent from the base. Carries the current coverage.
    FileAdded(CoverageSummary),
    /// Present in the base only.
    FileRemoved,
    /// Percentage moved. Carries `current - base`.
    Changed(CoverageSummary),
    /// Percentage identical. Counts may still differ, so the diff is kept.
    NoChange(CoverageSummary),
}

impl CoverageDelta {
    /// Classify `current` against an optional `base` entry for the same file.
    pub fn between(current: &CoverageSummary, base: Option<&CoverageSummary>) -> Result<Self> {
        let Some(base) = base else {
            return Ok(CoverageDelta::FileAdded(*current));
        };
        let diff = current
            .diff(base)
            .ok_or(CodecovError::CountOverflow("file coverage delta"))?;
        if diff.percent == 0.0 {
            Ok(CoverageDelta::NoChange(diff))
        } else {
            Ok(CoverageDelta::Changed(diff))
        }
    }

    pub fn is_removed(&self) -> bool {
        matches!(self, CoverageDelta::FileRemoved)
    }
}

/// Delta for every filename in `current` or `base`.
pub fn delta_per_file(
    current: &FileCoverages,
    base: &FileCoverages,
) -> Result<BTreeMap<String, CoverageDelta>> {
    let removed = base
        .keys()
        .filter(|name| !current.contains_key(*name))
        .map(|name| Ok((name.clone(), CoverageDelta::FileRemoved)));

    current
        .iter()
        .map(|(name, cov)| Ok((name.clone(), CoverageDelta::between(cov, base.get(name))?)))
        .chain(removed)
        .collect()
}
