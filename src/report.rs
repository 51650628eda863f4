//! JSON report of the assets injected by one run.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::asset::PreparedAsset;
use crate::copy::CopyStats;

#[derive(Debug, Serialize)]
struct AssetReport<'a> {
    assets: &'a [PreparedAsset],
    totals: CopyStats,
}

/// Write `prepared` and summed counters to `path` as pretty JSON.
///
/// Missing parent directories are created. The report is staged next to
/// `path` and renamed over it.
pub fn write_report(path: &Path, prepared: &[PreparedAsset]) -> Result<()> {
    let report = AssetReport {
        assets: prepared,
        totals: totals(prepared),
    };
    let payload = serde_json::to_vec_pretty(&report).context("serializing asset report")?;

    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating report directory '{}'", dir.display()))?;
    }
    let staged = path.with_extension("json.partial");
    fs::write(&staged, payload)
        .with_context(|| format!("writing asset report '{}'", staged.display()))?;
    fs::rename(&staged, path)
        .with_context(|| format!("moving asset report into place at '{}'", path.display()))
}

/// Sum of the copy counters across `prepared`.
pub fn totals(prepared: &[PreparedAsset]) -> CopyStats {
    let mut totals = CopyStats::default();
    for asset in prepared {
        totals.merge(&asset.stats);
    }
    totals
}
