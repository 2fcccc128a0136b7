//! Stitching series stored as interchange files.

use qhp_format::CsvReader;
use qhp_stitch::StitchPlan;
use qhp_types::{BarSeries, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Result of stitching a directory of per-contract files.
#[derive(Debug, Clone, PartialEq)]
pub struct StitchedFiles {
    /// The continuous series.
    pub series: BarSeries,
    /// Every file read, in name order.
    pub files: Vec<PathBuf>,
}

/// Reads every file in `dir` and stitches the series they hold.
///
/// Each file is one contract, named by the ticker in its first row. The
/// result is named `symbol`, or after the latest contract when `symbol` is
/// `None`. Subdirectories are ignored.
///
/// # Errors
///
/// Returns an error if the directory or any file cannot be read or parsed.
pub fn stitch_directory(
    dir: impl AsRef<Path>,
    reader: &CsvReader,
    stitch_delta_days: i64,
    symbol: Option<&str>,
) -> Result<StitchedFiles> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir.as_ref())? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();

    let mut contracts = Vec::with_capacity(files.len());
    for path in &files {
        let file = reader.read_path(path)?;
        debug!(path = %path.display(), ticker = ?file.ticker, bars = file.series.len(), "read file");
        contracts.push(file.series);
    }

    let plan = StitchPlan::build(contracts, stitch_delta_days);
    let name = match symbol {
        Some(symbol) => symbol.to_string(),
        None => plan
            .segments()
            .last()
            .map(|segment| segment.contract.clone())
            .unwrap_or_default(),
    };
    let series = plan.into_series(name);
    info!(files = files.len(), bars = series.len(), "stitched files");

    Ok(StitchedFiles { series, files })
}
