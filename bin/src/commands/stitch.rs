//! Stitch command implementation.

use crate::display::write_interchange;
use anyhow::{Context, Result};
use qhp_lib::prelude::*;
use std::path::Path;

/// Stitch a directory of per-contract files into one output file.
pub(crate) fn stitch_files(
    input_dir: &Path,
    output: &Path,
    stitch_delta: i64,
    ticker: Option<&str>,
    quiet: bool,
) -> Result<()> {
    let stitched = stitch_directory(input_dir, &CsvReader::new(), stitch_delta, ticker)
        .with_context(|| format!("Failed to stitch {}", input_dir.display()))?;

    if !quiet {
        for path in &stitched.files {
            println!("Read {}", path.display());
        }
    }

    write_interchange(&stitched.series, output)?;
    if !quiet {
        println!(
            "Written {} bars to {}",
            stitched.series.len(),
            output.display()
        );
    }
    Ok(())
}
