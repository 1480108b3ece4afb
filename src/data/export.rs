use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::Record;

/// Write `records` as CSV with the upstream header (`date/time,lat,lon,base`).
/// Timestamps are written as ISO-8601 text, which the loader accepts.
pub fn write_csv<'a, W: Write>(writer: W, records: impl IntoIterator<Item = &'a Record>) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut written = 0;
    for record in records {
        csv_writer
            .serialize(record)
            .with_context(|| format!("writing row {written}"))?;
        written += 1;
    }
    csv_writer.flush().context("flushing CSV")?;
    Ok(written)
}

/// Export to a file path chosen from the File menu.
pub fn export_file<'a>(path: &Path, records: impl IntoIterator<Item = &'a Record>) -> Result<usize> {
    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let written = write_csv(file, records)?;
    log::info!("Exported {written} records to {}", path.display());
    Ok(written)
}
