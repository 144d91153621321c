//! Output formatting and persistence for derived structures.
//!
//! Supports pretty-printing, JSON serialization, and CSV export of processed
//! records.

use anyhow::Result;
use tracing::{debug, info};

use crate::metrics::ProcessedRecord;
use crate::summary::SummaryReport;
use csv::WriterBuilder;
use std::fs::File;
use std::path::Path;

/// Logs a summary report using Rust's debug pretty-print format.
pub fn print_pretty(report: &SummaryReport) {
    debug!("{:#?}", report);
}

/// Logs a serializable value as pretty-printed JSON.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes processed records to a CSV file with a header row, replacing any
/// existing file.
pub fn write_records(path: &Path, records: &[ProcessedRecord]) -> Result<()> {
    debug!(path = %path.display(), rows = records.len(), "Writing processed records CSV");

    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes a summary report as pretty JSON, replacing any existing file.
pub fn write_summary(path: &Path, report: &SummaryReport) -> Result<()> {
    debug!(path = %path.display(), "Writing summary JSON");
    std::fs::write(path, serde_json::to_string_pretty(report)?)?;
    Ok(())
}
