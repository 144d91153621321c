//! Error kinds for the metrics pipeline.
//!
//! Ingestion and graph-construction failures are recoverable at the batch
//! level: the driver records the error for that topology and moves on.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The designated input file does not exist.
    #[error("input file not found: {path}")]
    MissingSource { path: PathBuf },

    /// The input CSV header lacks one of the required columns.
    #[error("missing required column: {column}")]
    MissingColumn { column: &'static str },

    /// A neighbor-list line is missing header fields or has a bad token.
    #[error("malformed neighbor line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    /// A peak was requested for a region with no records.
    #[error("region {region} has no records")]
    EmptyGroup { region: u32 },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
