//! Ingestion of simulator CSV output into typed records.
//!
//! Input files carry one row per (region, day) observation with the columns
//! `Region, Dia, S, I, R`. Missing numeric values are filled with zero before
//! any derived computation; a diagnostic reports how many were filled.

use std::fs::File;
use std::io;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::PipelineError;

/// One raw CSV row. All fields are optional so that null cells deserialize
/// instead of failing; the fill-to-zero step runs once here, at ingestion.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Region")]
    region: Option<u32>,
    #[serde(rename = "Dia")]
    day: Option<u32>,
    #[serde(rename = "S")]
    s: Option<f64>,
    #[serde(rename = "I")]
    i: Option<f64>,
    #[serde(rename = "R")]
    r: Option<f64>,
}

/// One observation: S/I/R counts for a region on a given day.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRecord {
    pub region: u32,
    pub day: u32,
    pub s: f64,
    pub i: f64,
    pub r: f64,
}

/// Typed storage for ingested rows. Day sequences per region are assumed
/// contiguous and non-decreasing in the input; this is not enforced.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<SimulationRecord>,
}

impl RecordStore {
    pub fn records(&self) -> &[SimulationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Region identifiers in ascending order, deduplicated.
    pub fn regions(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.records.iter().map(|r| r.region).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

/// Loads simulation records from a CSV file.
///
/// Returns [`PipelineError::MissingSource`] when the file does not exist so
/// the batch driver can skip that topology instead of aborting.
pub fn load_records(path: &Path) -> Result<RecordStore, PipelineError> {
    if !path.exists() {
        return Err(PipelineError::MissingSource {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path)?;
    let store = read_records(file)?;
    debug!(path = %path.display(), rows = store.len(), "Ingested simulation CSV");
    Ok(store)
}

/// Column names the input header must carry, case-sensitive.
const REQUIRED_COLUMNS: [&str; 5] = ["Region", "Dia", "S", "I", "R"];

/// Reads simulation records from any reader. The header must contain the
/// five required columns; beyond that, missing numeric cells are replaced
/// with 0 and counted, and ingestion itself never fails on them.
pub fn read_records<R: io::Read>(reader: R) -> Result<RecordStore, PipelineError> {
    let mut rdr = csv::Reader::from_reader(reader);

    let headers = rdr.headers()?;
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(PipelineError::MissingColumn { column });
        }
    }

    let mut records = Vec::new();
    let mut filled = 0usize;

    for result in rdr.deserialize() {
        let raw: RawRow = result?;

        let mut fill = |v: Option<f64>| {
            v.unwrap_or_else(|| {
                filled += 1;
                0.0
            })
        };

        let s = fill(raw.s);
        let i = fill(raw.i);
        let r = fill(raw.r);

        records.push(SimulationRecord {
            region: raw.region.unwrap_or_else(|| {
                filled += 1;
                0
            }),
            day: raw.day.unwrap_or_else(|| {
                filled += 1;
                0
            }),
            s,
            i,
            r,
        });
    }

    if filled > 0 {
        warn!(filled, "Input contained null values, filled with zeros");
    }

    Ok(RecordStore { records })
}
