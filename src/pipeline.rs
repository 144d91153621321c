//! Per-topology pipeline run and the batch driver.
//!
//! Topologies are processed one at a time in a fixed order. A failure on one
//! topology (missing file, malformed data) is returned as that topology's
//! result; the batch continues with the rest. No state crosses iterations.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::PipelineError;
use crate::ingest::load_records;
use crate::metrics::{ProcessedRecord, derive_metrics};
use crate::peaks::{PeakRecord, extract_peaks};
use crate::summary::{SummaryReport, reduce};
use crate::topology::{RegionGraph, Topology, canned};

/// Everything derived for one topology, handed to the rendering collaborator.
#[derive(Debug)]
pub struct TopologyOutput {
    pub topology: Topology,
    pub records: Vec<ProcessedRecord>,
    pub peaks: Vec<PeakRecord>,
    pub summary: SummaryReport,
    pub graph: RegionGraph,
}

/// File the simulator writes for a topology, relative to the data directory.
pub fn input_file(data_dir: &Path, topology: Topology) -> std::path::PathBuf {
    data_dir.join(format!("resultados_{}.csv", topology.id()))
}

/// Runs the full pipeline for one topology: ingest, derive, extract peaks,
/// reduce, and build the canned region graph.
pub fn run_topology(topology: Topology, data_dir: &Path) -> Result<TopologyOutput, PipelineError> {
    let path = input_file(data_dir, topology);
    let store = load_records(&path)?;

    let records = derive_metrics(&store);
    let peaks = extract_peaks(&records);
    let summary = reduce(&records, &peaks);
    let graph = canned(topology);

    info!(
        topology = %topology,
        rows = records.len(),
        regions = peaks.len(),
        r0 = summary.r0_efectivo,
        "Topology processed"
    );

    Ok(TopologyOutput {
        topology,
        records,
        peaks,
        summary,
        graph,
    })
}

/// Runs every canned topology against `data_dir`, one result per topology.
///
/// Failures are isolated: a missing or malformed input yields an `Err` entry
/// for that topology and the batch moves on.
pub fn run_batch(data_dir: &Path) -> Vec<(Topology, Result<TopologyOutput, PipelineError>)> {
    Topology::ALL
        .into_iter()
        .map(|topology| {
            let result = run_topology(topology, data_dir);
            if let Err(e) = &result {
                warn!(topology = %topology, error = %e, "Skipping topology");
            }
            (topology, result)
        })
        .collect()
}

/// Index entry for one completed topology run.
#[derive(Debug, Serialize)]
pub struct BatchIndexEntry {
    pub topology: Topology,
    pub regions: usize,
    pub summary: SummaryReport,
}

/// Top-level index of a batch run, written alongside per-topology outputs.
#[derive(Debug, Serialize)]
pub struct BatchIndex {
    pub generated_at: DateTime<Utc>,
    pub processed: Vec<BatchIndexEntry>,
    pub skipped: Vec<String>,
}

/// Folds batch results into a serializable index.
pub fn batch_index(results: &[(Topology, Result<TopologyOutput, PipelineError>)]) -> BatchIndex {
    let mut processed = Vec::new();
    let mut skipped = Vec::new();

    for (topology, result) in results {
        match result {
            Ok(output) => processed.push(BatchIndexEntry {
                topology: *topology,
                regions: output.peaks.len(),
                summary: output.summary.clone(),
            }),
            Err(_) => skipped.push(topology.id().to_string()),
        }
    }

    BatchIndex {
        generated_at: Utc::now(),
        processed,
        skipped,
    }
}
