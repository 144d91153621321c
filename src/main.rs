//! CLI entry point for the SIR metrics tool.
//!
//! Provides subcommands for processing a single simulation CSV, running the
//! full topology batch, and printing region graphs.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use sir_metrics::{
    ingest::load_records,
    metrics::{derive_metrics, infected_correlation},
    output::{print_json, print_pretty, write_records, write_summary},
    peaks::extract_peaks,
    pipeline::{batch_index, run_batch},
    summary::reduce,
    topology::{self, Topology},
};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "sir_metrics")]
#[command(about = "Derives metrics and region graphs from SIR simulation output", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a single simulation CSV
    Process {
        /// Path to the simulation CSV
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// File to write the processed-record CSV to
        #[arg(short, long)]
        records_out: Option<PathBuf>,

        /// File to write the summary JSON to
        #[arg(short, long)]
        summary_out: Option<PathBuf>,

        /// Also print the infected correlation matrix between regions
        #[arg(long, default_value_t = false)]
        correlation: bool,
    },
    /// Process all four canned topologies from a data directory
    Batch {
        /// Directory containing resultados_<topology>.csv files
        #[arg(short, long, default_value = "data")]
        data_dir: PathBuf,

        /// Directory to write per-topology outputs and the batch index to
        #[arg(short, long, default_value = "out")]
        out_dir: PathBuf,
    },
    /// Build and print a region graph
    Graph {
        /// Canned topology identifier (isolated, ring, hub, complete)
        #[arg(short, long, conflicts_with = "neighbors")]
        topology: Option<Topology>,

        /// Neighbor-list file describing the network
        #[arg(short, long)]
        neighbors: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/sir_metrics.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("sir_metrics.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input,
            records_out,
            summary_out,
            correlation,
        } => {
            let store = load_records(&input)?;
            let records = derive_metrics(&store);
            let peaks = extract_peaks(&records);
            let summary = reduce(&records, &peaks);

            info!(
                rows = records.len(),
                regions = peaks.len(),
                "Input processed"
            );
            print_pretty(&summary);
            print_json(&summary)?;

            if correlation {
                let (regions, matrix) = infected_correlation(&records);
                print_json(&json!({ "regions": regions, "correlation": matrix }))?;
            }

            if let Some(path) = records_out {
                write_records(&path, &records)?;
            }
            if let Some(path) = summary_out {
                write_summary(&path, &summary)?;
            }
        }
        Commands::Batch { data_dir, out_dir } => {
            std::fs::create_dir_all(&out_dir)?;

            let results = run_batch(&data_dir);

            for (topology, result) in &results {
                let Ok(output) = result else { continue };

                let records_path = out_dir.join(format!("procesado_{topology}.csv"));
                write_records(&records_path, &output.records)?;

                let summary_path = out_dir.join(format!("resumen_{topology}.json"));
                write_summary(&summary_path, &output.summary)?;
            }

            let index = batch_index(&results);
            if index.processed.is_empty() {
                warn!("No topology produced output");
            }
            std::fs::write(
                out_dir.join("indice.json"),
                serde_json::to_string_pretty(&index)?,
            )?;

            info!(
                processed = index.processed.len(),
                skipped = index.skipped.len(),
                out_dir = %out_dir.display(),
                "Batch finished"
            );
        }
        Commands::Graph {
            topology: topo,
            neighbors,
        } => {
            let graph = match (topo, neighbors) {
                (_, Some(path)) => topology::from_neighbor_file(&path)?,
                (Some(topo), None) => topology::canned(topo),
                (None, None) => anyhow::bail!("specify --topology or --neighbors"),
            };

            print_json(&json!({
                "nodes": graph.nodes(),
                "edges": graph.edges(),
            }))?;
        }
    }

    Ok(())
}
