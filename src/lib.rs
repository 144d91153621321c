pub mod error;
pub mod ingest;
pub mod metrics;
pub mod output;
pub mod peaks;
pub mod pipeline;
pub mod style;
pub mod summary;
pub mod topology;
