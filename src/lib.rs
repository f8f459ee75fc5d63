//! Songmart ETL Library
//!
//! Converts a raw song catalog and a stream of user-activity event logs
//! into a star schema: the `songs`, `artists`, `users` and `time`
//! dimensions plus the `songplays` fact table.

pub mod config;
pub mod pipeline;
pub mod records;
pub mod sink;
pub mod source;
pub mod transform;

// Re-export commonly used types for convenience
pub use config::{CliConfig, EtlConfig, FileConfig};
pub use pipeline::{run_pipeline, EtlStats};
pub use sink::{JsonLinesSink, TableSink};
pub use source::{JsonLinesSource, RecordSource};
