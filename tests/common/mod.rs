//! Common test infrastructure
//!
//! This module provides the fixtures and readers shared by the
//! end-to-end tests. Tests should only import from this module, not from
//! internal submodules.

mod constants;
mod fixtures;

// Public API - this is what tests import
pub use constants::*;
pub use fixtures::*;

use songmart_etl::config::{CliConfig, EtlConfig};
use songmart_etl::pipeline::{run_pipeline, EtlStats};
use songmart_etl::sink::JsonLinesSink;
use songmart_etl::source::JsonLinesSource;
use std::path::Path;

/// Run the full pipeline from an input root into an output root with
/// default globs.
pub fn run_etl(input_root: &Path, output_root: &Path) -> anyhow::Result<EtlStats> {
    let cli = CliConfig {
        input_dir: Some(input_root.to_path_buf()),
        output_dir: Some(output_root.to_path_buf()),
        ..Default::default()
    };
    let config = EtlConfig::resolve(&cli, None)?;
    let source = JsonLinesSource::new(&config.input_dir);
    let sink = JsonLinesSink::new(&config.output_dir);
    run_pipeline(&config, &source, &sink)
}
