use anyhow::{Context, Result};
use clap::Parser;
use songmart_etl::config::{CliConfig, EtlConfig, FileConfig};
use songmart_etl::pipeline::run_pipeline;
use songmart_etl::sink::JsonLinesSink;
use songmart_etl::source::JsonLinesSource;
use std::{fmt::Debug, path::PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(name = "songmart-etl")]
#[command(about = "Build the song-play star schema from raw catalog and activity-log files")]
struct CliArgs {
    /// Root directory containing the raw song_data/ and log_data/ trees.
    #[clap(value_parser = parse_path)]
    pub input_dir: Option<PathBuf>,

    /// Directory to write the output tables into.
    #[clap(value_parser = parse_path)]
    pub output_dir: Option<PathBuf>,

    /// Optional TOML config file; its values override the CLI.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Glob selecting the song-catalog files, relative to the input root.
    #[clap(long)]
    pub song_glob: Option<String>,

    /// Glob selecting the activity-log files, relative to the input root.
    #[clap(long)]
    pub log_glob: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = CliArgs::parse();

    let file_config = match &args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let cli = CliConfig {
        input_dir: args.input_dir,
        output_dir: args.output_dir,
        song_glob: args.song_glob,
        log_glob: args.log_glob,
    };
    let config = EtlConfig::resolve(&cli, file_config)?;

    info!("Songmart ETL v{}", env!("CARGO_PKG_VERSION"));
    info!("Input: {:?}", config.input_dir);
    info!("Output: {:?}", config.output_dir);

    let source = JsonLinesSource::new(&config.input_dir);
    let sink = JsonLinesSink::new(&config.output_dir);

    let stats = run_pipeline(&config, &source, &sink)?;

    info!("");
    stats.log_summary();
    info!("");
    info!("Pipeline completed successfully!");

    Ok(())
}
