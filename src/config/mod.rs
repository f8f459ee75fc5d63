mod file_config;

pub use file_config::FileConfig;

use anyhow::{bail, Result};
use std::path::PathBuf;

/// Default glob selecting the song-catalog files under the input root.
pub const DEFAULT_SONG_GLOB: &str = "song_data/*/*/*/*.json";

/// Default glob selecting the activity-log files under the input root.
pub const DEFAULT_LOG_GLOB: &str = "log_data/*/*/*events.json";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub song_glob: Option<String>,
    pub log_glob: Option<String>,
}

/// Resolved pipeline configuration. Constructed once in `main` and passed
/// by parameter; the transformation core keeps no ambient state.
#[derive(Debug, Clone)]
pub struct EtlConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub song_glob: String,
    pub log_glob: String,
}

impl EtlConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let input_dir = file
            .input_dir
            .map(PathBuf::from)
            .or_else(|| cli.input_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("input_dir must be specified via the CLI or in the config file")
            })?;

        if !input_dir.exists() {
            bail!("Input directory does not exist: {:?}", input_dir);
        }
        if !input_dir.is_dir() {
            bail!("input_dir is not a directory: {:?}", input_dir);
        }

        let output_dir = file
            .output_dir
            .map(PathBuf::from)
            .or_else(|| cli.output_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("output_dir must be specified via the CLI or in the config file")
            })?;

        if output_dir.exists() && !output_dir.is_dir() {
            bail!("output_dir is not a directory: {:?}", output_dir);
        }

        let song_glob = file
            .song_glob
            .or_else(|| cli.song_glob.clone())
            .unwrap_or_else(|| DEFAULT_SONG_GLOB.to_string());

        let log_glob = file
            .log_glob
            .or_else(|| cli.log_glob.clone())
            .unwrap_or_else(|| DEFAULT_LOG_GLOB.to_string());

        Ok(Self {
            input_dir,
            output_dir,
            song_glob,
            log_glob,
        })
    }
}
