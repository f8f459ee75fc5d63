//! Output collaborator: persists a table as JSON-lines files under the
//! output root, optionally partitioned into `column=value` subdirectories.
//!
//! Writes are whole-table with overwrite semantics: any previous contents
//! of the table directory are removed first, so a restarted run converges
//! to the same layout.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while writing output tables.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Table {table} rows must be JSON objects")]
    NotAnObject { table: String },

    #[error("Failed to serialize row for table {table}: {source}")]
    Serialize {
        table: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Directory segment used for rows whose partition column is null.
const NULL_PARTITION: &str = "__null__";

/// Name of the data file inside each (partition) directory.
const PART_FILE: &str = "part.jsonl";

/// A bulk writer that persists one table per call, replacing previous
/// contents at the destination.
pub trait TableSink {
    fn write_table(
        &self,
        table: &str,
        rows: &[Value],
        partition_by: &[&str],
    ) -> Result<(), SinkError>;
}

/// Writes tables as JSON-lines files on the local filesystem.
pub struct JsonLinesSink {
    root: PathBuf,
}

impl JsonLinesSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TableSink for JsonLinesSink {
    fn write_table(
        &self,
        table: &str,
        rows: &[Value],
        partition_by: &[&str],
    ) -> Result<(), SinkError> {
        let table_dir = self.root.join(table);
        if table_dir.exists() {
            fs::remove_dir_all(&table_dir).map_err(|source| SinkError::Io {
                path: table_dir.clone(),
                source,
            })?;
        }
        fs::create_dir_all(&table_dir).map_err(|source| SinkError::Io {
            path: table_dir.clone(),
            source,
        })?;

        // Group rows by partition values; BTreeMap keeps directory creation
        // deterministic across runs.
        let mut groups: BTreeMap<Vec<String>, Vec<&Map<String, Value>>> = BTreeMap::new();
        for row in rows {
            let object = row.as_object().ok_or_else(|| SinkError::NotAnObject {
                table: table.to_string(),
            })?;
            let key = partition_by
                .iter()
                .map(|column| partition_segment(object.get(*column)))
                .collect();
            groups.entry(key).or_default().push(object);
        }

        for (key, group) in &groups {
            let mut dir = table_dir.clone();
            for (column, value) in partition_by.iter().zip(key) {
                dir = dir.join(format!("{}={}", column, value));
            }
            fs::create_dir_all(&dir).map_err(|source| SinkError::Io {
                path: dir.clone(),
                source,
            })?;

            let path = dir.join(PART_FILE);
            let file = File::create(&path).map_err(|source| SinkError::Io {
                path: path.clone(),
                source,
            })?;
            let mut writer = BufWriter::new(file);
            for row in group {
                // Partition columns are encoded in the path, not the row.
                let mut object = (*row).clone();
                for column in partition_by {
                    object.remove(*column);
                }
                let line =
                    serde_json::to_string(&Value::Object(object)).map_err(|source| {
                        SinkError::Serialize {
                            table: table.to_string(),
                            source,
                        }
                    })?;
                writeln!(writer, "{}", line).map_err(|source| SinkError::Io {
                    path: path.clone(),
                    source,
                })?;
            }
            writer.flush().map_err(|source| SinkError::Io {
                path: path.clone(),
                source,
            })?;
        }

        debug!(
            "Wrote table {} ({} rows, {} partition dirs)",
            table,
            rows.len(),
            groups.len().max(1)
        );
        Ok(())
    }
}

/// Render one partition value as a path segment.
fn partition_segment(value: Option<&Value>) -> String {
    let raw = match value {
        None | Some(Value::Null) => return NULL_PARTITION.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    // Values land in directory names; keep them path-safe.
    raw.chars()
        .map(|c| if std::path::is_separator(c) { '_' } else { c })
        .collect()
}
