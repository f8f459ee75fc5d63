//! Input collaborator: bulk-reads JSON-lines files selected by a glob
//! pattern into typed records.
//!
//! The pattern is matched against paths relative to the source root, so
//! `song_data/*/*/*/*.json` selects the usual three-level catalog layout.
//! Any line that is not a valid record aborts the read; there is no
//! partial-success mode.

use rayon::prelude::*;
use regex::Regex;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

/// Errors that can occur while reading input records.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid glob pattern \"{pattern}\": {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Malformed record at {path}:{line}: {source}")]
    Malformed {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// A bulk reader that yields every record matched by a file-glob pattern.
pub trait RecordSource {
    fn read<T: DeserializeOwned + Send>(&self, pattern: &str) -> Result<Vec<T>, SourceError>;
}

/// Reads JSON-lines files from a local directory tree.
pub struct JsonLinesSource {
    root: PathBuf,
}

impl JsonLinesSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Collect the files under the root whose relative path matches the
    /// pattern, in a stable order.
    fn matching_files(&self, pattern: &str) -> Result<Vec<PathBuf>, SourceError> {
        let regex = glob_to_regex(pattern)?;
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = match entry.path().strip_prefix(&self.root) {
                Ok(p) => p,
                Err(_) => continue,
            };
            if regex.is_match(&path_to_slashes(relative)) {
                files.push(entry.path().to_path_buf());
            }
        }
        Ok(files)
    }
}

impl RecordSource for JsonLinesSource {
    fn read<T: DeserializeOwned + Send>(&self, pattern: &str) -> Result<Vec<T>, SourceError> {
        let files = self.matching_files(pattern)?;
        debug!("Pattern \"{}\" matched {} files", pattern, files.len());

        let per_file: Vec<Vec<T>> = files
            .par_iter()
            .map(|path| parse_file(path))
            .collect::<Result<_, _>>()?;

        Ok(per_file.into_iter().flatten().collect())
    }
}

/// Parse one file: one JSON record per non-empty line.
fn parse_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, SourceError> {
    let content = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut records = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record = serde_json::from_str(line).map_err(|source| SourceError::Malformed {
            path: path.to_path_buf(),
            line: index + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Translate a file-glob into an anchored regex over slash-separated
/// relative paths: `*` matches within one path segment, `?` matches one
/// character, `**` crosses segments.
fn glob_to_regex(pattern: &str) -> Result<Regex, SourceError> {
    let mut expr = String::with_capacity(pattern.len() * 2 + 2);
    expr.push('^');
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    if chars.peek() == Some(&'/') {
                        // "**/" spans zero or more whole segments.
                        chars.next();
                        expr.push_str("(?:[^/]*/)*");
                    } else {
                        expr.push_str(".*");
                    }
                } else {
                    expr.push_str("[^/]*");
                }
            }
            '?' => expr.push_str("[^/]"),
            other => {
                if regex_syntax_char(other) {
                    expr.push('\\');
                }
                expr.push(other);
            }
        }
    }
    expr.push('$');
    Regex::new(&expr).map_err(|source| SourceError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

fn regex_syntax_char(c: char) -> bool {
    matches!(
        c,
        '.' | '+' | '(' | ')' | '[' | ']' | '{' | '}' | '^' | '$' | '|' | '\\'
    )
}

fn path_to_slashes(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
