//! JSON-lines replay files: one [`MapSnapshot`] per non-blank line.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::snapshot::MapSnapshot;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read replay '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("replay line {line} is invalid at '{path}': {message}")]
    Parse {
        line: usize,
        path: String,
        message: String,
    },
}

/// Parses replay text. Line numbers in errors are 1-based.
pub fn parse_replay(raw: &str) -> Result<Vec<MapSnapshot>, ReplayError> {
    let mut snapshots = Vec::new();
    for (index, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let mut deserializer = serde_json::Deserializer::from_str(line);
        match serde_path_to_error::deserialize::<_, MapSnapshot>(&mut deserializer) {
            Ok(snapshot) => snapshots.push(snapshot),
            Err(error) => {
                let path = error.path().to_string();
                return Err(ReplayError::Parse {
                    line: index + 1,
                    path,
                    message: error.into_inner().to_string(),
                });
            }
        }
    }
    Ok(snapshots)
}

pub fn load_replay(path: &Path) -> Result<Vec<MapSnapshot>, ReplayError> {
    let raw = fs::read_to_string(path).map_err(|source| ReplayError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshots = parse_replay(&raw)?;
    info!(
        path = %path.display(),
        snapshots = snapshots.len(),
        "replay_loaded"
    );
    Ok(snapshots)
}
