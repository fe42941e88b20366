//! Pre-fetched archive snapshots.

use std::path::{Path, PathBuf};

use adreach_types::AdreachError;
use thiserror::Error;
use tracing::debug;

use crate::{DecodeError, Page, decode_page};

/// Errors that can occur while loading a snapshot file.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// The file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    ReadFile {
        /// Snapshot path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not a page.
    #[error("Failed to parse {}: {source}", path.display())]
    ParseJson {
        /// Snapshot path.
        path: PathBuf,
        /// The decoding failure.
        source: DecodeError,
    },
}

impl From<SnapshotError> for AdreachError {
    fn from(err: SnapshotError) -> Self {
        match err {
            SnapshotError::ReadFile { source, .. } => Self::Io(source),
            other @ SnapshotError::ParseJson { .. } => Self::Decode(other.to_string()),
        }
    }
}

/// Loads a `{"data": [...]}` snapshot into memory.
///
/// The snapshot's `paging` object, if any, is decoded but not followed.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a page.
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Page, SnapshotError> {
    let path = path.as_ref();
    let body = std::fs::read(path).map_err(|source| SnapshotError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let page = decode_page(&body).map_err(|source| SnapshotError::ParseJson {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), records = page.len(), "snapshot loaded");
    Ok(page)
}
