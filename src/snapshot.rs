//! Point-in-time copy of a live history store. The browser may be
//! writing to its own store at any moment, so queries only ever touch a
//! private copy. The copy is deleted when the `Snapshot` goes out of
//! scope, on success and failure paths alike.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{HistoryError, Result};

#[derive(Debug)]
pub struct Snapshot {
    path: PathBuf,
}

impl Snapshot {
    /// Copy the live store at `source` into `temp_dir`.
    pub fn acquire(source: &Path, temp_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(temp_dir)?;
        // Per-process name so a stale file from a crashed run never
        // blocks acquisition.
        let path = temp_dir.join(format!("bhq_history_{}", std::process::id()));
        std::fs::copy(source, &path).map_err(|source_err| HistoryError::SourceUnavailable {
            path: source.to_path_buf(),
            source: source_err,
        })?;
        debug!("acquired snapshot {} from {}", path.display(), source.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Snapshot {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_file(&self.path) {
            warn!("could not remove snapshot {}: {err}", self.path.display());
        }
    }
}
