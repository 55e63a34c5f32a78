//! On-disk registry snapshot.

use std::fs;
use std::path::{Path, PathBuf};

use surety_registry::RegistrySnapshot;

use crate::NodeError;

/// A single bincode snapshot file, replaced atomically on every save.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot, or `None` if no snapshot has been written yet.
    pub fn load(&self) -> Result<Option<RegistrySnapshot>, NodeError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        RegistrySnapshot::from_bytes(&bytes)
            .map(Some)
            .map_err(|e| NodeError::Snapshot(format!("{}: {e}", self.path.display())))
    }

    /// Write to a sibling temp file, then rename over the old snapshot.
    pub fn save(&self, snapshot: &RegistrySnapshot) -> Result<(), NodeError> {
        let bytes = snapshot
            .to_bytes()
            .map_err(|e| NodeError::Snapshot(e.to_string()))?;
        let tmp = self.path.with_extension("snapshot.tmp");
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &self.path)?;
        tracing::trace!(path = %self.path.display(), bytes = bytes.len(), "snapshot written");
        Ok(())
    }
}
