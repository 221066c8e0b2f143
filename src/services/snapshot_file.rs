//! Flat-file persistence for the result cache.
//!
//! The whole cache is written after every batch as a single JSON object,
//! symbol -> signal. Writes go to a temp file first and are renamed over
//! the target, so a crash mid-write leaves the previous snapshot intact.

use crate::types::Signal;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::{debug, warn};

pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the previous snapshot, if a readable one exists. Corrupt or
    /// missing files are a warning, never an error: the cache simply starts
    /// from pending placeholders.
    pub fn load(&self) -> Option<BTreeMap<String, Signal>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Failed to read snapshot {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(map) => Some(map),
            Err(e) => {
                warn!("Failed to parse snapshot {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// Overwrite the snapshot atomically.
    pub fn store(&self, entries: &BTreeMap<String, Signal>) -> io::Result<()> {
        let json = serde_json::to_string(entries)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        debug!("Persisted {} entries to {}", entries.len(), self.path.display());
        Ok(())
    }
}
