//! JSON snapshot backend
//!
//! The snapshot is written to a temporary file in the target directory,
//! synced, then renamed over the target. Readers see the old file or the new
//! one, never a truncated mix.

use crate::storage::traits::{CrawlState, Snapshot, StateStore, StorageResult};
use chrono::Utc;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Snapshot backend storing one JSON document
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

impl StateStore for JsonStateStore {
    fn load(&self) -> StorageResult<Option<Snapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)?;
        let snapshot = serde_json::from_str(&contents)?;
        Ok(Some(snapshot))
    }

    fn save(&mut self, state: &CrawlState, scope_hash: &str) -> StorageResult<()> {
        let snapshot = Snapshot {
            saved_at: Utc::now(),
            scope_hash: scope_hash.to_string(),
            state: state.clone(),
        };

        let dir = self.parent_dir();
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, &snapshot)?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)?;

        tracing::debug!(
            "Saved snapshot to {}: {} visited, {} pending",
            self.path.display(),
            state.visited.len(),
            state.pending.len()
        );
        Ok(())
    }

    fn clear(&mut self) -> StorageResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
