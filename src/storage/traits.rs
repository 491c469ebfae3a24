//! Storage traits and error types
//!
//! This module defines the trait interface for snapshot backends and the
//! persisted crawl-state types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to replace snapshot file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("Corrupt snapshot: {0}")]
    Corrupt(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Point-in-time crawl state: what was visited and what was still pending
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlState {
    /// URLs whose fetch has completed
    pub visited: Vec<String>,
    /// Queued URLs in frontier order
    pub pending: Vec<String>,
}

impl CrawlState {
    pub fn is_empty(&self) -> bool {
        self.visited.is_empty() && self.pending.is_empty()
    }
}

/// A saved [`CrawlState`] plus the metadata written alongside it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub saved_at: DateTime<Utc>,
    /// Fingerprint of the scope rules in force when the snapshot was taken
    pub scope_hash: String,
    #[serde(flatten)]
    pub state: CrawlState,
}

/// Trait for snapshot backends
///
/// Implementations must never expose a partially written snapshot: a
/// concurrent or later `load` sees either the previous snapshot or the new
/// one in full.
pub trait StateStore: Send {
    /// Reads the most recent snapshot, or None if nothing was saved yet
    fn load(&self) -> StorageResult<Option<Snapshot>>;

    /// Replaces the stored snapshot
    fn save(&mut self, state: &CrawlState, scope_hash: &str) -> StorageResult<()>;

    /// Discards any stored snapshot
    fn clear(&mut self) -> StorageResult<()>;
}
