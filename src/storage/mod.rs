//! Storage module for persisting crawl snapshots
//!
//! This module handles saving and restoring the frontier between runs:
//! - The `StateStore` trait and the persisted `CrawlState`
//! - A SQLite backend (transactional replace)
//! - A JSON backend (temp file plus atomic rename)

mod json;
mod schema;
mod sqlite;
mod traits;

pub use json::JsonStateStore;
pub use sqlite::SqliteStateStore;
pub use traits::{CrawlState, Snapshot, StateStore, StorageError, StorageResult};

use crate::config::StateFormat;
use std::path::Path;

/// Opens the snapshot store for the configured format
///
/// # Arguments
///
/// * `path` - Path to the snapshot file
/// * `format` - Which backend owns the file
///
/// # Returns
///
/// * `Ok(Box<dyn StateStore>)` - Opened store (no snapshot is read yet)
/// * `Err(StorageError)` - Failed to open the backing file
pub fn open_state_store(path: &Path, format: StateFormat) -> StorageResult<Box<dyn StateStore>> {
    match format {
        StateFormat::Sqlite => Ok(Box::new(SqliteStateStore::new(path)?)),
        StateFormat::Json => Ok(Box::new(JsonStateStore::new(path))),
    }
}
