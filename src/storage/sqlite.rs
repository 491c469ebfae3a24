//! SQLite snapshot backend
//!
//! This module provides a SQLite-based implementation of the StateStore trait.
//! Every save replaces the whole snapshot inside one transaction.

use crate::storage::schema::{get_schema_version, initialize_schema};
use crate::storage::traits::{CrawlState, Snapshot, StateStore, StorageError, StorageResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite snapshot backend
pub struct SqliteStateStore {
    conn: Connection,
}

impl SqliteStateStore {
    /// Opens or creates the snapshot database
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = FULL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn load_urls(&self, sql: &str) -> StorageResult<Vec<String>> {
        let mut stmt = self.conn.prepare(sql)?;
        let urls = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(urls)
    }
}

impl StateStore for SqliteStateStore {
    fn load(&self) -> StorageResult<Option<Snapshot>> {
        let meta = self
            .conn
            .query_row(
                "SELECT saved_at, scope_hash FROM snapshot_meta WHERE id = 1",
                [],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        let Some((saved_at, scope_hash)) = meta else {
            return Ok(None);
        };

        let saved_at = DateTime::parse_from_rfc3339(&saved_at)
            .map_err(|e| StorageError::Corrupt(format!("bad saved_at '{}': {}", saved_at, e)))?
            .with_timezone(&Utc);

        let visited = self.load_urls("SELECT url FROM visited ORDER BY url")?;
        let pending = self.load_urls("SELECT url FROM pending ORDER BY position")?;

        Ok(Some(Snapshot {
            saved_at,
            scope_hash,
            state: CrawlState { visited, pending },
        }))
    }

    fn save(&mut self, state: &CrawlState, scope_hash: &str) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM visited", [])?;
        tx.execute("DELETE FROM pending", [])?;
        tx.execute(
            "INSERT OR REPLACE INTO snapshot_meta (id, saved_at, scope_hash, schema_version)
             VALUES (1, ?1, ?2, ?3)",
            params![now, scope_hash, get_schema_version()],
        )?;

        {
            let mut insert_visited = tx.prepare("INSERT OR IGNORE INTO visited (url) VALUES (?1)")?;
            for url in &state.visited {
                insert_visited.execute(params![url])?;
            }

            let mut insert_pending =
                tx.prepare("INSERT INTO pending (position, url) VALUES (?1, ?2)")?;
            for (position, url) in state.pending.iter().enumerate() {
                insert_pending.execute(params![position as i64, url])?;
            }
        }

        tx.commit()?;

        tracing::debug!(
            "Saved snapshot: {} visited, {} pending",
            state.visited.len(),
            state.pending.len()
        );
        Ok(())
    }

    fn clear(&mut self) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM snapshot_meta", [])?;
        tx.execute("DELETE FROM visited", [])?;
        tx.execute("DELETE FROM pending", [])?;
        tx.commit()?;
        Ok(())
    }
}
