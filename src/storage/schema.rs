//! Database schema definitions
//!
//! This module contains the SQL schema for the SQLite snapshot backend.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Single-row metadata for the current snapshot
CREATE TABLE IF NOT EXISTS snapshot_meta (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    saved_at TEXT NOT NULL,
    scope_hash TEXT NOT NULL,
    schema_version INTEGER NOT NULL
);

-- URLs whose fetch has completed
CREATE TABLE IF NOT EXISTS visited (
    url TEXT PRIMARY KEY
);

-- Queued URLs, in frontier order
CREATE TABLE IF NOT EXISTS pending (
    position INTEGER PRIMARY KEY,
    url TEXT NOT NULL
);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Gets the current schema version
pub fn get_schema_version() -> u32 {
    1
}
