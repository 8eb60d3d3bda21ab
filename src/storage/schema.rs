//! Database schema for the SQLite snapshot backend

/// Current snapshot schema version, recorded in `snapshot_meta`
pub const SCHEMA_VERSION: u32 = 1;

/// SQL schema for the snapshot database
pub const SCHEMA_SQL: &str = r#"
-- Snapshot-level facts (schema version, save time)
CREATE TABLE IF NOT EXISTS snapshot_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- Ordered document list; position preserves insertion order
CREATE TABLE IF NOT EXISTS documents (
    position INTEGER PRIMARY KEY,
    id TEXT NOT NULL UNIQUE,
    content TEXT NOT NULL,
    metadata TEXT NOT NULL,
    embedding TEXT
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

/// Checks whether the documents table exists
pub fn has_documents_table(conn: &rusqlite::Connection) -> Result<bool, rusqlite::Error> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'documents'",
        [],
        |row| row.get(0),
    )?;
    Ok(count == 1)
}
