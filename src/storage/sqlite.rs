//! SQLite snapshot backend
//!
//! This module stores the document list in a SQLite database, one row per
//! document, ordered by insertion position.

use crate::storage::document::validate_snapshot;
use crate::storage::schema::{has_documents_table, initialize_schema, SCHEMA_VERSION};
use crate::storage::traits::{SnapshotBackend, StorageError, StorageResult};
use crate::storage::{Document, Metadata};
use chrono::Utc;
use rusqlite::{params, Connection, ErrorCode, OpenFlags};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Snapshot stored in a SQLite database file
#[derive(Debug, Clone)]
pub struct SqliteSnapshot {
    path: PathBuf,
}

impl SqliteSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Opens the database for writing, creating it and its schema if needed
    fn open_for_write(&self) -> StorageResult<Connection> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&self.path).map_err(classify)?;
        conn.execute_batch("PRAGMA synchronous = NORMAL;")
            .map_err(classify)?;
        initialize_schema(&conn).map_err(classify)?;
        Ok(conn)
    }
}

/// Maps SQLite failures onto the storage taxonomy
///
/// A file that is not a database is a format error; a file that cannot be
/// opened or read is an I/O error.
fn classify(e: rusqlite::Error) -> StorageError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _) => match err.code {
            ErrorCode::NotADatabase => StorageError::Format(e.to_string()),
            ErrorCode::CannotOpen | ErrorCode::SystemIoFailure | ErrorCode::PermissionDenied => {
                StorageError::Io(io::Error::new(io::ErrorKind::Other, e))
            }
            _ => StorageError::Database(e),
        },
        _ => StorageError::Database(e),
    }
}

impl SnapshotBackend for SqliteSnapshot {
    fn save(&self, documents: &[Document]) -> StorageResult<()> {
        let mut conn = self.open_for_write()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM documents", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO documents (position, id, content, metadata, embedding)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;

            for (position, doc) in documents.iter().enumerate() {
                let metadata = serde_json::to_string(&doc.metadata)
                    .map_err(|e| StorageError::Serialization(e.to_string()))?;
                let embedding = doc
                    .embedding
                    .as_ref()
                    .map(serde_json::to_string)
                    .transpose()
                    .map_err(|e| StorageError::Serialization(e.to_string()))?;

                stmt.execute(params![
                    position as i64,
                    doc.id,
                    doc.content,
                    metadata,
                    embedding
                ])?;
            }
        }

        tx.execute(
            "INSERT OR REPLACE INTO snapshot_meta (key, value) VALUES ('version', ?1), ('saved_at', ?2)",
            params![SCHEMA_VERSION.to_string(), Utc::now().to_rfc3339()],
        )?;
        tx.commit()?;

        tracing::debug!(
            "Saved {} documents to {}",
            documents.len(),
            self.path.display()
        );
        Ok(())
    }

    fn load(&self) -> StorageResult<Vec<Document>> {
        if !self.path.exists() {
            tracing::debug!("No snapshot at {}; starting empty", self.path.display());
            return Ok(Vec::new());
        }

        let conn = Connection::open_with_flags(&self.path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(classify)?;

        if !has_documents_table(&conn).map_err(classify)? {
            return Err(StorageError::Format(format!(
                "{} has no documents table",
                self.path.display()
            )));
        }

        let mut stmt = conn
            .prepare("SELECT id, content, metadata, embedding FROM documents ORDER BY position")
            .map_err(classify)?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            })
            .map_err(classify)?;

        let mut documents = Vec::new();
        for row in rows {
            let (id, content, metadata, embedding) = row.map_err(classify)?;

            let metadata: Metadata = serde_json::from_str(&metadata)
                .map_err(|e| StorageError::Format(format!("metadata of {}: {}", id, e)))?;
            let embedding = embedding
                .map(|e| serde_json::from_str::<Vec<f64>>(&e))
                .transpose()
                .map_err(|e| StorageError::Format(format!("embedding of {}: {}", id, e)))?;

            documents.push(Document {
                id,
                content,
                metadata,
                embedding,
            });
        }

        validate_snapshot(&documents)?;
        Ok(documents)
    }

    fn location(&self) -> &Path {
        &self.path
    }
}
