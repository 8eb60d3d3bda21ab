//! Storage traits and error types
//!
//! This module defines the trait interface for snapshot backends and
//! associated error types.

use crate::storage::Document;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    /// Rejected input, such as empty document content
    #[error("Validation error: {0}")]
    Validation(String),

    /// Snapshot could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot is structurally invalid
    #[error("Invalid snapshot format: {0}")]
    Format(String),

    #[error("SQLite error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for snapshot persistence backends
///
/// A snapshot is the complete ordered document list. Saving overwrites the
/// previous snapshot; there is no append log.
pub trait SnapshotBackend: Send + Sync {
    /// Writes `documents` as the new snapshot
    fn save(&self, documents: &[Document]) -> StorageResult<()>;

    /// Reads the snapshot
    ///
    /// # Returns
    ///
    /// * `Ok(documents)` - The stored documents in order (empty if no snapshot exists)
    /// * `Err(StorageError::Io)` - The snapshot exists but cannot be read
    /// * `Err(StorageError::Format)` - The snapshot is corrupt or incomplete
    fn load(&self) -> StorageResult<Vec<Document>>;

    /// Location of the snapshot
    fn location(&self) -> &Path;
}
