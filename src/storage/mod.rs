//! Storage module for the knowledge store
//!
//! This module handles document storage and persistence, including:
//! - Content-addressed documents and their metadata
//! - The in-memory knowledge store with keyword retrieval
//! - Whole-collection snapshots in JSON or SQLite

mod document;
mod json;
mod knowledge;
mod schema;
mod sqlite;
mod traits;

pub use document::{document_id, Document, Metadata};
pub use json::JsonSnapshot;
pub use knowledge::{backend_for, KnowledgeStore, StoreStatistics};
pub use sqlite::SqliteSnapshot;
pub use traits::{SnapshotBackend, StorageError, StorageResult};
