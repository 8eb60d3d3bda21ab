use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashSet};

use crate::storage::traits::{StorageError, StorageResult};

/// Caller-defined document metadata (source URL, title, crawl time, ...)
pub type Metadata = BTreeMap<String, Value>;

/// Number of hex characters kept from the content digest
const ID_LENGTH: usize = 16;

/// A unit of stored text
///
/// The id is derived from the content, so two documents with identical
/// content always share an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f64>>,
}

impl Document {
    /// Creates a document, deriving its id from `content`
    pub fn new(content: impl Into<String>, metadata: Metadata) -> Self {
        let content = content.into();
        Self {
            id: document_id(&content),
            content,
            metadata,
            embedding: None,
        }
    }

    /// Source URL recorded in the metadata, if any
    pub fn url(&self) -> Option<&str> {
        self.metadata.get("url").and_then(Value::as_str)
    }

    /// Title recorded in the metadata, if any
    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").and_then(Value::as_str)
    }
}

/// Computes the content-derived document id
///
/// The id is the first 16 hex characters of the SHA-256 digest of the
/// UTF-8 content.
///
/// # Examples
///
/// ```
/// use gleaner::storage::document_id;
///
/// let id = document_id("hello");
/// assert_eq!(id, "2cf24dba5fb0a30e");
/// assert_eq!(id, document_id("hello"));
/// ```
pub fn document_id(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let mut id = hex::encode(hasher.finalize());
    id.truncate(ID_LENGTH);
    id
}

/// Checks a loaded snapshot for structural consistency
///
/// Every document must have non-blank content (the same rule `add`
/// applies), an id matching that content, and an id not used by an earlier
/// document.
pub(crate) fn validate_snapshot(documents: &[Document]) -> StorageResult<()> {
    let mut seen = HashSet::new();

    for (position, doc) in documents.iter().enumerate() {
        if doc.content.trim().is_empty() {
            return Err(StorageError::Format(format!(
                "document {} ({}) has empty content",
                position, doc.id
            )));
        }
        if doc.id != document_id(&doc.content) {
            return Err(StorageError::Format(format!(
                "document {} has id {} which does not match its content",
                position, doc.id
            )));
        }
        if !seen.insert(doc.id.as_str()) {
            return Err(StorageError::Format(format!(
                "duplicate document id {}",
                doc.id
            )));
        }
    }

    Ok(())
}
