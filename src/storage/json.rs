//! JSON snapshot backend
//!
//! The snapshot is a single pretty-printed JSON object:
//!
//! ```json
//! {
//!   "version": 1,
//!   "saved_at": "2024-01-01T00:00:00+00:00",
//!   "documents": [
//!     {"id": "...", "content": "...", "metadata": {"url": "..."}}
//!   ]
//! }
//! ```

use crate::storage::document::validate_snapshot;
use crate::storage::traits::{SnapshotBackend, StorageError, StorageResult};
use crate::storage::Document;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const SNAPSHOT_VERSION: u32 = 1;

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    saved_at: Option<String>,
    documents: Vec<Document>,
}

/// Snapshot stored as a JSON file
#[derive(Debug, Clone)]
pub struct JsonSnapshot {
    path: PathBuf,
}

impl JsonSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Sibling file the snapshot is written to before being renamed into place
    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

impl SnapshotBackend for JsonSnapshot {
    fn save(&self, documents: &[Document]) -> StorageResult<()> {
        let snapshot = SnapshotFile {
            version: SNAPSHOT_VERSION,
            saved_at: Some(Utc::now().to_rfc3339()),
            documents: documents.to_vec(),
        };
        let bytes = serde_json::to_vec_pretty(&snapshot)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.temp_path();
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;

        tracing::debug!(
            "Saved {} documents to {}",
            documents.len(),
            self.path.display()
        );
        Ok(())
    }

    fn load(&self) -> StorageResult<Vec<Document>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No snapshot at {}; starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let snapshot: SnapshotFile =
            serde_json::from_slice(&bytes).map_err(|e| StorageError::Format(e.to_string()))?;

        if snapshot.version > SNAPSHOT_VERSION {
            return Err(StorageError::Format(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }

        validate_snapshot(&snapshot.documents)?;
        Ok(snapshot.documents)
    }

    fn location(&self) -> &Path {
        &self.path
    }
}
