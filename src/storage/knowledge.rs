use crate::config::{SnapshotFormat, StoreConfig};
use crate::retrieval::{KeywordRanker, Ranker, ScoredDocument};
use crate::storage::json::JsonSnapshot;
use crate::storage::sqlite::SqliteSnapshot;
use crate::storage::traits::{SnapshotBackend, StorageError, StorageResult};
use crate::storage::{Document, Metadata};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use url::Url;

/// Summary figures for a knowledge store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreStatistics {
    pub documents: usize,
    /// Sum of content lengths, in characters
    pub total_characters: usize,
    /// Distinct hosts among the documents' `url` metadata
    pub distinct_hosts: usize,
}

/// Content-addressed document collection with keyword retrieval
///
/// Documents keep their insertion order. Adding content that is already
/// stored returns the existing document and leaves its metadata untouched.
///
/// The store has a single writer; callers sharing it between tasks must
/// serialize `add` calls themselves (for example behind a `Mutex`).
pub struct KnowledgeStore {
    documents: Vec<Document>,
    index: HashMap<String, usize>,
    backend: Box<dyn SnapshotBackend>,
    ranker: Box<dyn Ranker>,
}

impl KnowledgeStore {
    /// Creates an empty store persisted through `backend`
    pub fn new(backend: Box<dyn SnapshotBackend>) -> Self {
        Self {
            documents: Vec::new(),
            index: HashMap::new(),
            backend,
            ranker: Box::new(KeywordRanker),
        }
    }

    /// Opens the store described by `config` and loads its snapshot
    ///
    /// A missing snapshot yields an empty store.
    pub fn open(config: &StoreConfig) -> StorageResult<Self> {
        let mut store = Self::new(backend_for(config.format, &config.path));
        store.load()?;
        Ok(store)
    }

    /// Replaces the ranking strategy
    pub fn with_ranker(mut self, ranker: Box<dyn Ranker>) -> Self {
        self.ranker = ranker;
        self
    }

    /// Adds a document built from `content` and `metadata`
    ///
    /// # Returns
    ///
    /// * `Ok(Document)` - The new document, or the existing one with the same content
    /// * `Err(StorageError::Validation)` - The content is empty or whitespace
    pub fn add(&mut self, content: impl Into<String>, metadata: Metadata) -> StorageResult<Document> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(StorageError::Validation(
                "document content must not be empty".to_string(),
            ));
        }

        let doc = Document::new(content, metadata);
        if let Some(&position) = self.index.get(&doc.id) {
            tracing::debug!("Document {} already stored", doc.id);
            return Ok(self.documents[position].clone());
        }

        self.index.insert(doc.id.clone(), self.documents.len());
        self.documents.push(doc.clone());
        Ok(doc)
    }

    /// Adds several documents in order
    ///
    /// Stops at the first invalid entry; documents added before it remain.
    pub fn add_many<I, S>(&mut self, entries: I) -> StorageResult<Vec<Document>>
    where
        I: IntoIterator<Item = (S, Metadata)>,
        S: Into<String>,
    {
        entries
            .into_iter()
            .map(|(content, metadata)| self.add(content, metadata))
            .collect()
    }

    /// Returns up to `top_k` documents relevant to `query`, best first
    ///
    /// Never fails: an empty store or a query with no matches yields an
    /// empty list.
    pub fn retrieve(&self, query: &str, top_k: usize) -> Vec<Document> {
        self.retrieve_scored(query, top_k)
            .into_iter()
            .map(|scored| scored.document.clone())
            .collect()
    }

    /// Like [`retrieve`](Self::retrieve) but keeps the relevance scores
    pub fn retrieve_scored(&self, query: &str, top_k: usize) -> Vec<ScoredDocument<'_>> {
        self.ranker.rank(&self.documents, query, top_k)
    }

    /// Writes the whole collection to the snapshot, replacing the old one
    pub fn save(&self) -> StorageResult<()> {
        self.backend.save(&self.documents)?;
        tracing::info!(
            "Saved {} documents to {}",
            self.documents.len(),
            self.backend.location().display()
        );
        Ok(())
    }

    /// Replaces the in-memory collection with the snapshot contents
    ///
    /// On error the current contents are left unchanged.
    pub fn load(&mut self) -> StorageResult<()> {
        let documents = self.backend.load()?;

        self.index = documents
            .iter()
            .enumerate()
            .map(|(position, doc)| (doc.id.clone(), position))
            .collect();
        self.documents = documents;

        tracing::info!(
            "Loaded {} documents from {}",
            self.documents.len(),
            self.backend.location().display()
        );
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.index.get(id).map(|&position| &self.documents[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All documents in insertion order
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Removes every document from memory (the snapshot is untouched)
    pub fn clear(&mut self) {
        self.documents.clear();
        self.index.clear();
    }

    /// Snapshot location
    pub fn location(&self) -> &Path {
        self.backend.location()
    }

    pub fn statistics(&self) -> StoreStatistics {
        let hosts: HashSet<String> = self
            .documents
            .iter()
            .filter_map(|doc| doc.url())
            .filter_map(|url| Url::parse(url).ok())
            .filter_map(|url| url.host_str().map(str::to_lowercase))
            .collect();

        StoreStatistics {
            documents: self.documents.len(),
            total_characters: self.documents.iter().map(|d| d.content.chars().count()).sum(),
            distinct_hosts: hosts.len(),
        }
    }
}

/// Builds the snapshot backend for a configured format
pub fn backend_for(format: SnapshotFormat, path: &Path) -> Box<dyn SnapshotBackend> {
    match format {
        SnapshotFormat::Json => Box::new(JsonSnapshot::new(path)),
        SnapshotFormat::Sqlite => Box::new(SqliteSnapshot::new(path)),
    }
}
