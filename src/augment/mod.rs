//! Prompt augmentation from retrieved context
//!
//! The composer turns a query into a prompt for an external text-generation
//! service. It never calls a model itself.

use crate::storage::{Document, KnowledgeStore, Metadata};
use serde::Serialize;

const PREAMBLE: &str = "Based on the following context from the knowledge base:";
const CLOSING: &str = "Please provide a response informed by the context above.";
const CLOSING_WITHOUT_CONTEXT: &str = "Please provide a response to the query above.";

/// Identifying details of a document used as context
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedDocument {
    pub id: String,
    pub metadata: Metadata,
    pub content: String,
}

impl From<&Document> for RetrievedDocument {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            metadata: doc.metadata.clone(),
            content: doc.content.clone(),
        }
    }
}

/// Prompt plus the context that went into it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationResult {
    pub query: String,
    pub augmented_prompt: String,
    pub retrieved_documents: Vec<RetrievedDocument>,
    pub num_retrieved: usize,
}

/// Builds augmented prompts from a knowledge store
pub struct AugmentationComposer<'a> {
    store: &'a KnowledgeStore,
}

impl<'a> AugmentationComposer<'a> {
    pub fn new(store: &'a KnowledgeStore) -> Self {
        Self { store }
    }

    /// Builds a prompt for `query` from up to `top_k` relevant documents
    ///
    /// # Format
    ///
    /// ```text
    /// Based on the following context from the knowledge base:
    ///
    /// [Context 1]
    /// <document content>
    ///
    /// Query: <query>
    ///
    /// Please provide a response informed by the context above.
    /// ```
    ///
    /// With no relevant documents the context section is omitted entirely
    /// and the prompt is just the query and a closing instruction.
    pub fn augment(&self, query: &str, top_k: usize) -> String {
        let documents = self.store.retrieve(query, top_k);
        compose_prompt(query, &documents)
    }

    /// Builds the prompt and reports which documents were used
    pub fn generate(&self, query: &str, top_k: usize) -> GenerationResult {
        let documents = self.store.retrieve(query, top_k);
        let augmented_prompt = compose_prompt(query, &documents);

        tracing::debug!(
            "Composed prompt for {:?} from {} documents",
            query,
            documents.len()
        );

        GenerationResult {
            query: query.to_string(),
            augmented_prompt,
            num_retrieved: documents.len(),
            retrieved_documents: documents.iter().map(RetrievedDocument::from).collect(),
        }
    }
}

/// Assembles the prompt text from a query and ranked documents
pub fn compose_prompt(query: &str, documents: &[Document]) -> String {
    if documents.is_empty() {
        return format!("Query: {}\n\n{}", query, CLOSING_WITHOUT_CONTEXT);
    }

    let mut prompt = String::new();
    prompt.push_str(PREAMBLE);
    prompt.push_str("\n\n");

    for (i, doc) in documents.iter().enumerate() {
        prompt.push_str(&format!("[Context {}]\n{}\n\n", i + 1, doc.content));
    }

    prompt.push_str(&format!("Query: {}\n\n{}", query, CLOSING));
    prompt
}
