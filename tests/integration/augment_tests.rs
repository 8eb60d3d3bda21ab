//! Integration tests for prompt augmentation

use crate::common::json_store;
use gleaner::storage::Metadata;
use gleaner::AugmentationComposer;
use tempfile::TempDir;

#[test]
fn test_single_relevant_document_becomes_one_context_block() {
    let dir = TempDir::new().unwrap();
    let mut store = json_store(dir.path());
    store.add("X is a concept", Metadata::new()).unwrap();
    store
        .add("Bananas grow in tropical climates.", Metadata::new())
        .unwrap();
    store
        .add("Compilers translate source code.", Metadata::new())
        .unwrap();

    let prompt = AugmentationComposer::new(&store).augment("What is X?", 3);

    assert_eq!(prompt.matches("[Context").count(), 1);
    let context = prompt.find("[Context 1]\nX is a concept").unwrap();
    let query = prompt.find("Query: What is X?").unwrap();
    let closing = prompt
        .find("Please provide a response informed by the context above.")
        .unwrap();
    assert!(context < query && query < closing);
    assert!(!prompt.contains("Bananas"));
}

#[test]
fn test_empty_store_degrades_to_plain_query() {
    let dir = TempDir::new().unwrap();
    let store = json_store(dir.path());

    let result = AugmentationComposer::new(&store).generate("What is X?", 3);

    assert_eq!(result.num_retrieved, 0);
    assert!(result.retrieved_documents.is_empty());
    assert_eq!(
        result.augmented_prompt,
        "Query: What is X?\n\nPlease provide a response to the query above."
    );
}

#[test]
fn test_generate_lists_documents_in_rank_order() {
    let dir = TempDir::new().unwrap();
    let mut store = json_store(dir.path());
    store.add("ownership", Metadata::new()).unwrap();
    store
        .add("ownership and borrowing and ownership", Metadata::new())
        .unwrap();

    let result = AugmentationComposer::new(&store).generate("ownership borrowing", 3);

    assert_eq!(result.num_retrieved, 2);
    assert_eq!(
        result.retrieved_documents[0].content,
        "ownership and borrowing and ownership"
    );
    let first = result.augmented_prompt.find("[Context 1]\nownership and").unwrap();
    let second = result.augmented_prompt.find("[Context 2]\nownership\n").unwrap();
    assert!(first < second);
}
