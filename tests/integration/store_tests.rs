//! Integration tests for the knowledge store and its snapshots

use crate::common::json_store;
use gleaner::config::{parse_config, SnapshotFormat, StoreConfig};
use gleaner::storage::{document_id, Metadata, SqliteSnapshot, StorageError};
use gleaner::KnowledgeStore;
use serde_json::Value;
use std::collections::BTreeMap;
use tempfile::TempDir;

fn meta(pairs: &[(&str, Value)]) -> Metadata {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn populated(store: &mut KnowledgeStore, order: &[usize]) {
    let entries = [
        ("Tokio is an asynchronous runtime for Rust.", meta(&[("topic", Value::from("async"))])),
        ("Serde serializes Rust data structures.", meta(&[("topic", Value::from("serde"))])),
        (
            "Rusqlite wraps the SQLite C library.",
            meta(&[("topic", Value::from("db")), ("stars", Value::from(3))]),
        ),
    ];
    for &i in order {
        store.add(entries[i].0, entries[i].1.clone()).unwrap();
    }
}

#[test]
fn test_identical_content_identical_id() {
    let dir = TempDir::new().unwrap();
    let mut store = json_store(dir.path());

    let a = store.add("same words", Metadata::new()).unwrap();
    let b = store.add(String::from("same words"), meta(&[("x", Value::from(1))])).unwrap();

    assert_eq!(a.id, b.id);
    assert_eq!(a.id, document_id("same words"));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_retrieve_bounds_and_stability() {
    let dir = TempDir::new().unwrap();
    let mut store = json_store(dir.path());
    populated(&mut store, &[0, 1, 2]);

    let scored = store.retrieve_scored("rust sqlite library", 2);
    assert!(scored.len() <= 2);
    assert!(scored.iter().all(|s| s.score > 0.0));
    assert!(scored.windows(2).all(|w| w[0].score >= w[1].score));

    let first: Vec<String> = store.retrieve("rust sqlite library", 2).into_iter().map(|d| d.id).collect();
    for _ in 0..3 {
        let again: Vec<String> =
            store.retrieve("rust sqlite library", 2).into_iter().map(|d| d.id).collect();
        assert_eq!(first, again);
    }
}

#[test]
fn test_retrieve_on_empty_store_is_empty() {
    let dir = TempDir::new().unwrap();
    let store = json_store(dir.path());
    assert!(store.retrieve("anything at all", 3).is_empty());
}

#[test]
fn test_roundtrip_independent_of_insertion_order() {
    let dir_a = TempDir::new().unwrap();
    let dir_b = TempDir::new().unwrap();

    let mut forward = json_store(dir_a.path());
    populated(&mut forward, &[0, 1, 2]);
    forward.save().unwrap();

    let mut backward = json_store(dir_b.path());
    populated(&mut backward, &[2, 1, 0]);
    backward.save().unwrap();

    let mut loaded_a = json_store(dir_a.path());
    loaded_a.load().unwrap();
    let mut loaded_b = json_store(dir_b.path());
    loaded_b.load().unwrap();

    let as_map = |store: &KnowledgeStore| -> BTreeMap<String, (String, Metadata)> {
        store
            .documents()
            .iter()
            .map(|d| (d.id.clone(), (d.content.clone(), d.metadata.clone())))
            .collect()
    };

    assert_eq!(as_map(&loaded_a), as_map(&forward));
    assert_eq!(as_map(&loaded_b), as_map(&backward));
    assert_eq!(as_map(&loaded_a), as_map(&loaded_b));
}

#[test]
fn test_load_nonexistent_location_is_empty() {
    let dir = TempDir::new().unwrap();
    let mut store = json_store(&dir.path().join("missing-dir"));
    store.load().unwrap();
    assert!(store.is_empty());
}

#[test]
fn test_load_structurally_invalid_snapshot() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("kb.json"),
        r#"{"documents": [{"content": "no id here"}]}"#,
    )
    .unwrap();

    let mut store = json_store(dir.path());
    assert!(matches!(store.load(), Err(StorageError::Format(_))));
}

#[test]
fn test_sqlite_backend_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("kb.sqlite");

    let mut store = KnowledgeStore::new(Box::new(SqliteSnapshot::new(&path)));
    populated(&mut store, &[1, 0, 2]);
    store.save().unwrap();

    let mut reloaded = KnowledgeStore::new(Box::new(SqliteSnapshot::new(&path)));
    reloaded.load().unwrap();
    assert_eq!(reloaded.documents(), store.documents());
}

#[test]
fn test_store_opened_from_config() {
    let dir = TempDir::new().unwrap();
    let config_text = format!(
        "[store]\npath = {:?}\nformat = \"sqlite\"\n",
        dir.path().join("kb.db").display().to_string()
    );
    let config = parse_config(&config_text).unwrap();
    assert_eq!(config.store.format, SnapshotFormat::Sqlite);

    let mut store = KnowledgeStore::open(&config.store).unwrap();
    populated(&mut store, &[0]);
    store.save().unwrap();

    let reopened = KnowledgeStore::open(&StoreConfig {
        path: config.store.path.clone(),
        format: SnapshotFormat::Sqlite,
    })
    .unwrap();
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.statistics().documents, 1);
}
