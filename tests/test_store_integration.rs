//! Collection store integration: persistence and replacement semantics

use kurso::config::IndexConfig;
use kurso::store::{CollectionError, CollectionStore};
use tempfile::TempDir;

fn axis(dimension: usize, axis: usize) -> Vec<f32> {
    let mut v = vec![0.0; dimension];
    v[axis] = 1.0;
    v
}

#[test]
fn test_collection_survives_reopen() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("collections.db");

    {
        let store = CollectionStore::new(&db_path, IndexConfig::default()).unwrap();
        let chunks = vec!["week one".to_string(), "week two".to_string()];
        store
            .rebuild("syllabus", "test-model", &chunks, &[axis(4, 0), axis(4, 1)])
            .unwrap();
    }

    // A fresh handle sees the persisted data
    let store = CollectionStore::new(&db_path, IndexConfig::default()).unwrap();
    let info = store.info("syllabus").unwrap();
    assert_eq!(info.chunk_count, 2);
    assert_eq!(info.model, "test-model");

    let results = store.query("syllabus", &axis(4, 1), 1).unwrap();
    assert_eq!(results, vec!["week two".to_string()]);
}

#[test]
fn test_rebuild_across_handles_replaces() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("collections.db");

    let writer_a = CollectionStore::new(&db_path, IndexConfig::default()).unwrap();
    writer_a
        .rebuild(
            "syllabus",
            "test-model",
            &["first build".to_string()],
            &[axis(4, 0)],
        )
        .unwrap();

    let writer_b = CollectionStore::new(&db_path, IndexConfig::default()).unwrap();
    writer_b
        .rebuild(
            "syllabus",
            "test-model",
            &["second build".to_string()],
            &[axis(4, 0)],
        )
        .unwrap();

    // Only the second build's data remains queryable, through either handle
    let results = writer_a.query("syllabus", &axis(4, 0), 10).unwrap();
    assert_eq!(results, vec!["second build".to_string()]);
}

#[test]
fn test_collections_are_independent() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("collections.db");
    let store = CollectionStore::new(&db_path, IndexConfig::default()).unwrap();

    store
        .rebuild(
            "syllabus-a",
            "test-model",
            &["alpha".to_string()],
            &[axis(4, 0)],
        )
        .unwrap();
    store
        .rebuild(
            "syllabus-b",
            "test-model",
            &["beta".to_string()],
            &[axis(4, 0)],
        )
        .unwrap();

    assert_eq!(
        store.query("syllabus-a", &axis(4, 0), 5).unwrap(),
        vec!["alpha".to_string()]
    );
    assert_eq!(
        store.query("syllabus-b", &axis(4, 0), 5).unwrap(),
        vec!["beta".to_string()]
    );
}

#[test]
fn test_ranking_follows_distance() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("collections.db");
    let store = CollectionStore::new(&db_path, IndexConfig::default()).unwrap();

    let chunks = vec![
        "exactly on axis zero".to_string(),
        "exactly on axis one".to_string(),
        "between both axes".to_string(),
    ];
    let mut diagonal = vec![0.0; 4];
    diagonal[0] = 0.8;
    diagonal[1] = 0.6;

    store
        .rebuild(
            "syllabus",
            "test-model",
            &chunks,
            &[axis(4, 0), axis(4, 1), diagonal],
        )
        .unwrap();

    let results = store.query("syllabus", &axis(4, 0), 3).unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0], "exactly on axis zero");
    assert_eq!(results[1], "between both axes");
    assert_eq!(results[2], "exactly on axis one");
}

#[test]
fn test_unknown_collection_is_an_error() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("collections.db");
    let store = CollectionStore::new(&db_path, IndexConfig::default()).unwrap();

    let result = store.query("never-built", &axis(4, 0), 5);
    assert!(matches!(result, Err(CollectionError::NotFound(_))));
}
