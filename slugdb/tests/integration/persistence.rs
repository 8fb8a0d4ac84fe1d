//! Persistence tests.
//!
//! Data, index schemas and index entries written through one handle must be
//! visible after the database file is reopened.

use slugdb::{Database, DatabaseBuilder, Durability, Item, Value};
use tempfile::TempDir;

fn temp_path(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("test.slug")
}

#[test]
fn test_items_survive_reopen() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = temp_path(&dir);

    let stored = {
        let db = Database::open(&path).expect("failed to open db");
        db.put_item("p1", "a", Item::new().with("n", 1i64)).expect("put failed");
        let stored = db.put_item("p1", "b", Item::new().with("n", 2i64)).expect("put failed");
        db.delete_item("p1", "a").expect("delete failed");
        stored
    };

    let db = Database::open(&path).expect("failed to reopen db");
    assert_eq!(db.get_item("p1", "b").expect("get failed"), Some(stored));
    assert_eq!(db.get_item("p1", "a").expect("get failed"), None);
    assert_eq!(db.list_partitions().expect("list failed"), vec![Value::from("p1")]);
}

#[test]
fn test_indexes_survive_reopen() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = temp_path(&dir);

    {
        let db = Database::open(&path).expect("failed to open db");
        db.add_index("byColor", "color", "sk").expect("add_index failed");
        db.put_item("p1", "a", Item::new().with("color", "red")).expect("put failed");
    }

    let db = Database::open(&path).expect("failed to reopen db");
    let registry = db.list_indexes().expect("list failed");
    assert!(registry.contains_key("byColor"));

    // Maintenance continues against the reopened registry
    db.put_item("p2", "a", Item::new().with("color", "red")).expect("put failed");
    let items = db.query("red").index("byColor").execute().expect("query failed");
    assert_eq!(items.len(), 2);
}

#[test]
fn test_eventual_durability_flush() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = temp_path(&dir);

    {
        let db = DatabaseBuilder::new()
            .path(&path)
            .durability(Durability::Eventual)
            .open()
            .expect("failed to open db");
        assert_eq!(db.config().durability, Durability::Eventual);

        db.put_item("p1", "a", Item::new()).expect("put failed");
        db.flush().expect("flush failed");
    }

    let db = Database::open(&path).expect("failed to reopen db");
    assert!(db.get_item("p1", "a").expect("get failed").is_some());
}

#[test]
fn test_builder_with_cache_size() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let db = Database::builder()
        .path(temp_path(&dir))
        .cache_size(4 * 1024 * 1024)
        .open()
        .expect("failed to open db");

    assert_eq!(db.config().cache_size, Some(4 * 1024 * 1024));
    assert!(!db.config().in_memory);
}

#[test]
fn test_builder_without_path_fails() {
    let err = DatabaseBuilder::new().open().err().expect("open should fail");
    assert!(matches!(err, slugdb::Error::Config(_)));
}
