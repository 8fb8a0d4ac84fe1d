//! Primary table CRUD tests.

use std::collections::BTreeMap;

use slugdb::{Database, Item, Value};

fn db() -> Database {
    Database::in_memory().expect("failed to create db")
}

// ============================================================================
// Put / Get
// ============================================================================

#[test]
fn test_put_then_get_returns_attributes_with_keys() {
    let db = db();
    let attributes = Item::new().with("name", "Alice").with("age", 30i64);

    let stored = db.put_item("user#1", "profile", attributes.clone()).expect("put failed");
    let expected = attributes.with_keys("user#1", "profile");

    assert_eq!(stored, expected);
    assert_eq!(db.get_item("user#1", "profile").expect("get failed"), Some(expected));
}

#[test]
fn test_get_never_written_is_none() {
    let db = db();
    assert_eq!(db.get_item("user#1", "profile").expect("get failed"), None);

    db.put_item("user#1", "profile", Item::new()).expect("put failed");
    assert_eq!(db.get_item("user#1", "settings").expect("get failed"), None);
    assert_eq!(db.get_item("user#2", "profile").expect("get failed"), None);
}

#[test]
fn test_put_replaces_whole_item() {
    let db = db();
    db.put_item("p1", "a", Item::new().with("x", 1i64).with("y", 2i64)).expect("put failed");
    db.put_item("p1", "a", Item::new().with("x", 10i64)).expect("put failed");

    let item = db.get_item("p1", "a").expect("get failed").expect("item missing");
    assert_eq!(item.get("x"), Some(&Value::Int(10)));
    assert_eq!(item.get("y"), None);
}

#[test]
fn test_keys_override_attributes() {
    let db = db();
    let attributes = Item::new().with("pk", "other").with("sk", 99i64);

    let stored = db.put_item("p1", "a", attributes).expect("put failed");
    assert_eq!(stored.pk(), Some(&Value::from("p1")));
    assert_eq!(stored.sk(), Some(&Value::from("a")));
}

#[test]
fn test_put_accepts_attribute_map() {
    let db = db();
    let mut attributes = BTreeMap::new();
    attributes.insert("color".to_owned(), Value::from("red"));

    let stored = db.put_item("p1", "a", attributes).expect("put failed");
    assert_eq!(stored.get("color"), Some(&Value::from("red")));
    assert_eq!(stored.len(), 3);
}

#[test]
fn test_non_string_keys() {
    let db = db();
    db.put_item(42i64, 1.5f64, Item::new().with("v", true)).expect("put failed");
    db.put_item(Value::symbol("tag"), vec![Value::from(1i64), Value::from("x")], Item::new())
        .expect("put failed");

    let item = db.get_item(42i64, 1.5f64).expect("get failed").expect("item missing");
    assert_eq!(item.get("v"), Some(&Value::Bool(true)));

    // Int and Float keys are distinct
    assert_eq!(db.get_item(42.0f64, 1.5f64).expect("get failed"), None);
    // Symbol and String keys are distinct
    assert!(db
        .get_item("tag", vec![Value::from(1i64), Value::from("x")])
        .expect("get failed")
        .is_none());
    assert!(db
        .get_item(Value::symbol("tag"), vec![Value::from(1i64), Value::from("x")])
        .expect("get failed")
        .is_some());
}

#[test]
fn test_nested_attributes_round_trip() {
    let db = db();
    let mut address = BTreeMap::new();
    address.insert("city".to_owned(), Value::from("Paris"));
    let attributes = Item::new()
        .with("address", address)
        .with("tags", vec![Value::from("a"), Value::from("b")])
        .with("blob", vec![0u8, 255])
        .with("nothing", Value::Null);

    let stored = db.put_item("p1", "a", attributes).expect("put failed");
    assert_eq!(db.get_item("p1", "a").expect("get failed"), Some(stored));
}

// ============================================================================
// Delete
// ============================================================================

#[test]
fn test_delete_returns_snapshot() {
    let db = db();
    let stored = db.put_item("p1", "a", Item::new().with("x", 1i64)).expect("put failed");

    assert_eq!(db.delete_item("p1", "a").expect("delete failed"), Some(stored));
    assert_eq!(db.get_item("p1", "a").expect("get failed"), None);
}

#[test]
fn test_delete_absent_is_none() {
    let db = db();
    assert_eq!(db.delete_item("p1", "a").expect("delete failed"), None);

    db.put_item("p1", "a", Item::new()).expect("put failed");
    assert_eq!(db.delete_item("p1", "b").expect("delete failed"), None);
    assert!(db.get_item("p1", "a").expect("get failed").is_some());
}

#[test]
fn test_round_trip_put_get_delete_get() {
    let db = db();
    let stored = db.put_item("p1", "a", Item::new().with("n", 1i64)).expect("put failed");

    assert_eq!(db.get_item("p1", "a").expect("get failed"), Some(stored.clone()));
    assert_eq!(db.delete_item("p1", "a").expect("delete failed"), Some(stored));
    assert_eq!(db.get_item("p1", "a").expect("get failed"), None);
    assert_eq!(db.delete_item("p1", "a").expect("delete failed"), None);
}

// ============================================================================
// Partitions
// ============================================================================

#[test]
fn test_list_partitions_in_value_order() {
    let db = db();
    assert!(db.list_partitions().expect("list failed").is_empty());

    db.put_item("p2", "a", Item::new()).expect("put failed");
    db.put_item("p1", "a", Item::new()).expect("put failed");
    db.put_item("p1", "b", Item::new()).expect("put failed");

    assert_eq!(
        db.list_partitions().expect("list failed"),
        vec![Value::from("p1"), Value::from("p2")]
    );
}

#[test]
fn test_deleting_last_sort_key_removes_partition() {
    let db = db();
    db.put_item("p1", "a", Item::new()).expect("put failed");
    db.put_item("p1", "b", Item::new()).expect("put failed");
    db.put_item("p2", "a", Item::new()).expect("put failed");

    db.delete_item("p1", "a").expect("delete failed");
    assert_eq!(
        db.list_partitions().expect("list failed"),
        vec![Value::from("p1"), Value::from("p2")]
    );

    db.delete_item("p1", "b").expect("delete failed");
    assert_eq!(db.list_partitions().expect("list failed"), vec![Value::from("p2")]);
}
