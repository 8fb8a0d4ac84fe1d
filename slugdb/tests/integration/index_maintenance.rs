//! Index maintenance tests.
//!
//! Every write to the primary table must leave each registered index holding
//! exactly the items that carry both of its projected attributes.

use slugdb::{Database, Item, Value};

fn db_with_status_index() -> Database {
    let db = Database::in_memory().expect("failed to create db");
    db.add_index("byStatus", "status", "created").expect("add_index failed");
    db
}

fn order(status: &str, created: i64) -> Item {
    Item::new().with("status", status).with("created", created)
}

fn keys(items: &[Item]) -> Vec<(Value, Value)> {
    items
        .iter()
        .map(|item| {
            let pk = item.pk().cloned().expect("indexed item without pk");
            let sk = item.sk().cloned().expect("indexed item without sk");
            (pk, sk)
        })
        .collect()
}

fn by_status(db: &Database, status: &str) -> Vec<Item> {
    db.query(status).index("byStatus").execute().expect("query failed")
}

// ============================================================================
// Registry
// ============================================================================

#[test]
fn test_add_index_registers_schema() {
    let db = db_with_status_index();
    db.add_index("byOwner", "owner", "sk").expect("add_index failed");

    let registry = db.list_indexes().expect("list failed");
    assert_eq!(registry.len(), 2);
    assert_eq!(registry["byStatus"].partition_attr, "status");
    assert_eq!(registry["byStatus"].sort_attr, "created");
    assert_eq!(registry["byOwner"].partition_attr, "owner");
}

#[test]
fn test_add_index_indexes_existing_items() {
    let db = Database::in_memory().expect("failed to create db");
    db.put_item("u1", "o1", order("open", 3)).expect("put failed");
    db.put_item("u2", "o1", order("open", 1)).expect("put failed");
    db.put_item("u2", "o2", order("closed", 2)).expect("put failed");

    db.add_index("byStatus", "status", "created").expect("add_index failed");

    let open = by_status(&db, "open");
    assert_eq!(
        keys(&open),
        vec![(Value::from("u2"), Value::from("o1")), (Value::from("u1"), Value::from("o1"))]
    );
    assert_eq!(by_status(&db, "closed").len(), 1);
}

#[test]
fn test_redefining_index_discards_old_entries() {
    let db = db_with_status_index();
    db.put_item("u1", "o1", order("open", 1).with("region", "eu")).expect("put failed");
    db.put_item("u2", "o1", order("open", 2)).expect("put failed");

    let schema = db.add_index("byStatus", "region", "created").expect("add_index failed");
    assert_eq!(schema.partition_attr, "region");

    assert!(by_status(&db, "open").is_empty());
    assert_eq!(keys(&by_status(&db, "eu")), vec![(Value::from("u1"), Value::from("o1"))]);
}

// ============================================================================
// Writes
// ============================================================================

#[test]
fn test_put_indexes_item() {
    let db = db_with_status_index();
    let stored = db.put_item("u1", "o1", order("open", 1)).expect("put failed");

    assert_eq!(by_status(&db, "open"), vec![stored]);
}

#[test]
fn test_items_missing_projected_attribute_are_not_indexed() {
    let db = db_with_status_index();
    db.put_item("u1", "o1", Item::new().with("status", "open")).expect("put failed");
    db.put_item("u1", "o2", Item::new().with("created", 1i64)).expect("put failed");

    assert!(by_status(&db, "open").is_empty());
}

#[test]
fn test_overwrite_moves_index_entry() {
    let db = db_with_status_index();
    db.put_item("u1", "o1", order("open", 1)).expect("put failed");
    let shipped = db.put_item("u1", "o1", order("shipped", 1)).expect("put failed");

    assert!(by_status(&db, "open").is_empty());
    assert_eq!(by_status(&db, "shipped"), vec![shipped]);
}

#[test]
fn test_overwrite_refreshes_snapshot() {
    let db = db_with_status_index();
    db.put_item("u1", "o1", order("open", 1).with("total", 5i64)).expect("put failed");
    db.put_item("u1", "o1", order("open", 1).with("total", 9i64)).expect("put failed");

    let open = by_status(&db, "open");
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].get("total"), Some(&Value::Int(9)));
}

#[test]
fn test_overwrite_dropping_attribute_removes_entry() {
    let db = db_with_status_index();
    db.put_item("u1", "o1", order("open", 1)).expect("put failed");
    db.put_item("u1", "o1", Item::new().with("status", "open")).expect("put failed");

    assert!(by_status(&db, "open").is_empty());
}

#[test]
fn test_delete_deindexes_item() {
    let db = db_with_status_index();
    db.put_item("u1", "o1", order("open", 1)).expect("put failed");
    db.put_item("u1", "o2", order("open", 1)).expect("put failed");

    db.delete_item("u1", "o1").expect("delete failed");
    assert_eq!(keys(&by_status(&db, "open")), vec![(Value::from("u1"), Value::from("o2"))]);

    db.delete_item("u1", "o2").expect("delete failed");
    assert!(by_status(&db, "open").is_empty());
    // Emptying an index partition never unregisters the index
    assert!(db.get_index("byStatus").expect("get_index failed").is_some());
}

#[test]
fn test_index_on_primary_keys() {
    let db = Database::in_memory().expect("failed to create db");
    db.put_item("p1", "a", Item::new()).expect("put failed");
    db.put_item("p1", "b", Item::new()).expect("put failed");
    db.put_item("p2", "a", Item::new()).expect("put failed");

    db.add_index("bySk", "sk", "pk").expect("add_index failed");

    let items = db.query("a").index("bySk").execute().expect("query failed");
    assert_eq!(
        keys(&items),
        vec![(Value::from("p1"), Value::from("a")), (Value::from("p2"), Value::from("a"))]
    );
}

#[test]
fn test_multiple_indexes_maintained_together() {
    let db = db_with_status_index();
    db.add_index("byOwner", "owner", "created").expect("add_index failed");

    db.put_item("u1", "o1", order("open", 1).with("owner", "alice")).expect("put failed");
    db.put_item("u1", "o2", order("open", 2)).expect("put failed");

    assert_eq!(by_status(&db, "open").len(), 2);
    let alice = db.query("alice").index("byOwner").execute().expect("query failed");
    assert_eq!(keys(&alice), vec![(Value::from("u1"), Value::from("o1"))]);

    db.delete_item("u1", "o1").expect("delete failed");
    assert!(db.query("alice").index("byOwner").execute().expect("query failed").is_empty());
    assert_eq!(by_status(&db, "open").len(), 1);
}

#[test]
fn test_crowded_index_partition() {
    let db = db_with_status_index();
    for n in 0..300i64 {
        db.put_item(format!("u{}", n % 7), n, order("open", n)).expect("put failed");
    }

    db.delete_item("u3", 150i64).expect("delete failed");
    db.put_item("u5", 5i64, order("closed", 5)).expect("put failed");

    let open = by_status(&db, "open");
    assert_eq!(open.len(), 298);
    let created: Vec<i64> =
        open.iter().filter_map(|item| item.get("created").and_then(Value::as_int)).collect();
    let expected: Vec<i64> = (0..300).filter(|&n| n != 150 && n != 5).collect();
    assert_eq!(created, expected);
    assert_eq!(keys(&by_status(&db, "closed")), vec![(Value::from("u5"), Value::Int(5))]);
}
