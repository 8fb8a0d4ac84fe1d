//! Reindex tests.

use slugdb::{Database, DatabaseBuilder, Item, ReindexScope, ReindexStats, Value};

fn seed(db: &Database) {
    db.put_item("p1", "a", Item::new().with("color", "red")).expect("put failed");
    db.put_item("p1", "b", Item::new().with("color", "blue")).expect("put failed");
    db.put_item("p2", "a", Item::new().with("color", "red")).expect("put failed");
    db.put_item("p2", "b", Item::new()).expect("put failed");
}

fn snapshot(db: &Database) -> Vec<Vec<Item>> {
    let mut out = Vec::new();
    for sk in ["a", "b"] {
        out.push(db.query(sk).index("bySk").execute().expect("query failed"));
    }
    for color in ["red", "blue"] {
        out.push(db.query(color).index("byColor").execute().expect("query failed"));
    }
    out
}

#[test]
fn test_reindex_reports_stats() {
    let db = Database::in_memory().expect("failed to create db");
    seed(&db);
    db.add_index("bySk", "sk", "pk").expect("add_index failed");
    db.add_index("byColor", "color", "pk").expect("add_index failed");

    let stats = db.reindex().expect("reindex failed");
    assert_eq!(stats, ReindexStats { items_scanned: 4, entries_written: 7 });
}

#[test]
fn test_reindex_is_idempotent() {
    let db = Database::in_memory().expect("failed to create db");
    seed(&db);
    db.add_index("bySk", "sk", "pk").expect("add_index failed");
    db.add_index("byColor", "color", "pk").expect("add_index failed");

    let before = snapshot(&db);
    db.reindex().expect("reindex failed");
    db.reindex().expect("reindex failed");
    assert_eq!(snapshot(&db), before);
}

#[test]
fn test_reindex_matches_incremental_maintenance() {
    // Indexes defined before the writes are maintained incrementally
    let incremental = Database::in_memory().expect("failed to create db");
    incremental.add_index("bySk", "sk", "pk").expect("add_index failed");
    incremental.add_index("byColor", "color", "pk").expect("add_index failed");
    seed(&incremental);
    incremental.delete_item("p1", "b").expect("delete failed");

    // Indexes defined after the writes are built by a reindex
    let rebuilt = Database::in_memory().expect("failed to create db");
    seed(&rebuilt);
    rebuilt.delete_item("p1", "b").expect("delete failed");
    rebuilt.add_index("bySk", "sk", "pk").expect("add_index failed");
    rebuilt.add_index("byColor", "color", "pk").expect("add_index failed");

    assert_eq!(snapshot(&incremental), snapshot(&rebuilt));
}

#[test]
fn test_per_record_scope_matches_atomic() {
    let atomic = Database::in_memory().expect("failed to create db");
    let per_record = DatabaseBuilder::in_memory()
        .reindex_scope(ReindexScope::PerRecord)
        .open()
        .expect("failed to create db");
    assert_eq!(per_record.config().reindex_scope, ReindexScope::PerRecord);

    for db in [&atomic, &per_record] {
        seed(db);
        db.add_index("bySk", "sk", "pk").expect("add_index failed");
        db.add_index("byColor", "color", "pk").expect("add_index failed");
    }

    assert_eq!(
        atomic.reindex().expect("reindex failed"),
        per_record.reindex().expect("reindex failed")
    );
    assert_eq!(snapshot(&atomic), snapshot(&per_record));
}

#[test]
fn test_reindex_empty_database() {
    let db = Database::in_memory().expect("failed to create db");
    assert_eq!(db.reindex().expect("reindex failed"), ReindexStats::default());

    db.add_index("bySk", "sk", "pk").expect("add_index failed");
    assert_eq!(db.reindex().expect("reindex failed"), ReindexStats::default());
}

#[test]
fn test_reindex_scenario_by_sort_key() {
    let db = Database::in_memory().expect("failed to create db");
    db.put_item("p1", "a", Item::new()).expect("put failed");
    db.put_item("p1", "b", Item::new()).expect("put failed");
    db.put_item("p2", "a", Item::new()).expect("put failed");
    db.add_index("bySk", "sk", "pk").expect("add_index failed");
    db.reindex().expect("reindex failed");

    let items = db.query("a").index("bySk").execute().expect("query failed");
    let keys: Vec<(Value, Value)> = items
        .iter()
        .map(|item| (item.pk().cloned().expect("pk"), item.sk().cloned().expect("sk")))
        .collect();
    assert_eq!(
        keys,
        vec![(Value::from("p1"), Value::from("a")), (Value::from("p2"), Value::from("a"))]
    );
}
