//! Partition query tests.

use std::fmt;

use slugdb::{Database, Error, Filter, Item, QueryTarget, Value};

fn seeded() -> Database {
    let db = Database::in_memory().expect("failed to create db");
    db.put_item("p1", "a", Item::new().with("n", 1i64).with("color", "red")).expect("put failed");
    db.put_item("p1", "b", Item::new().with("n", 2i64).with("color", "blue")).expect("put failed");
    db.put_item("p2", "a", Item::new().with("n", 3i64).with("color", "red")).expect("put failed");
    db
}

fn sks(items: &[Item]) -> Vec<Value> {
    items.iter().filter_map(|item| item.sk().cloned()).collect()
}

fn pks(items: &[Item]) -> Vec<Value> {
    items.iter().filter_map(|item| item.pk().cloned()).collect()
}

// ============================================================================
// Primary table
// ============================================================================

#[test]
fn test_main_query_returns_partition() {
    let db = seeded();
    let items = db.query("p1").execute().expect("query failed");
    assert_eq!(sks(&items), vec![Value::from("a"), Value::from("b")]);
}

#[test]
fn test_main_query_absent_partition_is_empty() {
    let db = seeded();
    assert!(db.query("p9").execute().expect("query failed").is_empty());
}

#[test]
fn test_select_sees_sort_key() {
    let db = seeded();
    let wanted = [Value::from("a")];
    let items = db.query("p1").select(|sk| wanted.contains(sk)).execute().expect("query failed");
    assert_eq!(sks(&items), vec![Value::from("a")]);
}

#[test]
fn test_filter_sees_whole_item() {
    let db = seeded();
    let items = db
        .query("p1")
        .filter(|item| item.get("color") == Some(&Value::from("blue")))
        .execute()
        .expect("query failed");
    assert_eq!(sks(&items), vec![Value::from("b")]);
}

#[test]
fn test_select_and_filter_combine() {
    let db = seeded();
    let items = db
        .query("p1")
        .select(|sk| sk == &Value::from("a"))
        .filter(|item| item.get("color") == Some(&Value::from("blue")))
        .execute()
        .expect("query failed");
    assert!(items.is_empty());
}

#[test]
fn test_filter_by_expression() {
    let db = seeded();
    let items = db
        .query("p1")
        .filter_by(Filter::eq("color", "red").or_else(Filter::gte("n", 2i64)))
        .execute()
        .expect("query failed");
    assert_eq!(sks(&items), vec![Value::from("a"), Value::from("b")]);

    let items = db
        .query("p1")
        .filter_by(Filter::in_set("color", ["green", "blue"]))
        .execute()
        .expect("query failed");
    assert_eq!(sks(&items), vec![Value::from("b")]);
}

#[test]
fn test_limit() {
    let db = seeded();
    let items = db.query("p1").limit(1).execute().expect("query failed");
    assert_eq!(sks(&items), vec![Value::from("a")]);

    assert!(db.query("p1").limit(0).execute().expect("query failed").is_empty());
}

// ============================================================================
// Secondary indexes
// ============================================================================

#[test]
fn test_index_query() {
    let db = seeded();
    db.add_index("byColor", "color", "n").expect("add_index failed");

    let items = db.query("red").index("byColor").execute().expect("query failed");
    assert_eq!(pks(&items), vec![Value::from("p1"), Value::from("p2")]);

    let items = db
        .query("red")
        .target(QueryTarget::Index("byColor".into()))
        .select(|n| n > &Value::Int(1))
        .execute()
        .expect("query failed");
    assert_eq!(pks(&items), vec![Value::from("p2")]);
}

#[test]
fn test_index_query_orders_by_sort_value() {
    let db = Database::in_memory().expect("failed to create db");
    db.add_index("byColor", "color", "rank").expect("add_index failed");
    for (pk, rank) in [("p1", 3i64), ("p2", 1), ("p3", 2)] {
        let item = Item::new().with("color", "red").with("rank", rank);
        db.put_item(pk, "a", item).expect("put failed");
    }

    let items = db.query("red").index("byColor").execute().expect("query failed");
    assert_eq!(pks(&items), vec![Value::from("p2"), Value::from("p3"), Value::from("p1")]);
}

#[test]
fn test_unknown_index_is_not_found() {
    let db = seeded();
    let err = db.query("red").index("byColor").execute().expect_err("query should fail");
    assert!(err.is_not_found());
    assert!(matches!(err, Error::IndexNotFound(name) if name == "byColor"));
}

#[test]
fn test_index_query_absent_partition_is_empty() {
    let db = seeded();
    db.add_index("byColor", "color", "n").expect("add_index failed");
    assert!(db.query("green").index("byColor").execute().expect("query failed").is_empty());
}

// ============================================================================
// Predicate failures
// ============================================================================

#[derive(Debug)]
struct Refused;

impl fmt::Display for Refused {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("refused")
    }
}

impl std::error::Error for Refused {}

#[test]
fn test_select_failure_propagates() {
    let db = seeded();
    let err = db
        .query("p1")
        .try_select(|_| Err::<bool, _>(Refused))
        .execute()
        .expect_err("query should fail");

    assert!(err.is_predicate_error());
    let source = std::error::Error::source(&err).expect("missing source");
    assert!(source.downcast_ref::<Refused>().is_some());
}

#[test]
fn test_filter_failure_propagates() {
    let db = seeded();
    let err = db
        .query("p1")
        .try_filter(|item| {
            if item.sk() == Some(&Value::from("b")) {
                Err(Refused)
            } else {
                Ok(true)
            }
        })
        .execute()
        .expect_err("query should fail");
    assert!(matches!(err, Error::Predicate(_)));
}

#[test]
fn test_fallible_predicates_can_pass() {
    let db = seeded();
    let items = db
        .query("p1")
        .try_select(|sk| Ok::<_, Refused>(sk != &Value::from("b")))
        .try_filter(|item| Ok::<_, Refused>(item.contains("n")))
        .execute()
        .expect("query failed");
    assert_eq!(sks(&items), vec![Value::from("a")]);
}
