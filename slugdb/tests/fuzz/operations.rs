//! Random operation generation for fuzz testing.
//!
//! Generates random sequences of puts and deletes, applies them to a
//! database and to a model, and checks that the primary table and every
//! index agree with the model.

use std::collections::BTreeMap;

use proptest::prelude::*;

use slugdb::{Database, Item, Value};

// ============================================================================
// Operation Types
// ============================================================================

/// A database operation that can be randomly generated and applied
#[derive(Debug, Clone)]
pub enum Operation {
    /// Store an item, replacing any item at the same keys
    Put { pk: u8, sk: u8, attributes: Vec<(String, TestValue)> },
    /// Delete an item, which may be absent
    Delete { pk: u8, sk: u8 },
}

/// Test value types that can be randomly generated
#[derive(Debug, Clone)]
pub enum TestValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl From<TestValue> for Value {
    fn from(tv: TestValue) -> Self {
        match tv {
            TestValue::Null => Value::Null,
            TestValue::Bool(b) => Value::Bool(b),
            TestValue::Int(i) => Value::Int(i),
            TestValue::Float(f) => Value::Float(f),
            TestValue::String(s) => Value::String(s),
        }
    }
}

// ============================================================================
// Proptest Strategies
// ============================================================================

/// Strategy for generating test values.
///
/// Values are drawn from small domains so items collide in index partitions.
fn test_value_strategy() -> impl Strategy<Value = TestValue> {
    prop_oneof![
        Just(TestValue::Null),
        any::<bool>().prop_map(TestValue::Bool),
        (0i64..4).prop_map(TestValue::Int),
        prop_oneof![Just(0.5f64), Just(-1.0), Just(2.0)].prop_map(TestValue::Float),
        "[ab]{1,2}".prop_map(TestValue::String),
    ]
}

/// Strategy for generating attribute key-value pairs.
///
/// Names overlap with the indexed attributes, and with `pk`/`sk`, which the
/// database must override.
fn attributes_strategy() -> impl Strategy<Value = Vec<(String, TestValue)>> {
    let name = prop_oneof![
        Just("color".to_owned()),
        Just("size".to_owned()),
        Just("owner".to_owned()),
        Just("pk".to_owned()),
        Just("sk".to_owned()),
    ];
    proptest::collection::vec((name, test_value_strategy()), 0..5)
}

/// Strategy for generating a single operation
fn operation_strategy() -> impl Strategy<Value = Operation> {
    prop_oneof![
        3 => (0u8..4, 0u8..4, attributes_strategy())
            .prop_map(|(pk, sk, attributes)| Operation::Put { pk, sk, attributes }),
        1 => (0u8..4, 0u8..4).prop_map(|(pk, sk)| Operation::Delete { pk, sk }),
    ]
}

/// Strategy for generating a sequence of operations
pub fn operations_strategy(max_len: usize) -> impl Strategy<Value = Vec<Operation>> {
    proptest::collection::vec(operation_strategy(), 1..max_len)
}

// ============================================================================
// Model
// ============================================================================

/// The indexes every fuzz database carries, as `(name, partition_attr, sort_attr)`.
pub const INDEXES: [(&str, &str, &str); 3] =
    [("byColor", "color", "size"), ("byOwner", "owner", "sk"), ("bySk", "sk", "pk")];

/// The expected primary table: `(pk, sk) -> item`.
pub type Model = BTreeMap<(Value, Value), Item>;

fn key(pk: u8, sk: u8) -> (Value, Value) {
    (Value::from(format!("p{pk}")), Value::Int(i64::from(sk)))
}

fn item_from(attributes: Vec<(String, TestValue)>) -> Item {
    attributes.into_iter().fold(Item::new(), |item, (name, value)| item.with(name, value))
}

/// Apply one operation to both the database and the model.
pub fn apply(db: &Database, model: &mut Model, op: Operation) {
    match op {
        Operation::Put { pk, sk, attributes } => {
            let (pk, sk) = key(pk, sk);
            let stored =
                db.put_item(pk.clone(), sk.clone(), item_from(attributes)).expect("put failed");
            model.insert((pk, sk), stored);
        }
        Operation::Delete { pk, sk } => {
            let (pk, sk) = key(pk, sk);
            let deleted = db.delete_item(pk.clone(), sk.clone()).expect("delete failed");
            assert_eq!(deleted, model.remove(&(pk, sk)));
        }
    }
}

/// The entries an index built from scratch over `model` would hold, grouped
/// by index partition value and in index order.
pub fn expected_index(
    model: &Model,
    partition_attr: &str,
    sort_attr: &str,
) -> BTreeMap<Value, Vec<Item>> {
    let mut entries: BTreeMap<Value, BTreeMap<(Value, Value, Value), Item>> = BTreeMap::new();
    for ((pk, sk), item) in model {
        let (Some(ipv), Some(isv)) = (item.get(partition_attr), item.get(sort_attr)) else {
            continue;
        };
        entries
            .entry(ipv.clone())
            .or_default()
            .insert((isv.clone(), pk.clone(), sk.clone()), item.clone());
    }
    entries.into_iter().map(|(ipv, items)| (ipv, items.into_values().collect())).collect()
}

/// Every value an indexed attribute can take, plus one it never takes.
pub fn lookup_values() -> Vec<Value> {
    let mut values = vec![
        Value::Null,
        Value::Bool(false),
        Value::Bool(true),
        Value::Float(0.5),
        Value::Float(-1.0),
        Value::Float(2.0),
        Value::from("zzz"),
    ];
    values.extend((0i64..4).map(Value::Int));
    for s in ["a", "b", "aa", "ab", "ba", "bb"] {
        values.push(Value::from(s));
    }
    values.extend((0u8..4).map(|pk| Value::from(format!("p{pk}"))));
    values
}

/// Check the database against the model: primary table, partitions and
/// every index.
pub fn assert_consistent(db: &Database, model: &Model) {
    for ((pk, sk), item) in model {
        let stored = db.get_item(pk.clone(), sk.clone()).expect("get failed");
        assert_eq!(stored.as_ref(), Some(item));
    }

    let mut partitions: Vec<Value> = model.keys().map(|(pk, _)| pk.clone()).collect();
    partitions.dedup();
    assert_eq!(db.list_partitions().expect("list failed"), partitions);

    for (name, partition_attr, sort_attr) in INDEXES {
        let expected = expected_index(model, partition_attr, sort_attr);
        let mut lookups = lookup_values();
        lookups.extend(expected.keys().cloned());

        for ipv in lookups {
            let actual = db.query(ipv.clone()).index(name).execute().expect("query failed");
            let wanted = expected.get(&ipv).cloned().unwrap_or_default();
            assert_eq!(actual, wanted, "index {name} diverged at {ipv}");
        }
    }
}

/// Open an in-memory database with the fuzz indexes registered.
pub fn indexed_db() -> Database {
    let db = Database::in_memory().expect("failed to create db");
    for (name, partition_attr, sort_attr) in INDEXES {
        db.add_index(name, partition_attr, sort_attr).expect("add_index failed");
    }
    db
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Random put/delete sequences keep every index consistent
    #[test]
    fn prop_operations_keep_indexes_consistent(ops in operations_strategy(40)) {
        let db = indexed_db();
        let mut model = Model::new();

        for op in ops {
            apply(&db, &mut model, op);
        }

        assert_consistent(&db, &model);
    }
}
