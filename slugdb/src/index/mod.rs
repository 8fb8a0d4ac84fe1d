//! Secondary indexes.
//!
//! An index mirrors primary items under an alternate key projection. Each
//! [`IndexSchema`] names two attributes: items are grouped by the value of
//! `partition_attr` and ordered by the value of `sort_attr`, with the
//! original `(pk, sk)` as a tiebreaker.
//!
//! # Example
//!
//! ```
//! use slugdb::{Database, Item, Value};
//!
//! let db = Database::in_memory()?;
//! db.add_index("byOwner", "owner", "created")?;
//!
//! db.put_item("doc#1", "v1", Item::new().with("owner", "alice").with("created", 3i64))?;
//! db.put_item("doc#2", "v1", Item::new().with("owner", "alice").with("created", 1i64))?;
//!
//! let docs = db.query("alice").index("byOwner").execute()?;
//! let pks: Vec<Value> = docs.iter().filter_map(|item| item.pk().cloned()).collect();
//! assert_eq!(pks, vec![Value::from("doc#2"), Value::from("doc#1")]);
//! # Ok::<(), slugdb::Error>(())
//! ```

mod maintenance;
mod schema;
mod tree;

pub use maintenance::IndexMaintenance;
pub use schema::{IndexEntry, IndexRegistry, IndexSchema};
pub use tree::{IndexPartition, Partition};
