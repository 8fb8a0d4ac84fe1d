//! `SlugDB`
//!
//! An embedded document store that keys every item by a partition key and a
//! sort key, with secondary indexes that re-key the same items by any two of
//! their attributes.
//!
//! # Features
//!
//! - **Partitioned storage**: items are grouped by `pk` and ordered by `sk`
//! - **Secondary indexes**: declared by name, maintained on every write and
//!   rebuilt from the primary table on demand
//! - **Partition queries**: read one partition of the primary table or of an
//!   index, narrowed by sort-value and item predicates
//! - **Transactions**: every write, including its index maintenance, commits
//!   atomically
//!
//! # Example
//!
//! ```
//! use slugdb::{Database, Filter, Item, Value};
//!
//! let db = Database::in_memory()?;
//!
//! let order = |status: &str, total: i64| Item::new().with("status", status).with("total", total);
//! db.put_item("user#alice", "order#1", order("open", 30))?;
//! db.put_item("user#alice", "order#2", order("shipped", 12))?;
//! db.put_item("user#bob", "order#3", order("open", 55))?;
//!
//! // Every order of one user, in sort-key order
//! assert_eq!(db.query("user#alice").execute()?.len(), 2);
//!
//! // Open orders across all users, ordered by total
//! db.add_index("byStatus", "status", "total")?;
//! let open = db
//!     .query("open")
//!     .index("byStatus")
//!     .filter_by(Filter::gt("total", 40i64))
//!     .execute()?;
//!
//! assert_eq!(open.len(), 1);
//! assert_eq!(open[0].pk(), Some(&Value::from("user#bob")));
//! # Ok::<(), slugdb::Error>(())
//! ```

#![deny(clippy::unwrap_used)]

// Re-export core types
pub use slugdb_core::{Item, Value};

pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod index;
pub mod query;
pub mod reindex;
pub mod transaction;

pub use config::{Config, DatabaseBuilder, Durability, ReindexScope};
pub use database::Database;
pub use error::{BoxError, Error, Result};
pub use filter::Filter;
pub use index::{IndexRegistry, IndexSchema};
pub use query::{QueryBuilder, QueryTarget};
pub use reindex::ReindexStats;
