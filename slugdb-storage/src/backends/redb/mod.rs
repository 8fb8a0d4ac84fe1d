//! Redb storage backend.
//!
//! This module provides a storage backend implementation using Redb,
//! a pure-Rust embedded database with ACID transactions. Databases are
//! either file-backed or held entirely in memory.
//!
//! # Example
//!
//! ```
//! use slugdb_storage::backends::RedbEngine;
//! use slugdb_storage::{StorageEngine, Transaction};
//!
//! let engine = RedbEngine::in_memory()?;
//!
//! let mut tx = engine.begin_write()?;
//! tx.put("main", b"user:1", b"Alice")?;
//! tx.commit()?;
//!
//! let tx = engine.begin_read()?;
//! assert_eq!(tx.get("main", b"user:1")?, Some(b"Alice".to_vec()));
//! # Ok::<(), slugdb_storage::StorageError>(())
//! ```
//!
//! # Configuration
//!
//! Use [`RedbConfig`] to tune the cache and commit durability:
//!
//! ```no_run
//! use slugdb_storage::backends::{Durability, RedbConfig, RedbEngine};
//!
//! let config = RedbConfig::new()
//!     .cache_size(64 * 1024 * 1024)
//!     .durability(Durability::Eventual);
//!
//! let engine = RedbEngine::open_with_config("slug.redb", config)?;
//! # Ok::<(), slugdb_storage::StorageError>(())
//! ```

mod engine;
pub mod tables;
mod transaction;

pub use engine::{Durability, RedbConfig, RedbEngine};
pub use transaction::{RedbCursor, RedbTransaction};
