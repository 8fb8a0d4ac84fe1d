//! `SlugDB` Storage
//!
//! This crate provides the transactional key-value layer that `SlugDB`
//! keeps its primary table, index registry and index trees in.
//!
//! # Overview
//!
//! The storage layer exposes a small trait family that backends implement.
//! Every logical table lives in one key space; keys are raw bytes compared
//! lexicographically, so callers control ordering through their key encoding.
//!
//! # Core Traits
//!
//! - [`StorageEngine`] - Entry point for starting transactions
//! - [`Transaction`] - Read/write operations with commit and rollback
//! - [`Cursor`] - Ordered forward iteration over key-value pairs
//!
//! # Error Handling
//!
//! All storage operations return [`StorageResult<T>`], which is an alias for
//! `Result<T, StorageError>`.
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
//! tx.put("main", b"partition1#", b"record")?;
//! tx.commit()?;
//!
//! let tx = engine.begin_read()?;
//! assert_eq!(tx.get("main", b"partition1#")?, Some(b"record".to_vec()));
//! # Ok::<(), slugdb_storage::StorageError>(())
//! ```
//!
//! # Modules
//!
//! - [`engine`] - Storage engine traits and errors
//! - [`backends`] - Concrete storage backend implementations

pub mod backends;
pub mod engine;

pub use engine::{
    Cursor, CursorResult, KeyValue, StorageEngine, StorageError, StorageResult, Transaction,
};
