//! Transaction management for `SlugDB`.
//!
//! This module provides the [`TransactionManager`], which opens read and
//! write scopes over a storage engine, and the [`DocumentTransaction`]
//! handle, which exposes the stored document (primary table, index registry
//! and index entries) inside one scope.
//!
//! # Example
//!
//! ```
//! use slugdb::transaction::TransactionManager;
//! use slugdb::IndexSchema;
//! use slugdb_storage::backends::RedbEngine;
//!
//! let manager = TransactionManager::new(RedbEngine::in_memory()?);
//!
//! manager.transact(|tx| tx.put_index_schema(&IndexSchema::new("bySk", "sk", "pk")))?;
//!
//! let registry = manager.read(|tx| tx.indexes())?;
//! assert!(registry.contains_key("bySk"));
//! # Ok::<(), slugdb::Error>(())
//! ```

mod handle;
mod manager;

pub use handle::DocumentTransaction;
pub use manager::TransactionManager;
