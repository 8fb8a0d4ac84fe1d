//! Core storage engine traits.
//!
//! This module defines the fundamental traits for storage backends:
//!
//! - [`StorageEngine`] - The main entry point for storage operations
//! - [`Transaction`] - Transactional key-value operations
//! - [`Cursor`] - Ordered iteration over key-value pairs

use std::ops::Bound;
use std::sync::Arc;

use super::StorageError;

/// A key-value pair returned by cursor operations.
pub type KeyValue = (Vec<u8>, Vec<u8>);

/// Result type for cursor operations that return a key-value pair.
pub type CursorResult = Result<Option<KeyValue>, StorageError>;

/// A storage engine that provides transactional key-value operations.
///
/// Implementations must be thread-safe (`Send + Sync`). Write transactions
/// are serialized by the engine: [`begin_write`](Self::begin_write) blocks
/// until no other write transaction is open.
///
/// # Example
///
/// ```
/// use slugdb_storage::{StorageEngine, StorageError, Transaction};
///
/// fn copy_key<E: StorageEngine>(engine: &E) -> Result<(), StorageError> {
///     let mut tx = engine.begin_write()?;
///     if let Some(value) = tx.get("main", b"from")? {
///         tx.put("main", b"to", &value)?;
///     }
///     tx.commit()
/// }
/// ```
pub trait StorageEngine: Send + Sync {
    /// The transaction type for this engine.
    type Transaction<'a>: Transaction
    where
        Self: 'a;

    /// Begin a read-only transaction.
    ///
    /// Read transactions observe a consistent snapshot of the database.
    /// Multiple read transactions can run concurrently.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the transaction cannot be started.
    fn begin_read(&self) -> Result<Self::Transaction<'_>, StorageError>;

    /// Begin a read-write transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the transaction cannot be started.
    fn begin_write(&self) -> Result<Self::Transaction<'_>, StorageError>;

    /// Flush any buffered data to durable storage.
    ///
    /// The default implementation does nothing, for backends that make every
    /// commit durable.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    fn flush(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

/// A transaction over logical tables of byte keys and values.
///
/// Write transactions must be explicitly committed; dropping one without
/// committing rolls it back. Tables are created on first write, and reading
/// a table that was never written behaves like reading an empty table.
pub trait Transaction {
    /// The cursor type for iteration.
    type Cursor<'a>: Cursor
    where
        Self: 'a;

    /// Get a value by key from a table.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    fn get(&self, table: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError>;

    /// Put a key-value pair into a table, replacing any existing value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ReadOnly`] for read-only transactions.
    fn put(&mut self, table: &str, key: &[u8], value: &[u8]) -> Result<(), StorageError>;

    /// Delete a key from a table.
    ///
    /// Returns `Ok(true)` if the key was deleted, `Ok(false)` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ReadOnly`] for read-only transactions.
    fn delete(&mut self, table: &str, key: &[u8]) -> Result<bool, StorageError>;

    /// Create a cursor over every key-value pair in a table.
    ///
    /// The cursor starts before the first key; [`Cursor::next`] yields the
    /// first entry.
    fn cursor(&self, table: &str) -> Result<Self::Cursor<'_>, StorageError>;

    /// Create a cursor over a range of keys in a table.
    ///
    /// # Example
    ///
    /// ```
    /// use std::ops::Bound;
    ///
    /// use slugdb_storage::backends::RedbEngine;
    /// use slugdb_storage::{Cursor, StorageEngine, Transaction};
    ///
    /// let engine = RedbEngine::in_memory()?;
    /// let mut tx = engine.begin_write()?;
    /// for key in [b"a", b"m", b"z"] {
    ///     tx.put("letters", key, b"")?;
    /// }
    ///
    /// // Scan keys from "b" (inclusive) to "z" (exclusive)
    /// let mut cursor = tx.range(
    ///     "letters",
    ///     Bound::Included(b"b".as_slice()),
    ///     Bound::Excluded(b"z".as_slice()),
    /// )?;
    /// assert_eq!(cursor.next()?.map(|(k, _)| k), Some(b"m".to_vec()));
    /// assert_eq!(cursor.next()?, None);
    /// # Ok::<(), slugdb_storage::StorageError>(())
    /// ```
    fn range(
        &self,
        table: &str,
        start: Bound<&[u8]>,
        end: Bound<&[u8]>,
    ) -> Result<Self::Cursor<'_>, StorageError>;

    /// Commit the transaction, making all changes visible.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the commit fails.
    fn commit(self) -> Result<(), StorageError>;

    /// Roll back the transaction, discarding all changes.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Transaction`] if the rollback fails.
    fn rollback(self) -> Result<(), StorageError>;

    /// Check if this is a read-only transaction.
    fn is_read_only(&self) -> bool;
}

/// A cursor for ordered forward iteration over key-value pairs.
///
/// # Iteration Pattern
///
/// ```ignore
/// let mut cursor = tx.cursor("main")?;
///
/// // Position at first key >= "prefix"
/// let mut entry = cursor.seek(b"prefix")?;
///
/// while let Some((key, value)) = entry {
///     // Process key-value pair
///     entry = cursor.next()?;
/// }
/// ```
pub trait Cursor {
    /// Seek to the first key greater than or equal to `key`.
    ///
    /// Returns the entry at the new position, or `None` if no such key exists.
    fn seek(&mut self, key: &[u8]) -> CursorResult;

    /// Seek to the first key-value pair.
    ///
    /// Returns `None` if the table (or range) is empty.
    fn seek_first(&mut self) -> CursorResult;

    /// Move to the next key-value pair.
    ///
    /// On an unpositioned cursor this yields the first entry. Returns `None`
    /// once the cursor is exhausted.
    fn next(&mut self) -> CursorResult;

    /// Get the current key-value pair without advancing.
    ///
    /// Returns `None` before the first positioning call and after the cursor
    /// is exhausted.
    fn current(&self) -> Option<(&[u8], &[u8])>;
}

/// Implement `StorageEngine` for `Arc<E>` to allow shared ownership of engines.
impl<E: StorageEngine> StorageEngine for Arc<E> {
    type Transaction<'a>
        = E::Transaction<'a>
    where
        Self: 'a;

    fn begin_read(&self) -> Result<Self::Transaction<'_>, StorageError> {
        (**self).begin_read()
    }

    fn begin_write(&self) -> Result<Self::Transaction<'_>, StorageError> {
        (**self).begin_write()
    }

    fn flush(&self) -> Result<(), StorageError> {
        (**self).flush()
    }
}
