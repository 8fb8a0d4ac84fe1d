//! Transaction manager implementation.

use std::sync::Arc;

use slugdb_storage::StorageEngine;

use super::handle::DocumentTransaction;
use crate::error::Result;

/// Opens transaction scopes over a storage engine.
///
/// # Transaction Semantics
///
/// - **Read scopes** observe a consistent snapshot. Any number may run
///   concurrently.
/// - **Write scopes** are serialized by the engine: a scope blocks until it
///   holds the single writer, so a read/modify/write inside one scope never
///   interleaves with another.
///
/// # Thread Safety
///
/// `TransactionManager` is `Send + Sync` and can be shared across threads.
pub struct TransactionManager<E: StorageEngine> {
    /// The underlying storage engine.
    engine: Arc<E>,
}

impl<E: StorageEngine> TransactionManager<E> {
    /// Create a new transaction manager over `engine`.
    pub fn new(engine: E) -> Self {
        Self { engine: Arc::new(engine) }
    }

    /// Begin a read-only transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started.
    pub fn begin_read(&self) -> Result<DocumentTransaction<E::Transaction<'_>>> {
        Ok(DocumentTransaction::new(self.engine.begin_read()?))
    }

    /// Begin a read-write transaction.
    ///
    /// Blocks until no other write transaction is open.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started.
    pub fn begin_write(&self) -> Result<DocumentTransaction<E::Transaction<'_>>> {
        Ok(DocumentTransaction::new(self.engine.begin_write()?))
    }

    /// Run `f` inside an exclusive write scope.
    ///
    /// The scope commits if `f` returns `Ok` and rolls back if it returns
    /// `Err`, in which case that error is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns the error from `f`, or a storage error if the scope cannot be
    /// opened or committed.
    pub fn transact<'a, R, F>(&'a self, f: F) -> Result<R>
    where
        F: FnOnce(&mut DocumentTransaction<E::Transaction<'a>>) -> Result<R>,
    {
        let mut tx = self.begin_write()?;
        match f(&mut tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(err) => {
                // The caller's error wins over a failed rollback
                let _ = tx.rollback();
                Err(err)
            }
        }
    }

    /// Run `f` against a read-only snapshot.
    ///
    /// # Errors
    ///
    /// Returns the error from `f`, or a storage error if the snapshot cannot
    /// be opened.
    pub fn read<'a, R, F>(&'a self, f: F) -> Result<R>
    where
        F: FnOnce(&DocumentTransaction<E::Transaction<'a>>) -> Result<R>,
    {
        let tx = self.begin_read()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// Flush any buffered commits to durable storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    pub fn flush(&self) -> Result<()> {
        self.engine.flush()?;
        Ok(())
    }

    /// Get a reference to the underlying storage engine.
    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }
}
