//! Redb storage engine implementation.
//!
//! This module provides the `RedbEngine` type which implements the
//! `StorageEngine` trait using the Redb embedded database.

use std::path::Path;

use redb::Database;
use tracing::debug;

use crate::engine::{StorageEngine, StorageError};

use super::transaction::RedbTransaction;

/// How strongly a committed write transaction is persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Durability {
    /// Every commit is flushed to disk before it returns.
    #[default]
    Immediate,
    /// Commits become durable at the next immediate commit or
    /// [`StorageEngine::flush`]. A crash may lose recent commits but never
    /// leaves a partially applied one.
    Eventual,
}

impl From<Durability> for redb::Durability {
    fn from(durability: Durability) -> Self {
        match durability {
            Durability::Immediate => Self::Immediate,
            Durability::Eventual => Self::Eventual,
        }
    }
}

/// Configuration options for the Redb storage engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedbConfig {
    /// Cache size in bytes.
    /// If not set, uses Redb's default.
    pub cache_size: Option<usize>,

    /// Durability applied to every write transaction.
    pub durability: Durability,
}

impl RedbConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cache size.
    #[must_use]
    pub const fn cache_size(mut self, size: usize) -> Self {
        self.cache_size = Some(size);
        self
    }

    /// Set the commit durability.
    #[must_use]
    pub const fn durability(mut self, durability: Durability) -> Self {
        self.durability = durability;
        self
    }
}

/// A storage engine backed by Redb.
pub struct RedbEngine {
    /// The underlying Redb database.
    db: Database,
    durability: Durability,
}

impl RedbEngine {
    /// Open or create a database at the given path with default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the database cannot be opened or created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        Self::open_with_config(path, RedbConfig::default())
    }

    /// Open or create a database at the given path with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the database cannot be opened or created.
    pub fn open_with_config(
        path: impl AsRef<Path>,
        config: RedbConfig,
    ) -> Result<Self, StorageError> {
        let mut builder = Database::builder();

        if let Some(cache_size) = config.cache_size {
            builder.set_cache_size(cache_size);
        }

        let db = builder.create(path.as_ref()).map_err(|e| StorageError::Open(e.to_string()))?;
        debug!(
            path = %path.as_ref().display(),
            durability = ?config.durability,
            "opened redb database"
        );

        Ok(Self { db, durability: config.durability })
    }

    /// Create an in-memory database.
    ///
    /// The database will be lost when the engine is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the database cannot be created.
    pub fn in_memory() -> Result<Self, StorageError> {
        Self::in_memory_with_config(RedbConfig::default())
    }

    /// Create an in-memory database with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the database cannot be created.
    pub fn in_memory_with_config(config: RedbConfig) -> Result<Self, StorageError> {
        let mut builder = Database::builder();

        if let Some(cache_size) = config.cache_size {
            builder.set_cache_size(cache_size);
        }

        let db = builder
            .create_with_backend(redb::backends::InMemoryBackend::new())
            .map_err(|e| StorageError::Open(e.to_string()))?;

        Ok(Self { db, durability: config.durability })
    }

    /// The durability applied to write transactions.
    pub const fn durability(&self) -> Durability {
        self.durability
    }

    /// Get the underlying Redb database.
    pub const fn inner(&self) -> &Database {
        &self.db
    }
}

impl StorageEngine for RedbEngine {
    type Transaction<'a> = RedbTransaction;

    fn begin_read(&self) -> Result<Self::Transaction<'_>, StorageError> {
        let tx = self.db.begin_read().map_err(|e| StorageError::Transaction(e.to_string()))?;
        Ok(RedbTransaction::new_read(tx))
    }

    fn begin_write(&self) -> Result<Self::Transaction<'_>, StorageError> {
        let mut tx = self.db.begin_write().map_err(|e| StorageError::Transaction(e.to_string()))?;
        tx.set_durability(self.durability.into());
        Ok(RedbTransaction::new_write(tx))
    }

    fn flush(&self) -> Result<(), StorageError> {
        if self.durability == Durability::Immediate {
            return Ok(());
        }

        // An immediate commit persists every eventual commit before it
        let mut tx = self.db.begin_write().map_err(|e| StorageError::Transaction(e.to_string()))?;
        tx.set_durability(redb::Durability::Immediate);
        tx.commit().map_err(|e| StorageError::Transaction(e.to_string()))
    }
}
