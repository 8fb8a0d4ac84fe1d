//! Database configuration.
//!
//! [`Config`] holds the options a [`Database`] was opened with, and
//! [`DatabaseBuilder`] assembles one fluently.
//!
//! # Example
//!
//! ```
//! use slugdb::{DatabaseBuilder, Durability, ReindexScope};
//!
//! let db = DatabaseBuilder::in_memory()
//!     .cache_size(16 * 1024 * 1024)
//!     .durability(Durability::Eventual)
//!     .reindex_scope(ReindexScope::PerRecord)
//!     .open()?;
//!
//! assert_eq!(db.config().reindex_scope, ReindexScope::PerRecord);
//! # Ok::<(), slugdb::Error>(())
//! ```

use std::path::{Path, PathBuf};

use slugdb_storage::backends::RedbConfig;

use crate::database::Database;
use crate::error::{Error, Result};

pub use slugdb_storage::backends::Durability;

/// How many transactions a reindex spans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReindexScope {
    /// Clear and rebuild every index in a single transaction.
    ///
    /// Readers observe either the old or the fully rebuilt indexes.
    #[default]
    Atomic,

    /// Clear the indexes in one transaction, then index each primary item in
    /// its own transaction.
    ///
    /// Writers are blocked for shorter periods, but readers may observe a
    /// partially rebuilt index set while the reindex runs.
    PerRecord,
}

/// Configuration options for opening a database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path to the database file. Ignored for in-memory databases.
    pub path: PathBuf,
    /// Whether the database lives only in memory.
    pub in_memory: bool,
    /// Storage cache size in bytes. `None` uses the storage default.
    pub cache_size: Option<usize>,
    /// How strongly commits are persisted.
    pub durability: Durability,
    /// Transaction scope of [`Database::reindex`].
    pub reindex_scope: ReindexScope,
}

impl Config {
    /// Create a configuration for a file-backed database at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            in_memory: false,
            cache_size: None,
            durability: Durability::default(),
            reindex_scope: ReindexScope::default(),
        }
    }

    /// Create a configuration for an in-memory database.
    #[must_use]
    pub fn in_memory() -> Self {
        Self { in_memory: true, ..Self::new(PathBuf::new()) }
    }

    /// The storage engine options derived from this configuration.
    pub(crate) fn redb_config(&self) -> RedbConfig {
        let mut redb_config = RedbConfig::new().durability(self.durability);
        if let Some(cache_size) = self.cache_size {
            redb_config = redb_config.cache_size(cache_size);
        }
        redb_config
    }
}

/// Builder for opening a [`Database`] with custom options.
///
/// Either [`path`](Self::path) or [`DatabaseBuilder::in_memory`] is required.
#[derive(Debug, Clone, Default)]
pub struct DatabaseBuilder {
    path: Option<PathBuf>,
    in_memory: bool,
    cache_size: Option<usize>,
    durability: Durability,
    reindex_scope: ReindexScope,
}

impl DatabaseBuilder {
    /// Create a builder with default options and no path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for an in-memory database.
    #[must_use]
    pub fn in_memory() -> Self {
        Self { in_memory: true, ..Self::default() }
    }

    /// Set the database file path.
    #[must_use]
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the storage cache size in bytes.
    #[must_use]
    pub const fn cache_size(mut self, size: usize) -> Self {
        self.cache_size = Some(size);
        self
    }

    /// Set how strongly commits are persisted.
    #[must_use]
    pub const fn durability(mut self, durability: Durability) -> Self {
        self.durability = durability;
        self
    }

    /// Set the transaction scope used by [`Database::reindex`].
    #[must_use]
    pub const fn reindex_scope(mut self, scope: ReindexScope) -> Self {
        self.reindex_scope = scope;
        self
    }

    /// Build the configuration without opening the database.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if neither a path nor in-memory mode was set.
    pub fn build(self) -> Result<Config> {
        let path = match (self.path, self.in_memory) {
            (Some(path), _) => path,
            (None, true) => PathBuf::new(),
            (None, false) => {
                return Err(Error::config("either a path or in-memory mode is required"))
            }
        };

        Ok(Config {
            path,
            in_memory: self.in_memory,
            cache_size: self.cache_size,
            durability: self.durability,
            reindex_scope: self.reindex_scope,
        })
    }

    /// Build the configuration and open the database.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is incomplete or the database
    /// cannot be opened.
    pub fn open(self) -> Result<Database> {
        Database::open_with_config(self.build()?)
    }
}
