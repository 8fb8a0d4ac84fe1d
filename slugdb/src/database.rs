//! Main database interface.
//!
//! This module provides the [`Database`] struct, which is the primary entry point
//! for interacting with a `SlugDB` database.
//!
//! # Examples
//!
//! Open a database and perform basic operations:
//!
//! ```no_run
//! use slugdb::{Database, Item};
//!
//! // Open or create a database
//! let db = Database::open("mydb.slug")?;
//!
//! db.put_item("user#alice", "profile", Item::new().with("name", "Alice"))?;
//! let profile = db.get_item("user#alice", "profile")?;
//! # Ok::<(), slugdb::Error>(())
//! ```

use std::path::Path;

use slugdb_core::{Item, Value};
use slugdb_storage::backends::RedbEngine;
use tracing::{debug, info};

use crate::config::{Config, DatabaseBuilder};
use crate::error::{Error, Result};
use crate::index::{IndexMaintenance, IndexRegistry, IndexSchema};
use crate::query::QueryBuilder;
use crate::reindex::{self, ReindexStats};
use crate::transaction::TransactionManager;

/// The main `SlugDB` database handle.
///
/// A database stores items in partitions: every item lives under a partition
/// key (`pk`) and, within its partition, a sort key (`sk`). Secondary indexes
/// re-key the same items by two of their other attributes and are kept in
/// step with every write.
///
/// # Thread Safety
///
/// `Database` is `Send + Sync` and can be shared across threads behind an
/// `Arc`. Writes are serialized; reads run concurrently against snapshots.
///
/// # Examples
///
/// ```
/// use slugdb::{Database, Item, Value};
///
/// let db = Database::in_memory()?;
///
/// db.put_item("p1", "a", Item::new())?;
/// db.put_item("p1", "b", Item::new())?;
/// db.put_item("p2", "a", Item::new())?;
///
/// // Index every item by its sort key, ordered by partition key
/// db.add_index("bySk", "sk", "pk")?;
///
/// let items = db.query("a").index("bySk").execute()?;
/// let pks: Vec<Value> = items.iter().filter_map(|item| item.pk().cloned()).collect();
/// assert_eq!(pks, vec![Value::from("p1"), Value::from("p2")]);
/// # Ok::<(), slugdb::Error>(())
/// ```
pub struct Database {
    /// The transaction manager over the storage engine.
    manager: TransactionManager<RedbEngine>,
    /// The configuration used to open this database.
    config: Config,
}

impl Database {
    /// Open or create a database at the given path.
    ///
    /// This is a convenience method that uses default configuration options.
    /// For more control, use [`DatabaseBuilder`].
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        DatabaseBuilder::new().path(path).open()
    }

    /// Open or create an in-memory database.
    ///
    /// All data is lost when the database is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn in_memory() -> Result<Self> {
        DatabaseBuilder::in_memory().open()
    }

    /// Open a database with the given configuration.
    ///
    /// This is typically called through [`DatabaseBuilder::open()`].
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open_with_config(config: Config) -> Result<Self> {
        let redb_config = config.redb_config();
        let engine = if config.in_memory {
            RedbEngine::in_memory_with_config(redb_config)
        } else {
            RedbEngine::open_with_config(&config.path, redb_config)
        }
        .map_err(|e| Error::Open(e.to_string()))?;

        Ok(Self { manager: TransactionManager::new(engine), config })
    }

    /// Returns a builder for creating a database with custom configuration.
    #[must_use]
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::new()
    }

    /// Get the configuration used to open this database.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Get the transaction manager.
    #[must_use]
    pub const fn transaction_manager(&self) -> &TransactionManager<RedbEngine> {
        &self.manager
    }

    /// Flush any buffered commits to durable storage.
    ///
    /// Only has an effect with [`Durability::Eventual`](crate::Durability::Eventual).
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    pub fn flush(&self) -> Result<()> {
        self.manager.flush()
    }

    // ------------------------------------------------------------------
    // Index registry
    // ------------------------------------------------------------------

    /// Define the index `name`, then rebuild all indexes.
    ///
    /// Redefining an existing index replaces its schema and discards every
    /// entry built under the old one. Returns the stored schema.
    ///
    /// # Errors
    ///
    /// Returns an error if a storage error occurs.
    pub fn add_index(
        &self,
        name: impl Into<String>,
        partition_attr: impl Into<String>,
        sort_attr: impl Into<String>,
    ) -> Result<IndexSchema> {
        let schema = IndexSchema::new(name, partition_attr, sort_attr);

        let replaced = self.manager.transact(|tx| {
            let replaced = tx.index_schema(&schema.name)?;
            tx.put_index_schema(&schema)?;
            tx.clear_index(&schema.name)?;
            Ok(replaced)
        })?;

        info!(
            index = %schema.name,
            partition_attr = %schema.partition_attr,
            sort_attr = %schema.sort_attr,
            redefined = replaced.is_some(),
            "index defined"
        );

        self.reindex()?;
        Ok(schema)
    }

    /// Get every registered index schema, by name.
    ///
    /// # Errors
    ///
    /// Returns an error if a storage error occurs.
    pub fn list_indexes(&self) -> Result<IndexRegistry> {
        self.manager.read(|tx| tx.indexes())
    }

    /// Get the schema of a single index, or `None` if it is not registered.
    ///
    /// # Errors
    ///
    /// Returns an error if a storage error occurs.
    pub fn get_index(&self, name: &str) -> Result<Option<IndexSchema>> {
        self.manager.read(|tx| tx.index_schema(name))
    }

    /// Rebuild every registered index from the primary table.
    ///
    /// The transaction scope follows [`Config::reindex_scope`].
    ///
    /// # Errors
    ///
    /// Returns an error if a storage error occurs.
    pub fn reindex(&self) -> Result<ReindexStats> {
        reindex::rebuild(&self.manager, self.config.reindex_scope)
    }

    // ------------------------------------------------------------------
    // Primary table
    // ------------------------------------------------------------------

    /// Get every partition key that holds at least one item.
    ///
    /// Keys are returned in value order, not in the order their partitions
    /// were created.
    ///
    /// # Errors
    ///
    /// Returns an error if a storage error occurs.
    pub fn list_partitions(&self) -> Result<Vec<Value>> {
        self.manager.read(|tx| tx.partition_keys())
    }

    /// Get the item at `(pk, sk)`, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if a storage error occurs.
    pub fn get_item(&self, pk: impl Into<Value>, sk: impl Into<Value>) -> Result<Option<Item>> {
        let (pk, sk) = (pk.into(), sk.into());
        self.manager.read(|tx| tx.get_item(&pk, &sk))
    }

    /// Store an item at `(pk, sk)`, replacing any item already there.
    ///
    /// The stored item is `attributes` with `pk` and `sk` set to the given
    /// keys, overriding attributes of the same name. It is written to every
    /// registered index in the same transaction, after any previous item at
    /// the same keys is removed from them. Returns the stored item.
    ///
    /// # Errors
    ///
    /// Returns an error if a storage error occurs.
    pub fn put_item(
        &self,
        pk: impl Into<Value>,
        sk: impl Into<Value>,
        attributes: impl Into<Item>,
    ) -> Result<Item> {
        let (pk, sk) = (pk.into(), sk.into());
        let item = attributes.into().with_keys(pk.clone(), sk.clone());

        let replaced = self.manager.transact(|tx| {
            let registry = tx.indexes()?;

            let previous = tx.get_item(&pk, &sk)?;
            tx.put_item(&pk, &sk, &item)?;

            match &previous {
                Some(previous) => IndexMaintenance::update_item(tx, previous, &item, &registry)?,
                None => {
                    IndexMaintenance::index_all(tx, &item, &registry)?;
                }
            }
            Ok(previous.is_some())
        })?;

        debug!(pk = %pk, sk = %sk, replaced, "put item");
        Ok(item)
    }

    /// Delete the item at `(pk, sk)`, returning it, or `None` if there was
    /// none.
    ///
    /// The item is removed from every registered index in the same
    /// transaction. A partition whose last item is deleted no longer exists.
    ///
    /// # Errors
    ///
    /// Returns an error if a storage error occurs.
    pub fn delete_item(&self, pk: impl Into<Value>, sk: impl Into<Value>) -> Result<Option<Item>> {
        let (pk, sk) = (pk.into(), sk.into());

        let deleted = self.manager.transact(|tx| {
            let Some(item) = tx.get_item(&pk, &sk)? else {
                return Ok(None);
            };
            tx.delete_item(&pk, &sk)?;

            let registry = tx.indexes()?;
            let removed = IndexMaintenance::deindex_all(tx, &item, &registry)?;
            Ok(Some((item, removed)))
        })?;

        match deleted {
            Some((item, removed)) => {
                debug!(pk = %pk, sk = %sk, deindexed = removed, "deleted item");
                Ok(Some(item))
            }
            None => Ok(None),
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Start a query over the partition with the given partition value.
    ///
    /// By default the query reads the primary table; call
    /// [`QueryBuilder::index`] to read a secondary index instead.
    ///
    /// # Example
    ///
    /// ```
    /// use slugdb::{Database, Item};
    ///
    /// let db = Database::in_memory()?;
    /// db.put_item("p1", "a", Item::new())?;
    /// db.put_item("p1", "b", Item::new())?;
    ///
    /// assert_eq!(db.query("p1").execute()?.len(), 2);
    /// assert!(db.query("p2").execute()?.is_empty());
    /// # Ok::<(), slugdb::Error>(())
    /// ```
    pub fn query(&self, partition_value: impl Into<Value>) -> QueryBuilder<'_> {
        QueryBuilder::new(self, partition_value.into())
    }
}
