//! Index maintenance operations.
//!
//! These keep secondary indexes in step with the primary table. They are
//! called inside the same write scope as the primary mutation, so an item
//! appears in an index exactly when it exists in the primary table and
//! carries both projected attributes.

use slugdb_core::Item;
use slugdb_storage::Transaction;
use tracing::debug;

use super::schema::{IndexRegistry, IndexSchema};
use crate::error::Result;
use crate::transaction::DocumentTransaction;

/// Low-level operations that mirror items into index entries.
pub struct IndexMaintenance;

impl IndexMaintenance {
    /// Store `item` in the index described by `schema`.
    ///
    /// Items lacking either projected attribute, or either primary key, are
    /// skipped. Indexing the same item twice is a no-op.
    ///
    /// Returns `true` if the item was indexed.
    pub fn index_item<T: Transaction>(
        tx: &mut DocumentTransaction<T>,
        item: &Item,
        schema: &IndexSchema,
    ) -> Result<bool> {
        let Some(entry) = schema.entry(item) else {
            return Ok(false);
        };

        tx.put_index_entry(&schema.name, &entry, item)?;
        Ok(true)
    }

    /// Remove `item` from the index described by `schema`.
    ///
    /// The item is located by its projection and primary keys, and exactly
    /// one stored entry is deleted. The schema stays registered.
    ///
    /// Returns `true` if an entry was removed.
    pub fn deindex_item<T: Transaction>(
        tx: &mut DocumentTransaction<T>,
        item: &Item,
        schema: &IndexSchema,
    ) -> Result<bool> {
        let Some(entry) = schema.entry(item) else {
            return Ok(false);
        };

        tx.delete_index_entry(&schema.name, &entry)
    }

    /// Store `item` in every registered index.
    ///
    /// Returns the number of indexes the item was stored in.
    pub fn index_all<T: Transaction>(
        tx: &mut DocumentTransaction<T>,
        item: &Item,
        registry: &IndexRegistry,
    ) -> Result<usize> {
        let mut indexed = 0;
        for schema in registry.values() {
            if Self::index_item(tx, item, schema)? {
                indexed += 1;
            }
        }
        Ok(indexed)
    }

    /// Remove `item` from every registered index.
    ///
    /// Returns the number of indexes the item was removed from.
    pub fn deindex_all<T: Transaction>(
        tx: &mut DocumentTransaction<T>,
        item: &Item,
        registry: &IndexRegistry,
    ) -> Result<usize> {
        let mut removed = 0;
        for schema in registry.values() {
            if Self::deindex_item(tx, item, schema)? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Move an item's index entries from `old` to `new`.
    ///
    /// Used when `new` replaces `old` at the same primary key. Every old
    /// entry is removed before any new entry is written, so an index whose
    /// projection did not change ends up holding `new` alone.
    pub fn update_item<T: Transaction>(
        tx: &mut DocumentTransaction<T>,
        old: &Item,
        new: &Item,
        registry: &IndexRegistry,
    ) -> Result<()> {
        let removed = Self::deindex_all(tx, old, registry)?;
        let indexed = Self::index_all(tx, new, registry)?;
        debug!(removed, indexed, "moved index entries");
        Ok(())
    }
}
