//! Document transaction handle.
//!
//! The database is one logical document: a primary table of partitions, a
//! registry of index schemas and one ordered tree per index. This handle maps
//! that document onto the flat key-value tables of a storage transaction.
//!
//! Every item and every index entry is stored under its own key:
//!
//! ```text
//! main        sortable(pk) ++ sortable(sk)                          -> item
//! indexes     name                                                  -> schema
//! index_data  sortable(name) ++ sortable(ipv) ++ sortable(isv)
//!                            ++ sortable(pk) ++ sortable(sk)        -> item
//! ```
//!
//! The sortable encoding is self-delimiting and order-preserving, so each
//! partition is a contiguous key range and a scan yields it in key order.

use std::ops::Bound;

use slugdb_core::encoding::sortable::{
    decode_sortable, decode_sortable_tuple, decode_sortable_with_len, encode_sortable,
    encode_sortable_to, prefix_end,
};
use slugdb_core::encoding::{decode_record, encode_record};
use slugdb_core::{Item, Value};
use slugdb_storage::backends::redb::tables::names;
use slugdb_storage::{Cursor, Transaction};

use crate::error::Result;
use crate::index::{IndexEntry, IndexPartition, IndexRegistry, IndexSchema, Partition};

fn item_key(pk: &Value, sk: &Value) -> Vec<u8> {
    let mut key = encode_sortable(pk);
    encode_sortable_to(sk, &mut key);
    key
}

fn index_prefix(name: &str) -> Vec<u8> {
    encode_sortable(&Value::String(name.to_owned()))
}

fn index_partition_prefix(name: &str, ipv: &Value) -> Vec<u8> {
    let mut key = index_prefix(name);
    encode_sortable_to(ipv, &mut key);
    key
}

fn index_entry_key(name: &str, entry: &IndexEntry<'_>) -> Vec<u8> {
    let mut key = index_partition_prefix(name, entry.ipv);
    for part in [entry.isv, entry.pk, entry.sk] {
        encode_sortable_to(part, &mut key);
    }
    key
}

/// The range of keys beginning with `prefix`.
fn prefix_bounds<'a>(prefix: &'a [u8], end: Option<&'a [u8]>) -> (Bound<&'a [u8]>, Bound<&'a [u8]>) {
    (Bound::Included(prefix), end.map_or(Bound::Unbounded, Bound::Excluded))
}

/// A transaction over the `SlugDB` document.
///
/// Reads return owned snapshots. Writes touch one key per item or index
/// entry, so their cost does not grow with the size of the partition.
///
/// Dropping a write transaction without committing rolls it back.
pub struct DocumentTransaction<T: Transaction> {
    storage: T,
}

impl<T: Transaction> DocumentTransaction<T> {
    pub(crate) const fn new(storage: T) -> Self {
        Self { storage }
    }

    /// Check if this is a read-only transaction.
    pub fn is_read_only(&self) -> bool {
        self.storage.is_read_only()
    }

    // ------------------------------------------------------------------
    // Primary table
    // ------------------------------------------------------------------

    /// Get the item stored at `(pk, sk)`.
    pub fn get_item(&self, pk: &Value, sk: &Value) -> Result<Option<Item>> {
        match self.storage.get(names::MAIN, &item_key(pk, sk))? {
            Some(bytes) => Ok(Some(decode_record(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Store `item` at `(pk, sk)`, replacing any item already there.
    pub fn put_item(&mut self, pk: &Value, sk: &Value, item: &Item) -> Result<()> {
        self.storage.put(names::MAIN, &item_key(pk, sk), &encode_record(item)?)?;
        Ok(())
    }

    /// Delete the item at `(pk, sk)`, returning `true` if it existed.
    pub fn delete_item(&mut self, pk: &Value, sk: &Value) -> Result<bool> {
        Ok(self.storage.delete(names::MAIN, &item_key(pk, sk))?)
    }

    /// Load every item of partition `pk`, empty if absent.
    pub fn partition(&self, pk: &Value) -> Result<Partition> {
        let prefix = encode_sortable(pk);
        let end = prefix_end(&prefix);
        let (start, end) = prefix_bounds(&prefix, end.as_deref());

        let mut cursor = self.storage.range(names::MAIN, start, end)?;
        let mut partition = Partition::new();
        while let Some((key, value)) = cursor.next()? {
            let sk = decode_sortable(&key[prefix.len()..])?;
            partition.insert(sk, decode_record(&value)?);
        }
        Ok(partition)
    }

    /// Every partition key in the primary table, in value order.
    ///
    /// Each partition is visited once: after reading its first key the
    /// cursor skips past the rest of its range.
    pub fn partition_keys(&self) -> Result<Vec<Value>> {
        let mut cursor = self.storage.cursor(names::MAIN)?;
        let mut keys = Vec::new();
        let mut entry = cursor.seek_first()?;

        while let Some((key, _)) = entry {
            let (pk, len) = decode_sortable_with_len(&key)?;
            keys.push(pk);
            entry = match prefix_end(&key[..len]) {
                Some(next) => cursor.seek(&next)?,
                None => None,
            };
        }
        Ok(keys)
    }

    // ------------------------------------------------------------------
    // Index registry
    // ------------------------------------------------------------------

    /// Load every registered index schema.
    pub fn indexes(&self) -> Result<IndexRegistry> {
        let mut cursor = self.storage.cursor(names::INDEXES)?;
        let mut registry = IndexRegistry::new();
        while let Some((_, value)) = cursor.next()? {
            let schema: IndexSchema = decode_record(&value)?;
            registry.insert(schema.name.clone(), schema);
        }
        Ok(registry)
    }

    /// Load a single index schema.
    pub fn index_schema(&self, name: &str) -> Result<Option<IndexSchema>> {
        match self.storage.get(names::INDEXES, name.as_bytes())? {
            Some(bytes) => Ok(Some(decode_record(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Register `schema`, replacing any schema with the same name.
    pub fn put_index_schema(&mut self, schema: &IndexSchema) -> Result<()> {
        self.storage.put(names::INDEXES, schema.name.as_bytes(), &encode_record(schema)?)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Index entries
    // ------------------------------------------------------------------

    /// Store `item` as `entry` of index `name`.
    pub fn put_index_entry(
        &mut self,
        name: &str,
        entry: &IndexEntry<'_>,
        item: &Item,
    ) -> Result<()> {
        let key = index_entry_key(name, entry);
        self.storage.put(names::INDEX_DATA, &key, &encode_record(item)?)?;
        Ok(())
    }

    /// Delete `entry` of index `name`, returning `true` if it existed.
    pub fn delete_index_entry(&mut self, name: &str, entry: &IndexEntry<'_>) -> Result<bool> {
        Ok(self.storage.delete(names::INDEX_DATA, &index_entry_key(name, entry))?)
    }

    /// Load the partition of index `name` under `ipv`, empty if absent.
    pub fn index_partition(&self, name: &str, ipv: &Value) -> Result<IndexPartition> {
        let prefix = index_partition_prefix(name, ipv);
        let end = prefix_end(&prefix);
        let (start, end) = prefix_bounds(&prefix, end.as_deref());

        let mut cursor = self.storage.range(names::INDEX_DATA, start, end)?;
        let mut partition = IndexPartition::new();
        while let Some((key, value)) = cursor.next()? {
            let [isv, pk, sk] = decode_sortable_tuple::<3>(&key[prefix.len()..])?;
            partition.insert(isv, pk, sk, decode_record(&value)?);
        }
        Ok(partition)
    }

    /// Remove every entry of index `name`, returning how many were removed.
    ///
    /// The schema itself stays registered.
    pub fn clear_index(&mut self, name: &str) -> Result<usize> {
        let prefix = index_prefix(name);
        let end = prefix_end(&prefix);

        let keys = {
            let (start, end) = prefix_bounds(&prefix, end.as_deref());
            let mut cursor = self.storage.range(names::INDEX_DATA, start, end)?;
            let mut keys = Vec::new();
            while let Some((key, _)) = cursor.next()? {
                keys.push(key);
            }
            keys
        };

        for key in &keys {
            self.storage.delete(names::INDEX_DATA, key)?;
        }
        Ok(keys.len())
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Commit the transaction.
    ///
    /// For read-only transactions this simply releases the snapshot.
    pub fn commit(self) -> Result<()> {
        self.storage.commit()?;
        Ok(())
    }

    /// Roll back the transaction, discarding all changes.
    pub fn rollback(self) -> Result<()> {
        self.storage.rollback()?;
        Ok(())
    }
}
