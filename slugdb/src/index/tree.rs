//! In-memory results of partition scans.
//!
//! Items and index entries are stored one per key, so a partition only
//! exists in memory as the result of a prefix scan. A [`Partition`] holds
//! the items of one primary partition keyed by sort key. An
//! [`IndexPartition`] holds one index partition keyed by `(isv, pk, sk)`;
//! the trailing primary keys keep items with equal projections apart.

use std::collections::btree_map;
use std::collections::BTreeMap;

use slugdb_core::{Item, Value};

/// The items of one primary partition, keyed by sort key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    items: BTreeMap<Value, Item>,
}

impl Partition {
    /// Create an empty partition.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: BTreeMap::new() }
    }

    /// Get the item stored under `sk`.
    pub fn get(&self, sk: &Value) -> Option<&Item> {
        self.items.get(sk)
    }

    /// Store `item` under `sk`, returning the item it replaced.
    pub fn insert(&mut self, sk: Value, item: Item) -> Option<Item> {
        self.items.insert(sk, item)
    }

    /// Number of items in the partition.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the partition holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over `(sk, item)` pairs in sort key order.
    pub fn iter(&self) -> btree_map::Iter<'_, Value, Item> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a Partition {
    type Item = (&'a Value, &'a Item);
    type IntoIter = btree_map::Iter<'a, Value, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Position of an item within one index partition.
pub type EntryKey = (Value, Value, Value);

/// One partition of a secondary index: `(isv, pk, sk) -> item`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexPartition {
    entries: BTreeMap<EntryKey, Item>,
}

impl IndexPartition {
    /// Create an empty index partition.
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: BTreeMap::new() }
    }

    /// Store `item` under `(isv, pk, sk)`, returning the item it replaced.
    pub fn insert(&mut self, isv: Value, pk: Value, sk: Value, item: Item) -> Option<Item> {
        self.entries.insert((isv, pk, sk), item)
    }

    /// Get the item stored under `(isv, pk, sk)`.
    pub fn get(&self, isv: &Value, pk: &Value, sk: &Value) -> Option<&Item> {
        self.entries.get(&(isv.clone(), pk.clone(), sk.clone()))
    }

    /// Returns `true` if the index partition holds no items.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of items in the index partition.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate over `(isv, item)` pairs ordered by `(isv, pk, sk)`.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Item)> {
        self.entries.iter().map(|((isv, _, _), item)| (isv, item))
    }
}
