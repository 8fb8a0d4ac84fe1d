//! Secondary index schemas.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use slugdb_core::{Item, Value};

/// The definition of a named secondary index.
///
/// An index re-keys items by two of their attributes: `partition_attr`
/// becomes the index partition value and `sort_attr` the index sort value.
/// Items lacking either attribute are not indexed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexSchema {
    /// The index name.
    pub name: String,
    /// Attribute projected as the index partition value.
    pub partition_attr: String,
    /// Attribute projected as the index sort value.
    pub sort_attr: String,
}

impl IndexSchema {
    /// Create a new index schema.
    pub fn new(
        name: impl Into<String>,
        partition_attr: impl Into<String>,
        sort_attr: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            partition_attr: partition_attr.into(),
            sort_attr: sort_attr.into(),
        }
    }

    /// The item's `(index partition value, index sort value)`, or `None` if
    /// the item lacks either projected attribute.
    pub fn projection<'a>(&self, item: &'a Item) -> Option<(&'a Value, &'a Value)> {
        Some((item.get(&self.partition_attr)?, item.get(&self.sort_attr)?))
    }

    /// Where `item` sits in this index, or `None` if it lacks a projected
    /// attribute or either primary key.
    pub fn entry<'a>(&self, item: &'a Item) -> Option<IndexEntry<'a>> {
        let (ipv, isv) = self.projection(item)?;
        Some(IndexEntry { ipv, isv, pk: item.pk()?, sk: item.sk()? })
    }
}

/// The position of one item within an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry<'a> {
    /// Index partition value.
    pub ipv: &'a Value,
    /// Index sort value.
    pub isv: &'a Value,
    /// The item's partition key.
    pub pk: &'a Value,
    /// The item's sort key.
    pub sk: &'a Value,
}

/// Every registered index schema, by name.
pub type IndexRegistry = BTreeMap<String, IndexSchema>;
