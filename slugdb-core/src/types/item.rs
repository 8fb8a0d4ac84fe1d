//! Schemaless item records.

use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Value;
use crate::error::CoreError;

/// Reserved attribute holding an item's partition key.
pub const PARTITION_KEY: &str = "pk";

/// Reserved attribute holding an item's sort key.
pub const SORT_KEY: &str = "sk";

/// An open record of named attributes.
///
/// Items are schemaless: any attribute name may map to any [`Value`],
/// including nested arrays and maps. Once written to a database every item
/// carries its partition key under [`PARTITION_KEY`] and its sort key under
/// [`SORT_KEY`].
///
/// # Example
///
/// ```
/// use slugdb_core::{Item, Value};
///
/// let item = Item::new()
///     .with("name", "Alice")
///     .with("age", 30i64)
///     .with_keys("user#alice", "profile#");
///
/// assert_eq!(item.pk(), Some(&Value::from("user#alice")));
/// assert_eq!(item.get("age"), Some(&Value::Int(30)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item {
    attributes: BTreeMap<String, Value>,
}

impl Item {
    /// Create an empty item.
    #[must_use]
    pub const fn new() -> Self {
        Self { attributes: BTreeMap::new() }
    }

    /// Add an attribute to this item.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the reserved key attributes, replacing any attributes of the same
    /// name.
    #[must_use]
    pub fn with_keys(mut self, pk: impl Into<Value>, sk: impl Into<Value>) -> Self {
        self.attributes.insert(PARTITION_KEY.to_owned(), pk.into());
        self.attributes.insert(SORT_KEY.to_owned(), sk.into());
        self
    }

    /// Get an attribute value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Set an attribute value, returning the previous value if any.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.attributes.insert(name.into(), value.into())
    }

    /// Remove an attribute, returning its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.attributes.remove(name)
    }

    /// Check whether the item has an attribute, regardless of its value.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// The partition key, if the item has one.
    #[must_use]
    pub fn pk(&self) -> Option<&Value> {
        self.get(PARTITION_KEY)
    }

    /// The sort key, if the item has one.
    #[must_use]
    pub fn sk(&self) -> Option<&Value> {
        self.get(SORT_KEY)
    }

    /// Number of attributes, including the reserved keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns `true` if the item has no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Iterate over attributes in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.attributes.iter()
    }

    /// Borrow the underlying attribute map.
    #[must_use]
    pub const fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    /// Consume the item, returning its attribute map.
    #[must_use]
    pub fn into_attributes(self) -> BTreeMap<String, Value> {
        self.attributes
    }
}

impl From<BTreeMap<String, Value>> for Item {
    fn from(attributes: BTreeMap<String, Value>) -> Self {
        Self { attributes }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Item {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { attributes: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

impl IntoIterator for Item {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.into_iter()
    }
}

impl<'a> IntoIterator for &'a Item {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.iter()
    }
}

impl TryFrom<serde_json::Value> for Item {
    type Error = CoreError;

    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        match Value::from(json) {
            Value::Map(attributes) => Ok(Self { attributes }),
            other => Err(CoreError::TypeMismatch {
                expected: "map".to_owned(),
                actual: other.type_name().to_owned(),
            }),
        }
    }
}
