//! Filter expressions for queries.
//!
//! A [`Filter`] is a declarative predicate over item attributes. It can be
//! used as the filter step of a query through
//! [`QueryBuilder::filter_by`](crate::QueryBuilder::filter_by).
//!
//! # Example
//!
//! ```
//! use slugdb::{Filter, Item};
//!
//! let filter = Filter::and([
//!     Filter::eq("status", "active"),
//!     Filter::gte("rating", 4),
//! ]);
//!
//! let item = Item::new().with("status", "active").with("rating", 4.5);
//! assert!(filter.matches(&item));
//! ```

use std::cmp::Ordering;

use slugdb_core::{Item, Value};

/// A filter expression over item attributes.
///
/// Field names may use dot notation to reach into nested maps
/// (e.g. `"meta.author"`). A field that is absent never satisfies a
/// comparison, but does satisfy the negative filters `Ne`, `NotIn` and
/// `NotExists`.
///
/// Comparisons between an `Int` and a `Float` compare numerically. Other
/// comparisons only hold between values of the same type, using the value
/// ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Match items where field equals value.
    Eq {
        /// The field path.
        field: String,
        /// The value to match.
        value: Value,
    },

    /// Match items where field does not equal value.
    Ne {
        /// The field path.
        field: String,
        /// The value that should not match.
        value: Value,
    },

    /// Match items where field is greater than value.
    Gt {
        /// The field path.
        field: String,
        /// The threshold value (exclusive).
        value: Value,
    },

    /// Match items where field is greater than or equal to value.
    Gte {
        /// The field path.
        field: String,
        /// The threshold value (inclusive).
        value: Value,
    },

    /// Match items where field is less than value.
    Lt {
        /// The field path.
        field: String,
        /// The threshold value (exclusive).
        value: Value,
    },

    /// Match items where field is less than or equal to value.
    Lte {
        /// The field path.
        field: String,
        /// The threshold value (inclusive).
        value: Value,
    },

    /// Match items where field is within an inclusive range.
    Range {
        /// The field path.
        field: String,
        /// The minimum value (inclusive).
        min: Option<Value>,
        /// The maximum value (inclusive).
        max: Option<Value>,
    },

    /// Match items where field value is in the given set.
    In {
        /// The field path.
        field: String,
        /// The set of values to match.
        values: Vec<Value>,
    },

    /// Match items where field value is not in the given set.
    NotIn {
        /// The field path.
        field: String,
        /// The set of values to exclude.
        values: Vec<Value>,
    },

    /// Match items where a string or symbol field contains a substring.
    Contains {
        /// The field path.
        field: String,
        /// The substring to search for.
        substring: String,
    },

    /// Match items where a string or symbol field starts with a prefix.
    StartsWith {
        /// The field path.
        field: String,
        /// The prefix to match.
        prefix: String,
    },

    /// Match items where an array field contains value.
    ArrayContains {
        /// The field path.
        field: String,
        /// The value to find in the array.
        value: Value,
    },

    /// Match items where field is present and not null.
    Exists {
        /// The field path.
        field: String,
    },

    /// Match items where field is absent or null.
    NotExists {
        /// The field path.
        field: String,
    },

    /// Match items where all conditions are true.
    And(Vec<Filter>),

    /// Match items where any condition is true.
    Or(Vec<Filter>),

    /// Match items where condition is false.
    Not(Box<Filter>),
}

impl Filter {
    /// Create an equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq { field: field.into(), value: value.into() }
    }

    /// Create a not-equal filter.
    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Ne { field: field.into(), value: value.into() }
    }

    /// Create a greater-than filter.
    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Gt { field: field.into(), value: value.into() }
    }

    /// Create a greater-than-or-equal filter.
    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Gte { field: field.into(), value: value.into() }
    }

    /// Create a less-than filter.
    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Lt { field: field.into(), value: value.into() }
    }

    /// Create a less-than-or-equal filter.
    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Lte { field: field.into(), value: value.into() }
    }

    /// Create an inclusive range filter.
    ///
    /// At least one of `min` or `max` should be specified.
    ///
    /// # Example
    ///
    /// ```
    /// use slugdb::{Filter, Value};
    ///
    /// // Age at least 18
    /// let filter = Filter::range("age", Some(Value::Int(18)), None);
    /// ```
    pub fn range(field: impl Into<String>, min: Option<Value>, max: Option<Value>) -> Self {
        Self::Range { field: field.into(), min, max }
    }

    /// Create an "in" filter (field value in set).
    ///
    /// # Example
    ///
    /// ```
    /// use slugdb::Filter;
    ///
    /// let filter = Filter::in_set("category", ["fiction", "non-fiction"]);
    /// ```
    pub fn in_set<V: Into<Value>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::In { field: field.into(), values: values.into_iter().map(Into::into).collect() }
    }

    /// Create a "not in" filter (field value not in set).
    pub fn not_in<V: Into<Value>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::NotIn { field: field.into(), values: values.into_iter().map(Into::into).collect() }
    }

    /// Create a "contains" filter for string fields.
    pub fn contains(field: impl Into<String>, substring: impl Into<String>) -> Self {
        Self::Contains { field: field.into(), substring: substring.into() }
    }

    /// Create a "starts with" filter for string fields.
    pub fn starts_with(field: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::StartsWith { field: field.into(), prefix: prefix.into() }
    }

    /// Create an "array contains" filter.
    pub fn array_contains(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::ArrayContains { field: field.into(), value: value.into() }
    }

    /// Create an "exists" filter (field is present and not null).
    pub fn exists(field: impl Into<String>) -> Self {
        Self::Exists { field: field.into() }
    }

    /// Create a "not exists" filter (field is absent or null).
    pub fn not_exists(field: impl Into<String>) -> Self {
        Self::NotExists { field: field.into() }
    }

    /// Create an AND filter combining multiple conditions.
    pub fn and(filters: impl IntoIterator<Item = Filter>) -> Self {
        Self::And(filters.into_iter().collect())
    }

    /// Create an OR filter combining multiple conditions.
    pub fn or(filters: impl IntoIterator<Item = Filter>) -> Self {
        Self::Or(filters.into_iter().collect())
    }

    /// Create a NOT filter negating a condition.
    pub fn not(filter: Filter) -> Self {
        Self::Not(Box::new(filter))
    }

    /// Combine this filter with another using AND.
    #[must_use]
    pub fn and_then(self, other: Filter) -> Self {
        match self {
            Self::And(mut filters) => {
                filters.push(other);
                Self::And(filters)
            }
            _ => Self::And(vec![self, other]),
        }
    }

    /// Combine this filter with another using OR.
    #[must_use]
    pub fn or_else(self, other: Filter) -> Self {
        match self {
            Self::Or(mut filters) => {
                filters.push(other);
                Self::Or(filters)
            }
            _ => Self::Or(vec![self, other]),
        }
    }

    /// Evaluate this filter against an item.
    #[must_use]
    pub fn matches(&self, item: &Item) -> bool {
        match self {
            Self::Eq { field, value } => {
                get_field(item, field).is_some_and(|v| values_equal(v, value))
            }

            Self::Ne { field, value } => {
                get_field(item, field).map_or(true, |v| !values_equal(v, value))
            }

            Self::Gt { field, value } => compare_field(item, field, value, Ordering::is_gt),

            Self::Gte { field, value } => compare_field(item, field, value, Ordering::is_ge),

            Self::Lt { field, value } => compare_field(item, field, value, Ordering::is_lt),

            Self::Lte { field, value } => compare_field(item, field, value, Ordering::is_le),

            Self::Range { field, min, max } => get_field(item, field).is_some_and(|v| {
                let above_min =
                    min.as_ref().map_or(true, |m| compare(v, m).is_some_and(Ordering::is_ge));
                let below_max =
                    max.as_ref().map_or(true, |m| compare(v, m).is_some_and(Ordering::is_le));
                above_min && below_max
            }),

            Self::In { field, values } => get_field(item, field)
                .is_some_and(|v| values.iter().any(|val| values_equal(v, val))),

            Self::NotIn { field, values } => get_field(item, field)
                .map_or(true, |v| !values.iter().any(|val| values_equal(v, val))),

            Self::Contains { field, substring } => get_field(item, field)
                .and_then(Value::as_text)
                .is_some_and(|s| s.contains(substring.as_str())),

            Self::StartsWith { field, prefix } => get_field(item, field)
                .and_then(Value::as_text)
                .is_some_and(|s| s.starts_with(prefix.as_str())),

            Self::ArrayContains { field, value } => get_field(item, field)
                .and_then(Value::as_array)
                .is_some_and(|arr| arr.iter().any(|element| values_equal(element, value))),

            Self::Exists { field } => get_field(item, field).is_some_and(|v| !v.is_null()),

            Self::NotExists { field } => get_field(item, field).map_or(true, Value::is_null),

            Self::And(filters) => filters.iter().all(|f| f.matches(item)),

            Self::Or(filters) => filters.iter().any(|f| f.matches(item)),

            Self::Not(filter) => !filter.matches(item),
        }
    }
}

/// Get a field value from an item by path.
///
/// Supports dot notation for nested maps (e.g., "meta.author"). An
/// attribute whose name contains a dot is matched before descending.
fn get_field<'a>(item: &'a Item, field: &str) -> Option<&'a Value> {
    if let Some(value) = item.get(field) {
        return Some(value);
    }

    let mut parts = field.split('.');
    let mut current = item.get(parts.next()?)?;
    for part in parts {
        current = current.as_map()?.get(part)?;
    }
    Some(current)
}

/// Order two values, or `None` if they are not comparable.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            a.as_number()?.partial_cmp(&b.as_number()?)
        }
        _ if a.type_name() == b.type_name() => Some(a.cmp(b)),
        _ => None,
    }
}

fn compare_field(item: &Item, field: &str, value: &Value, accept: fn(Ordering) -> bool) -> bool {
    get_field(item, field).and_then(|v| compare(v, value)).is_some_and(accept)
}

/// Compare two values for equality, treating `Int` and `Float` numerically.
#[allow(clippy::cast_precision_loss, clippy::float_cmp)]
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(x), Value::Float(y)) | (Value::Float(y), Value::Int(x)) => *x as f64 == *y,
        _ => a == b,
    }
}
