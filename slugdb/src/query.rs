//! Partition queries.
//!
//! A query reads one partition, either of the primary table or of a named
//! secondary index, and keeps the items that pass two predicates:
//!
//! - **select** sees the sort value: the item's `sk` for the primary table,
//!   or its projected `sort_attr` value for an index
//! - **filter** sees the whole item
//!
//! Both default to accepting everything. Predicates are closures, fallible
//! closures or [`Filter`] expressions, and several of each may be given;
//! an item must pass all of them.
//!
//! # Example
//!
//! ```
//! use slugdb::{Database, Filter, Item, Value};
//!
//! let db = Database::in_memory()?;
//! db.put_item("p1", "a", Item::new().with("n", 1i64))?;
//! db.put_item("p1", "b", Item::new().with("n", 2i64))?;
//! db.put_item("p1", "c", Item::new().with("n", 3i64))?;
//!
//! let items = db
//!     .query("p1")
//!     .select(|sk| sk != &Value::from("a"))
//!     .filter_by(Filter::lt("n", 3i64))
//!     .execute()?;
//!
//! assert_eq!(items.len(), 1);
//! assert_eq!(items[0].sk(), Some(&Value::from("b")));
//! # Ok::<(), slugdb::Error>(())
//! ```

use std::convert::Infallible;
use std::fmt;

use slugdb_core::{Item, Value};
use slugdb_storage::Transaction;
use tracing::debug;

use crate::database::Database;
use crate::error::{BoxError, Error, Result};
use crate::filter::Filter;
use crate::transaction::DocumentTransaction;

/// Where a query reads its partition from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum QueryTarget {
    /// The primary table.
    #[default]
    Main,
    /// The named secondary index.
    Index(String),
}

impl fmt::Display for QueryTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Main => f.write_str("main"),
            Self::Index(name) => write!(f, "index {name}"),
        }
    }
}

type SelectFn<'a> = Box<dyn Fn(&Value) -> std::result::Result<bool, BoxError> + 'a>;
type FilterFn<'a> = Box<dyn Fn(&Item) -> std::result::Result<bool, BoxError> + 'a>;

/// The predicates and bounds of a query, independent of any database.
#[derive(Default)]
pub(crate) struct QueryPlan<'a> {
    selects: Vec<SelectFn<'a>>,
    filters: Vec<FilterFn<'a>>,
    limit: Option<usize>,
}

impl<'a> QueryPlan<'a> {
    fn push_select<F, E>(&mut self, select: F)
    where
        F: Fn(&Value) -> std::result::Result<bool, E> + 'a,
        E: Into<BoxError>,
    {
        self.selects.push(Box::new(move |value| select(value).map_err(Into::into)));
    }

    fn push_filter<F, E>(&mut self, filter: F)
    where
        F: Fn(&Item) -> std::result::Result<bool, E> + 'a,
        E: Into<BoxError>,
    {
        self.filters.push(Box::new(move |item| filter(item).map_err(Into::into)));
    }

    fn selects(&self, sort_value: &Value) -> Result<bool> {
        for select in &self.selects {
            if !select(sort_value).map_err(Error::Predicate)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn filters(&self, item: &Item) -> Result<bool> {
        for filter in &self.filters {
            if !filter(item).map_err(Error::Predicate)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Keep the candidates that pass every predicate, up to the limit.
    fn collect<'i>(
        &self,
        candidates: impl Iterator<Item = (&'i Value, &'i Item)>,
    ) -> Result<Vec<Item>> {
        let limit = self.limit.unwrap_or(usize::MAX);
        let mut results = Vec::new();
        for (sort_value, item) in candidates {
            if results.len() >= limit {
                break;
            }
            if self.selects(sort_value)? && self.filters(item)? {
                results.push(item.clone());
            }
        }
        Ok(results)
    }

    /// Run the plan against one partition of `target`.
    pub(crate) fn run<T: Transaction>(
        &self,
        tx: &DocumentTransaction<T>,
        partition_value: &Value,
        target: &QueryTarget,
    ) -> Result<Vec<Item>> {
        match target {
            QueryTarget::Main => {
                let partition = tx.partition(partition_value)?;
                self.collect(partition.iter())
            }
            QueryTarget::Index(name) => {
                if tx.index_schema(name)?.is_none() {
                    return Err(Error::IndexNotFound(name.clone()));
                }
                let partition = tx.index_partition(name, partition_value)?;
                self.collect(partition.iter())
            }
        }
    }
}

/// Builder for partition queries.
///
/// Created by [`Database::query`]. Nothing is read until
/// [`execute`](Self::execute) is called.
pub struct QueryBuilder<'a> {
    db: &'a Database,
    partition_value: Value,
    target: QueryTarget,
    plan: QueryPlan<'a>,
}

impl<'a> QueryBuilder<'a> {
    pub(crate) fn new(db: &'a Database, partition_value: Value) -> Self {
        Self { db, partition_value, target: QueryTarget::Main, plan: QueryPlan::default() }
    }

    /// Query the named secondary index instead of the primary table.
    #[must_use]
    pub fn index(self, name: impl Into<String>) -> Self {
        self.target(QueryTarget::Index(name.into()))
    }

    /// Set the query target.
    #[must_use]
    pub fn target(mut self, target: QueryTarget) -> Self {
        self.target = target;
        self
    }

    /// Keep only items whose sort value satisfies `select`.
    #[must_use]
    pub fn select<F>(mut self, select: F) -> Self
    where
        F: Fn(&Value) -> bool + 'a,
    {
        self.plan.push_select(move |value| Ok::<_, Infallible>(select(value)));
        self
    }

    /// Like [`select`](Self::select), but the predicate may fail.
    ///
    /// A failure aborts the query with [`Error::Predicate`].
    #[must_use]
    pub fn try_select<F, E>(mut self, select: F) -> Self
    where
        F: Fn(&Value) -> std::result::Result<bool, E> + 'a,
        E: Into<BoxError>,
    {
        self.plan.push_select(select);
        self
    }

    /// Keep only items that satisfy `filter`.
    #[must_use]
    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Item) -> bool + 'a,
    {
        self.plan.push_filter(move |item| Ok::<_, Infallible>(filter(item)));
        self
    }

    /// Like [`filter`](Self::filter), but the predicate may fail.
    ///
    /// A failure aborts the query with [`Error::Predicate`].
    #[must_use]
    pub fn try_filter<F, E>(mut self, filter: F) -> Self
    where
        F: Fn(&Item) -> std::result::Result<bool, E> + 'a,
        E: Into<BoxError>,
    {
        self.plan.push_filter(filter);
        self
    }

    /// Keep only items matching a [`Filter`] expression.
    #[must_use]
    pub fn filter_by(self, filter: Filter) -> Self {
        self.filter(move |item| filter.matches(item))
    }

    /// Return at most `limit` items.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.plan.limit = Some(limit);
        self
    }

    /// Run the query against a read snapshot.
    ///
    /// Items are returned in key order: by `sk` for the primary table, and by
    /// `(sort value, pk, sk)` for an index.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The target index is not registered ([`Error::IndexNotFound`])
    /// - A predicate fails ([`Error::Predicate`])
    /// - A storage error occurs
    pub fn execute(self) -> Result<Vec<Item>> {
        let Self { db, partition_value, target, plan } = self;

        let items = db
            .transaction_manager()
            .read(|tx| plan.run(tx, &partition_value, &target))?;

        debug!(partition = %partition_value, %target, results = items.len(), "query executed");
        Ok(items)
    }
}
