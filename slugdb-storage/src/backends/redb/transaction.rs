//! Redb transaction implementation.
//!
//! This module provides the `RedbTransaction` type which implements the
//! `Transaction` trait for both read-only and read-write transactions.
//!
//! # Memory-Efficient Cursors
//!
//! Cursors stream a table in batches (default 1000 entries) instead of
//! materializing it, fetching the next batch on demand as they advance.

use std::ops::Bound;

use redb::{ReadTransaction, ReadableTable, WriteTransaction};

use crate::engine::{Cursor, CursorResult, KeyValue, StorageError, Transaction};

use super::tables::{decode_key, encode_key, table_end_key, table_start_key, DATA_TABLE};

/// Default batch size for cursor operations.
const DEFAULT_BATCH_SIZE: usize = 1000;

fn internal(e: impl std::fmt::Display) -> StorageError {
    StorageError::Internal(e.to_string())
}

/// A transaction for the Redb storage engine.
///
/// This type wraps both read-only and read-write Redb transactions,
/// providing a unified interface through the `Transaction` trait.
#[allow(clippy::large_enum_variant)]
pub enum RedbTransaction {
    /// A read-only transaction.
    Read(ReadTransaction),
    /// A read-write transaction.
    Write(WriteTransaction),
}

impl RedbTransaction {
    /// Create a new read-only transaction.
    pub const fn new_read(tx: ReadTransaction) -> Self {
        Self::Read(tx)
    }

    /// Create a new read-write transaction.
    pub const fn new_write(tx: WriteTransaction) -> Self {
        Self::Write(tx)
    }

    /// Fetch up to `limit` entries of a logical table within the given
    /// logical key bounds, in ascending key order.
    fn fetch_batch(
        &self,
        table: &str,
        start: Bound<&[u8]>,
        end: Bound<&[u8]>,
        limit: usize,
    ) -> Result<Vec<KeyValue>, StorageError> {
        let start = match start {
            Bound::Included(k) => Bound::Included(encode_key(table, k)),
            Bound::Excluded(k) => Bound::Excluded(encode_key(table, k)),
            Bound::Unbounded => Bound::Included(table_start_key(table)),
        };
        let end = match end {
            Bound::Included(k) => Bound::Included(encode_key(table, k)),
            Bound::Excluded(k) => Bound::Excluded(encode_key(table, k)),
            Bound::Unbounded => Bound::Excluded(table_end_key(table)),
        };

        if is_empty_range(&start, &end) {
            return Ok(Vec::new());
        }

        let bounds = (start.as_ref().map(Vec::as_slice), end.as_ref().map(Vec::as_slice));

        match self {
            Self::Read(tx) => match tx.open_table(DATA_TABLE) {
                Ok(t) => scan(&t, bounds, limit),
                // No data table means no data, which is not an error
                Err(redb::TableError::TableDoesNotExist(_)) => Ok(Vec::new()),
                Err(e) => Err(internal(e)),
            },
            Self::Write(tx) => {
                let t = tx.open_table(DATA_TABLE).map_err(internal)?;
                scan(&t, bounds, limit)
            }
        }
    }
}

/// Returns `true` if no key can satisfy both bounds.
fn is_empty_range(start: &Bound<Vec<u8>>, end: &Bound<Vec<u8>>) -> bool {
    match (start, end) {
        (Bound::Included(s), Bound::Included(e)) => s > e,
        (Bound::Included(s) | Bound::Excluded(s), Bound::Excluded(e))
        | (Bound::Excluded(s), Bound::Included(e)) => s >= e,
        _ => false,
    }
}

fn lookup<T>(table: &T, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError>
where
    T: ReadableTable<&'static [u8], &'static [u8]>,
{
    let value = table.get(key).map_err(internal)?;
    Ok(value.map(|v| v.value().to_vec()))
}

fn scan<T>(
    table: &T,
    bounds: (Bound<&[u8]>, Bound<&[u8]>),
    limit: usize,
) -> Result<Vec<KeyValue>, StorageError>
where
    T: ReadableTable<&'static [u8], &'static [u8]>,
{
    let range = table.range::<&[u8]>(bounds).map_err(internal)?;

    let mut entries = Vec::with_capacity(limit.min(1024));
    for result in range.take(limit) {
        let (k, v) = result.map_err(internal)?;
        if let Some((_, key)) = decode_key(k.value()) {
            entries.push((key.to_vec(), v.value().to_vec()));
        }
    }
    Ok(entries)
}

impl Transaction for RedbTransaction {
    type Cursor<'a>
        = RedbCursor<'a>
    where
        Self: 'a;

    fn get(&self, table: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        let encoded_key = encode_key(table, key);

        match self {
            Self::Read(tx) => match tx.open_table(DATA_TABLE) {
                Ok(t) => lookup(&t, &encoded_key),
                Err(redb::TableError::TableDoesNotExist(_)) => Ok(None),
                Err(e) => Err(internal(e)),
            },
            Self::Write(tx) => {
                let t = tx.open_table(DATA_TABLE).map_err(internal)?;
                lookup(&t, &encoded_key)
            }
        }
    }

    fn put(&mut self, table: &str, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        match self {
            Self::Read(_) => Err(StorageError::ReadOnly),
            Self::Write(tx) => {
                let encoded_key = encode_key(table, key);
                let mut t = tx.open_table(DATA_TABLE).map_err(internal)?;
                t.insert(encoded_key.as_slice(), value).map_err(internal)?;
                Ok(())
            }
        }
    }

    fn delete(&mut self, table: &str, key: &[u8]) -> Result<bool, StorageError> {
        match self {
            Self::Read(_) => Err(StorageError::ReadOnly),
            Self::Write(tx) => {
                let encoded_key = encode_key(table, key);
                let mut t = tx.open_table(DATA_TABLE).map_err(internal)?;
                let removed = t.remove(encoded_key.as_slice()).map_err(internal)?;
                Ok(removed.is_some())
            }
        }
    }

    fn cursor(&self, table: &str) -> Result<Self::Cursor<'_>, StorageError> {
        Ok(RedbCursor::new(self, table, Bound::Unbounded, Bound::Unbounded, DEFAULT_BATCH_SIZE))
    }

    fn range(
        &self,
        table: &str,
        start: Bound<&[u8]>,
        end: Bound<&[u8]>,
    ) -> Result<Self::Cursor<'_>, StorageError> {
        Ok(RedbCursor::new(
            self,
            table,
            start.map(<[u8]>::to_vec),
            end.map(<[u8]>::to_vec),
            DEFAULT_BATCH_SIZE,
        ))
    }

    fn commit(self) -> Result<(), StorageError> {
        match self {
            // Read transactions don't need explicit commit
            Self::Read(_) => Ok(()),
            Self::Write(tx) => tx.commit().map_err(|e| StorageError::Transaction(e.to_string())),
        }
    }

    fn rollback(self) -> Result<(), StorageError> {
        match self {
            Self::Read(_) => Ok(()),
            Self::Write(tx) => tx.abort().map_err(|e| StorageError::Transaction(e.to_string())),
        }
    }

    fn is_read_only(&self) -> bool {
        matches!(self, Self::Read(_))
    }
}

/// A forward cursor over a logical table in Redb.
///
/// At any time the cursor holds at most one batch of entries in memory.
pub struct RedbCursor<'a> {
    tx: &'a RedbTransaction,
    table: String,
    start: Bound<Vec<u8>>,
    end: Bound<Vec<u8>>,
    batch: Vec<KeyValue>,
    position: Option<usize>,
    batch_size: usize,
    /// Whether entries may follow the current batch.
    has_more: bool,
    /// Whether the cursor has been positioned at least once.
    started: bool,
}

impl<'a> RedbCursor<'a> {
    fn new(
        tx: &'a RedbTransaction,
        table: &str,
        start: Bound<Vec<u8>>,
        end: Bound<Vec<u8>>,
        batch_size: usize,
    ) -> Self {
        Self {
            tx,
            table: table.to_owned(),
            start,
            end,
            batch: Vec::new(),
            position: None,
            batch_size,
            has_more: true,
            started: false,
        }
    }

    /// Replace the batch with entries starting at `from`.
    fn load_from(&mut self, from: &Bound<Vec<u8>>) -> Result<(), StorageError> {
        self.started = true;
        self.batch = self.tx.fetch_batch(
            &self.table,
            from.as_ref().map(Vec::as_slice),
            self.end.as_ref().map(Vec::as_slice),
            self.batch_size,
        )?;
        self.has_more = self.batch.len() >= self.batch_size;
        self.position = if self.batch.is_empty() { None } else { Some(0) };
        Ok(())
    }

    fn entry(&self) -> Option<KeyValue> {
        self.position.and_then(|pos| self.batch.get(pos).cloned())
    }
}

impl Cursor for RedbCursor<'_> {
    fn seek(&mut self, key: &[u8]) -> CursorResult {
        // Never move before the cursor's own start bound
        let from = match &self.start {
            Bound::Included(start) if start.as_slice() > key => Bound::Included(start.clone()),
            Bound::Excluded(start) if start.as_slice() >= key => Bound::Excluded(start.clone()),
            _ => Bound::Included(key.to_vec()),
        };
        self.load_from(&from)?;
        Ok(self.entry())
    }

    fn seek_first(&mut self) -> CursorResult {
        let from = self.start.clone();
        self.load_from(&from)?;
        Ok(self.entry())
    }

    fn next(&mut self) -> CursorResult {
        let Some(pos) = self.position else {
            if self.started {
                return Ok(None);
            }
            return self.seek_first();
        };

        if pos + 1 < self.batch.len() {
            self.position = Some(pos + 1);
            return Ok(self.entry());
        }

        if !self.has_more {
            self.position = None;
            return Ok(None);
        }

        let after = Bound::Excluded(self.batch[pos].0.clone());
        self.load_from(&after)?;
        Ok(self.entry())
    }

    fn current(&self) -> Option<(&[u8], &[u8])> {
        self.position
            .and_then(|pos| self.batch.get(pos))
            .map(|(k, v)| (k.as_slice(), v.as_slice()))
    }
}
