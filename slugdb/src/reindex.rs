//! Full index rebuilds.
//!
//! A reindex clears every registered index and rebuilds it from the
//! primary table, so its result matches an index built from scratch.

use slugdb_core::{Item, Value, PARTITION_KEY, SORT_KEY};
use slugdb_storage::StorageEngine;
use tracing::info;

use crate::config::ReindexScope;
use crate::error::Result;
use crate::index::{IndexMaintenance, IndexRegistry};
use crate::transaction::TransactionManager;

/// Counters reported by a reindex.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReindexStats {
    /// Primary items visited.
    pub items_scanned: usize,
    /// Index entries written, summed over all indexes.
    pub entries_written: usize,
}

/// An item as stored, with its primary keys forced to its location.
fn located(pk: &Value, sk: &Value, item: &Item) -> Item {
    item.clone().with(PARTITION_KEY, pk.clone()).with(SORT_KEY, sk.clone())
}

/// Rebuild every registered index from the primary table.
pub(crate) fn rebuild<E: StorageEngine>(
    manager: &TransactionManager<E>,
    scope: ReindexScope,
) -> Result<ReindexStats> {
    info!(?scope, "reindex started");

    let stats = match scope {
        ReindexScope::Atomic => rebuild_atomic(manager)?,
        ReindexScope::PerRecord => rebuild_per_record(manager)?,
    };

    info!(
        items_scanned = stats.items_scanned,
        entries_written = stats.entries_written,
        "reindex finished"
    );
    Ok(stats)
}

/// Clear every index, returning the registry that was cleared.
fn clear_all<E: StorageEngine>(manager: &TransactionManager<E>) -> Result<IndexRegistry> {
    manager.transact(|tx| {
        let registry = tx.indexes()?;
        for name in registry.keys() {
            tx.clear_index(name)?;
        }
        Ok(registry)
    })
}

/// Clear and rebuild in one write scope.
fn rebuild_atomic<E: StorageEngine>(manager: &TransactionManager<E>) -> Result<ReindexStats> {
    manager.transact(|tx| {
        let registry = tx.indexes()?;
        for name in registry.keys() {
            tx.clear_index(name)?;
        }

        let mut stats = ReindexStats::default();
        for pk in tx.partition_keys()? {
            for (sk, item) in &tx.partition(&pk)? {
                stats.items_scanned += 1;
                let item = located(&pk, sk, item);
                stats.entries_written += IndexMaintenance::index_all(tx, &item, &registry)?;
            }
        }
        Ok(stats)
    })
}

/// Clear in one write scope, then index each primary item in its own.
///
/// Each item is re-read inside its scope, so items deleted since the scan
/// are skipped and items overwritten since the scan are indexed as they are
/// now.
fn rebuild_per_record<E: StorageEngine>(manager: &TransactionManager<E>) -> Result<ReindexStats> {
    let registry = clear_all(manager)?;
    let mut stats = ReindexStats::default();

    for pk in manager.read(|tx| tx.partition_keys())? {
        let sort_keys: Vec<Value> = manager.read(|tx| {
            let partition = tx.partition(&pk)?;
            Ok(partition.iter().map(|(sk, _)| sk.clone()).collect())
        })?;

        for sk in sort_keys {
            let written = manager.transact(|tx| {
                let Some(item) = tx.get_item(&pk, &sk)? else {
                    return Ok(None);
                };
                let item = located(&pk, &sk, &item);
                IndexMaintenance::index_all(tx, &item, &registry).map(Some)
            })?;

            if let Some(written) = written {
                stats.items_scanned += 1;
                stats.entries_written += written;
            }
        }
    }

    Ok(stats)
}
