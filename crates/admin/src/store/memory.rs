//! In-process [`RecordStore`] used by tests and offline runs.
//!
//! Rows live in a `RwLock`-guarded map keyed by table. Every call is
//! recorded so tests can assert exactly what reached the store, and reads
//! or writes can be made to fail on demand.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{Query, RecordStore, Row, RowKey, StoreError, Table};

/// A call observed by [`MemoryStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Select(Query),
    Count(Table),
    Insert { table: Table, row: Row },
    Update { table: Table, key: RowKey, patch: Row },
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<Table, Vec<Row>>>,
    calls: Mutex<Vec<StoreCall>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a table. Non-object values are skipped.
    #[must_use]
    pub fn with_rows(mut self, table: Table, rows: impl IntoIterator<Item = Value>) -> Self {
        let seeded = rows.into_iter().filter_map(|value| match value {
            Value::Object(row) => Some(row),
            _ => None,
        });
        self.tables.get_mut().entry(table).or_default().extend(seeded);
        self
    }

    /// Make every subsequent select and count fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent insert and update fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of a table's rows.
    pub async fn rows(&self, table: Table) -> Vec<Row> {
        self.tables
            .read()
            .await
            .get(&table)
            .cloned()
            .unwrap_or_default()
    }

    /// Every call received so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of recorded calls matching a filter.
    #[must_use]
    pub fn count_calls(&self, filter: impl Fn(&StoreCall) -> bool) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|call| filter(call))
            .count()
    }

    fn record(&self, call: StoreCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    fn check_reads(&self) -> Result<(), StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Api {
                status: 503,
                message: "store unavailable".to_string(),
            });
        }
        Ok(())
    }

    fn check_writes(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Api {
                status: 503,
                message: "store unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn select(&self, query: &Query) -> Result<Vec<Row>, StoreError> {
        self.record(StoreCall::Select(query.clone()));
        self.check_reads()?;
        let tables = self.tables.read().await;
        Ok(tables
            .get(&query.table())
            .map(|rows| query.apply(rows))
            .unwrap_or_default())
    }

    async fn count(&self, table: Table) -> Result<u64, StoreError> {
        self.record(StoreCall::Count(table));
        self.check_reads()?;
        let tables = self.tables.read().await;
        Ok(tables.get(&table).map_or(0, |rows| rows.len() as u64))
    }

    async fn insert(&self, table: Table, row: Row) -> Result<(), StoreError> {
        self.record(StoreCall::Insert {
            table,
            row: row.clone(),
        });
        self.check_writes()?;
        self.tables.write().await.entry(table).or_default().push(row);
        Ok(())
    }

    async fn update(&self, table: Table, key: &RowKey, patch: Row) -> Result<usize, StoreError> {
        self.record(StoreCall::Update {
            table,
            key: key.clone(),
            patch: patch.clone(),
        });
        self.check_writes()?;

        let predicate = key.predicate();
        let mut tables = self.tables.write().await;
        let Some(rows) = tables.get_mut(&table) else {
            return Ok(0);
        };

        let mut changed = 0;
        for row in rows.iter_mut().filter(|row| predicate.matches(row)) {
            for (column, value) in &patch {
                row.insert(column.clone(), value.clone());
            }
            changed += 1;
        }
        Ok(changed)
    }
}
