//! Per-table read cache in front of the record store.
//!
//! Every list view shares one [`Collections`]. Reads are cached per table,
//! keyed by the full [`Query`], for a configurable TTL. Writes go through
//! here too and, once the store confirms them, drop every cached read of the
//! affected table so the next fetch sees fresh data.
//!
//! Each table also carries an epoch that every invalidation bumps. A read
//! that overlapped an invalidation is returned to its caller but never
//! cached.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{Query, RecordStore, Row, RowKey, StoreError, Table, decode_rows};

/// Queries cached per table.
const MAX_QUERIES_PER_TABLE: u64 = 256;

/// Shared store handle with per-table caches.
#[derive(Clone)]
pub struct Collections {
    inner: Arc<CollectionsInner>,
}

struct CollectionsInner {
    store: Arc<dyn RecordStore>,
    caches: HashMap<Table, TableCache>,
}

struct TableCache {
    rows: Cache<Query, Arc<Vec<Row>>>,
    epoch: AtomicU64,
}

impl TableCache {
    fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }
}

impl Collections {
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, ttl: Duration) -> Self {
        let caches = Table::ALL
            .into_iter()
            .map(|table| {
                let rows = Cache::builder()
                    .max_capacity(MAX_QUERIES_PER_TABLE)
                    .time_to_live(ttl)
                    .build();
                let cache = TableCache {
                    rows,
                    epoch: AtomicU64::new(0),
                };
                (table, cache)
            })
            .collect();

        Self {
            inner: Arc::new(CollectionsInner { store, caches }),
        }
    }

    /// The underlying store, bypassing the cache.
    #[must_use]
    pub fn store(&self) -> &dyn RecordStore {
        self.inner.store.as_ref()
    }

    /// Run a select, serving repeated queries from cache.
    ///
    /// # Errors
    ///
    /// Propagates store errors. Failed reads are not cached.
    pub async fn select(&self, query: &Query) -> Result<Arc<Vec<Row>>, StoreError> {
        let Some(cache) = self.cache(query.table()) else {
            return Ok(Arc::new(self.inner.store.select(query).await?));
        };

        if let Some(rows) = cache.rows.get(query).await {
            debug!(table = %query.table(), "Cache hit");
            return Ok(rows);
        }

        let epoch = cache.epoch();
        let rows = Arc::new(self.inner.store.select(query).await?);
        if cache.epoch() != epoch {
            debug!(table = %query.table(), "Read overlapped a write, not cached");
            return Ok(rows);
        }

        cache.rows.insert(query.clone(), Arc::clone(&rows)).await;
        // An invalidation may have landed between the check and the insert.
        if cache.epoch() != epoch {
            cache.rows.invalidate(query).await;
        }
        Ok(rows)
    }

    /// Run a select and decode the rows.
    ///
    /// # Errors
    ///
    /// Propagates store and decode errors.
    pub async fn fetch<T: DeserializeOwned>(&self, query: &Query) -> Result<Vec<T>, StoreError> {
        let rows = self.select(query).await?;
        decode_rows(&rows)
    }

    /// Insert a row and invalidate the table on success.
    ///
    /// # Errors
    ///
    /// Propagates store errors; the cache is left untouched on failure.
    pub async fn insert(&self, table: Table, row: Row) -> Result<(), StoreError> {
        self.inner.store.insert(table, row).await?;
        self.invalidate(table).await;
        Ok(())
    }

    /// Patch keyed rows and invalidate the table on success.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` when the key matches no row, otherwise
    /// propagates store errors.
    pub async fn update(&self, table: Table, key: &RowKey, patch: Row) -> Result<usize, StoreError> {
        let changed = self.inner.store.update(table, key, patch).await?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!(
                "no {table} row with {} = {}",
                key.column, key.value
            )));
        }
        self.invalidate(table).await;
        Ok(changed)
    }

    /// Drop every cached read of a table.
    pub async fn invalidate(&self, table: Table) {
        if let Some(cache) = self.cache(table) {
            cache.epoch.fetch_add(1, Ordering::AcqRel);
            cache.rows.invalidate_all();
            cache.rows.run_pending_tasks().await;
            debug!(%table, "Cache invalidated");
        }
    }

    fn cache(&self, table: Table) -> Option<&TableCache> {
        self.inner.caches.get(&table)
    }
}

impl std::fmt::Debug for Collections {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collections")
            .field("tables", &self.inner.caches.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::AtomicBool;

    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::Notify;

    use super::*;
    use crate::store::MemoryStore;
    use crate::store::memory::StoreCall;

    /// Holds the first select after it has read, until released.
    struct GatedStore {
        inner: MemoryStore,
        hold: AtomicBool,
        entered: Notify,
        release: Notify,
    }

    impl GatedStore {
        fn new(inner: MemoryStore) -> Self {
            Self {
                inner,
                hold: AtomicBool::new(true),
                entered: Notify::new(),
                release: Notify::new(),
            }
        }
    }

    #[async_trait]
    impl RecordStore for GatedStore {
        async fn select(&self, query: &Query) -> Result<Vec<Row>, StoreError> {
            let rows = self.inner.select(query).await;
            if self.hold.swap(false, Ordering::SeqCst) {
                self.entered.notify_one();
                self.release.notified().await;
            }
            rows
        }

        async fn count(&self, table: Table) -> Result<u64, StoreError> {
            self.inner.count(table).await
        }

        async fn insert(&self, table: Table, row: Row) -> Result<(), StoreError> {
            self.inner.insert(table, row).await
        }

        async fn update(&self, table: Table, key: &RowKey, patch: Row) -> Result<usize, StoreError> {
            self.inner.update(table, key, patch).await
        }
    }

    fn setup() -> (Arc<MemoryStore>, Collections) {
        let store = Arc::new(MemoryStore::new().with_rows(
            Table::Categories,
            [json!({"category_id": 1, "name": "Shoes"})],
        ));
        let collections = Collections::new(store.clone(), Duration::from_secs(60));
        (store, collections)
    }

    fn selects(store: &MemoryStore) -> usize {
        store.count_calls(|c| matches!(c, StoreCall::Select(_)))
    }

    #[tokio::test]
    async fn test_repeated_select_is_cached() {
        let (store, collections) = setup();
        let query = Query::select(Table::Categories);
        collections.select(&query).await.unwrap();
        collections.select(&query).await.unwrap();
        assert_eq!(selects(&store), 1);
    }

    #[tokio::test]
    async fn test_insert_invalidates_table() {
        let (store, collections) = setup();
        let query = Query::select(Table::Categories);
        assert_eq!(collections.select(&query).await.unwrap().len(), 1);

        let row = json!({"category_id": 2, "name": "Bags"});
        collections
            .insert(Table::Categories, row.as_object().cloned().unwrap())
            .await
            .unwrap();

        assert_eq!(collections.select(&query).await.unwrap().len(), 2);
        assert_eq!(selects(&store), 2);
    }

    #[tokio::test]
    async fn test_update_without_match_is_not_found() {
        let (_, collections) = setup();
        let key = RowKey::new("category_id", 99);
        let patch = json!({"name": "x"}).as_object().cloned().unwrap();
        let err = collections
            .update(Table::Categories, &key, patch)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_failed_read_is_not_cached() {
        let (store, collections) = setup();
        let query = Query::select(Table::Categories);
        store.fail_reads(true);
        assert!(collections.select(&query).await.is_err());
        store.fail_reads(false);
        assert_eq!(collections.select(&query).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_read_overlapping_update_is_not_cached() {
        let store = Arc::new(GatedStore::new(MemoryStore::new().with_rows(
            Table::Orders,
            [json!({"order_id": "o1", "status": "pending"})],
        )));
        let collections = Collections::new(store.clone(), Duration::from_secs(60));
        let query = Query::select(Table::Orders);

        let reader = collections.clone();
        let read_query = query.clone();
        let in_flight = tokio::spawn(async move { reader.select(&read_query).await });
        store.entered.notified().await;

        let patch = json!({"status": "delivered"}).as_object().cloned().unwrap();
        collections
            .update(Table::Orders, &RowKey::new("order_id", "o1"), patch)
            .await
            .unwrap();

        store.release.notify_one();
        let stale = in_flight.await.unwrap().unwrap();
        assert_eq!(stale[0]["status"], "pending");

        let fresh = collections.select(&query).await.unwrap();
        assert_eq!(fresh[0]["status"], "delivered");
    }
}
