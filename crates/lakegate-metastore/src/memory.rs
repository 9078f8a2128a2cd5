//! In-memory catalog
//!
//! `InMemoryMetastore` is a concurrent table registry. Each transaction
//! opened through `SnapshotTransactionManager` captures a copy of the
//! registry at `begin`, so lookups inside a transaction never move even if
//! the catalog changes underneath.

use async_trait::async_trait;
use dashmap::DashMap;
use lakegate_common::TransactionHandle;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{MetastoreError, Result};
use crate::resolver::{MetadataView, MetastoreContext, TransactionManager};
use crate::table::Table;

/// Runtime metric recorded once per table lookup
pub const GET_TABLE_METRIC: &str = "metastore.get_table";

type TableKey = (String, String);

fn table_key(schema_name: &str, table_name: &str) -> TableKey {
    (schema_name.to_lowercase(), table_name.to_lowercase())
}

/// Concurrent in-memory table registry
#[derive(Debug, Default)]
pub struct InMemoryMetastore {
    tables: RwLock<HashMap<TableKey, Table>>,
}

impl InMemoryMetastore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table.
    ///
    /// # Errors
    /// Returns `MetastoreError::TableAlreadyExists` if the name is taken.
    pub fn create_table(&self, table: Table) -> Result<()> {
        let key = table_key(&table.schema_name, &table.table_name);
        let mut tables = self.tables.write();
        if tables.contains_key(&key) {
            return Err(MetastoreError::TableAlreadyExists(format!(
                "{}.{}",
                key.0, key.1
            )));
        }
        tracing::debug!("Created table {}.{} owned by {}", key.0, key.1, table.owner);
        tables.insert(key, table);
        Ok(())
    }

    /// Remove a table and return its last stored record.
    ///
    /// # Errors
    /// Returns `MetastoreError::TableNotFound` if no such table exists.
    pub fn drop_table(&self, schema_name: &str, table_name: &str) -> Result<Table> {
        let key = table_key(schema_name, table_name);
        self.tables
            .write()
            .remove(&key)
            .ok_or_else(|| MetastoreError::TableNotFound(format!("{}.{}", key.0, key.1)))
    }

    #[must_use]
    pub fn get_table(&self, schema_name: &str, table_name: &str) -> Option<Table> {
        self.tables
            .read()
            .get(&table_key(schema_name, table_name))
            .cloned()
    }

    /// Tables in `schema_name`, sorted by name
    #[must_use]
    pub fn list_tables(&self, schema_name: &str) -> Vec<Table> {
        let schema_name = schema_name.to_lowercase();
        let mut tables: Vec<Table> = self
            .tables
            .read()
            .iter()
            .filter(|((schema, _), _)| *schema == schema_name)
            .map(|(_, table)| table.clone())
            .collect();
        tables.sort_by(|a, b| a.table_name.cmp(&b.table_name));
        tables
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.read().is_empty()
    }

    /// Point-in-time copy of the registry
    #[must_use]
    pub fn snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            tables: self.tables.read().clone(),
        }
    }
}

/// Frozen view of the catalog, handed out per transaction
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    tables: HashMap<TableKey, Table>,
}

#[async_trait]
impl MetadataView for CatalogSnapshot {
    async fn get_table(
        &self,
        context: &MetastoreContext,
        schema_name: &str,
        table_name: &str,
    ) -> Result<Option<Table>> {
        context.runtime_stats.add_metric_value(GET_TABLE_METRIC, 1);
        tracing::trace!(
            query_id = %context.query_id,
            user = %context.identity.user,
            "Looking up {}.{}",
            schema_name,
            table_name
        );
        Ok(self.tables.get(&table_key(schema_name, table_name)).cloned())
    }
}

/// Transaction manager handing out one catalog snapshot per transaction
pub struct SnapshotTransactionManager {
    metastore: Arc<InMemoryMetastore>,
    transactions: DashMap<TransactionHandle, Arc<CatalogSnapshot>>,
}

impl SnapshotTransactionManager {
    #[must_use]
    pub fn new(metastore: Arc<InMemoryMetastore>) -> Self {
        Self {
            metastore,
            transactions: DashMap::new(),
        }
    }

    /// Open a transaction over the current catalog state
    pub fn begin(&self) -> TransactionHandle {
        let handle = TransactionHandle::new();
        self.transactions
            .insert(handle, Arc::new(self.metastore.snapshot()));
        tracing::debug!("Began transaction {}", handle);
        handle
    }

    /// End a transaction. The handle is invalid afterwards.
    ///
    /// # Errors
    /// Returns `MetastoreError::UnknownTransaction` if the handle is not active.
    pub fn commit(&self, handle: &TransactionHandle) -> Result<()> {
        self.end(handle)
    }

    /// Abandon a transaction. The handle is invalid afterwards.
    ///
    /// # Errors
    /// Returns `MetastoreError::UnknownTransaction` if the handle is not active.
    pub fn rollback(&self, handle: &TransactionHandle) -> Result<()> {
        self.end(handle)
    }

    fn end(&self, handle: &TransactionHandle) -> Result<()> {
        if self.transactions.remove(handle).is_none() {
            return Err(MetastoreError::UnknownTransaction(*handle));
        }
        tracing::debug!("Ended transaction {}", handle);
        Ok(())
    }

    #[must_use]
    pub fn active_transactions(&self) -> usize {
        self.transactions.len()
    }
}

impl TransactionManager for SnapshotTransactionManager {
    fn get(&self, handle: &TransactionHandle) -> Result<Arc<dyn MetadataView>> {
        let snapshot: Arc<dyn MetadataView> = self
            .transactions
            .get(handle)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(MetastoreError::UnknownTransaction(*handle))?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lakegate_common::{AccessControlContext, ConnectorIdentity};

    fn lookup_context() -> MetastoreContext {
        let access = AccessControlContext::builder("q1").build();
        MetastoreContext::new(&ConnectorIdentity::new("alice"), &access)
    }

    #[test]
    fn test_create_and_get() {
        let metastore = InMemoryMetastore::new();
        metastore
            .create_table(Table::new("sales", "orders", "alice"))
            .unwrap();

        let table = metastore.get_table("SALES", "Orders").unwrap();
        assert_eq!(table.owner, "alice");
        assert_eq!(metastore.len(), 1);
    }

    #[test]
    fn test_create_duplicate() {
        let metastore = InMemoryMetastore::new();
        metastore
            .create_table(Table::new("sales", "orders", "alice"))
            .unwrap();
        let err = metastore
            .create_table(Table::new("sales", "orders", "bob"))
            .unwrap_err();
        assert_eq!(err, MetastoreError::TableAlreadyExists("sales.orders".into()));
    }

    #[test]
    fn test_drop_table() {
        let metastore = InMemoryMetastore::new();
        metastore
            .create_table(Table::new("sales", "orders", "alice"))
            .unwrap();
        assert_eq!(metastore.drop_table("sales", "orders").unwrap().owner, "alice");
        assert!(metastore.is_empty());
        assert!(matches!(
            metastore.drop_table("sales", "orders"),
            Err(MetastoreError::TableNotFound(_))
        ));
    }

    #[test]
    fn test_list_tables_sorted() {
        let metastore = InMemoryMetastore::new();
        for name in ["zeta", "alpha", "mid"] {
            metastore.create_table(Table::new("s", name, "o")).unwrap();
        }
        metastore.create_table(Table::new("other", "x", "o")).unwrap();

        let names: Vec<String> = metastore
            .list_tables("s")
            .into_iter()
            .map(|t| t.table_name)
            .collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[tokio::test]
    async fn test_transaction_sees_snapshot() {
        let metastore = Arc::new(InMemoryMetastore::new());
        metastore
            .create_table(Table::new("sales", "orders", "alice"))
            .unwrap();

        let manager = SnapshotTransactionManager::new(Arc::clone(&metastore));
        let handle = manager.begin();

        metastore.drop_table("sales", "orders").unwrap();
        metastore
            .create_table(Table::new("sales", "returns", "bob"))
            .unwrap();

        let view = manager.get(&handle).unwrap();
        let ctx = lookup_context();
        assert!(view.get_table(&ctx, "sales", "orders").await.unwrap().is_some());
        assert!(view.get_table(&ctx, "sales", "returns").await.unwrap().is_none());

        let metric = ctx.runtime_stats.metric(GET_TABLE_METRIC).unwrap();
        assert_eq!(metric.count, 2);
    }

    #[test]
    fn test_unknown_transaction() {
        let manager = SnapshotTransactionManager::new(Arc::new(InMemoryMetastore::new()));
        let handle = TransactionHandle::new();
        assert!(matches!(
            manager.get(&handle),
            Err(MetastoreError::UnknownTransaction(h)) if h == handle
        ));
    }

    #[test]
    fn test_commit_invalidates_handle() {
        let manager = SnapshotTransactionManager::new(Arc::new(InMemoryMetastore::new()));
        let handle = manager.begin();
        assert_eq!(manager.active_transactions(), 1);

        manager.commit(&handle).unwrap();
        assert_eq!(manager.active_transactions(), 0);
        assert!(manager.get(&handle).is_err());
        assert_eq!(
            manager.rollback(&handle),
            Err(MetastoreError::UnknownTransaction(handle))
        );
    }
}
