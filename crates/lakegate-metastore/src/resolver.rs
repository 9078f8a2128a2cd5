//! Transaction-scoped metadata resolution
//!
//! The access-control gate only ever needs two things from the catalog:
//! a metadata view for the caller's transaction, and a table lookup inside
//! that view. Both are read-only.

use async_trait::async_trait;
use lakegate_common::{
    AccessControlContext, ConnectorIdentity, QueryId, RuntimeStats, TransactionHandle,
    WarningCollector,
};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::error::Result;
use crate::table::Table;

/// Request metadata forwarded to the metastore with every lookup
#[derive(Clone, Debug)]
pub struct MetastoreContext {
    pub identity: ConnectorIdentity,
    pub query_id: QueryId,
    pub client_info: Option<String>,
    pub client_tags: BTreeSet<String>,
    pub source: Option<String>,
    pub warning_collector: Arc<WarningCollector>,
    pub runtime_stats: Arc<RuntimeStats>,
}

impl MetastoreContext {
    /// Copy the caller's identity and session fields without transformation
    #[must_use]
    pub fn new(identity: &ConnectorIdentity, context: &AccessControlContext) -> Self {
        Self {
            identity: identity.clone(),
            query_id: context.query_id().clone(),
            client_info: context.client_info().map(str::to_string),
            client_tags: context.client_tags().clone(),
            source: context.source().map(str::to_string),
            warning_collector: Arc::clone(context.warning_collector()),
            runtime_stats: Arc::clone(context.runtime_stats()),
        }
    }
}

/// Metadata as seen through one transaction.
///
/// Repeated lookups within the same transaction must observe the same
/// state.
#[async_trait]
pub trait MetadataView: Send + Sync {
    /// Fetch a table by schema and table name.
    ///
    /// Returns `Ok(None)` if the table does not exist; `Err` only for
    /// failures of the lookup itself.
    async fn get_table(
        &self,
        context: &MetastoreContext,
        schema_name: &str,
        table_name: &str,
    ) -> Result<Option<Table>>;
}

/// Maps an opaque transaction handle to its metadata view
pub trait TransactionManager: Send + Sync {
    /// Resolve the view for `handle`.
    ///
    /// # Errors
    /// Returns `MetastoreError::UnknownTransaction` if the handle was never
    /// issued or has already ended.
    fn get(&self, handle: &TransactionHandle) -> Result<Arc<dyn MetadataView>>;
}
