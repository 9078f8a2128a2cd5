//! Storage access context
//!
//! Describes who is touching which table location, so that file-system
//! access can be attributed and validated. Only the identity is required;
//! everything else is set through [`StorageContextBuilder`].

use crate::context::AccessControlContext;
use crate::types::{ConnectorIdentity, QueryId};
use std::collections::BTreeSet;
use std::fmt;

/// Identity and table information attached to a storage access
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageContext {
    identity: ConnectorIdentity,
    source: Option<String>,
    query_id: Option<QueryId>,
    schema_name: Option<String>,
    table_name: Option<String>,
    table_path: Option<String>,
    /// `Some(false)` if the table already exists in the metastore,
    /// `Some(true)` if it is being created in the current transaction
    is_new_table: Option<bool>,
    is_path_validation_needed: Option<bool>,
    client_info: Option<String>,
    client_tags: Option<BTreeSet<String>>,
}

impl StorageContext {
    pub const fn builder(identity: ConnectorIdentity) -> StorageContextBuilder {
        StorageContextBuilder::new(identity)
    }

    /// Seed a builder with the session fields of an access-control context.
    ///
    /// Source, query id, client info and client tags are copied; table
    /// information still has to be supplied by the caller.
    pub fn from_access_context(
        identity: ConnectorIdentity,
        context: &AccessControlContext,
    ) -> StorageContextBuilder {
        let mut builder = StorageContextBuilder::new(identity)
            .query_id(context.query_id().clone())
            .client_tags(context.client_tags().clone());
        if let Some(source) = context.source() {
            builder = builder.source(source);
        }
        if let Some(client_info) = context.client_info() {
            builder = builder.client_info(client_info);
        }
        builder
    }

    #[must_use]
    pub const fn identity(&self) -> &ConnectorIdentity {
        &self.identity
    }

    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    #[must_use]
    pub const fn query_id(&self) -> Option<&QueryId> {
        self.query_id.as_ref()
    }

    #[must_use]
    pub fn schema_name(&self) -> Option<&str> {
        self.schema_name.as_deref()
    }

    #[must_use]
    pub fn table_name(&self) -> Option<&str> {
        self.table_name.as_deref()
    }

    #[must_use]
    pub fn table_path(&self) -> Option<&str> {
        self.table_path.as_deref()
    }

    #[must_use]
    pub const fn is_new_table(&self) -> Option<bool> {
        self.is_new_table
    }

    #[must_use]
    pub const fn is_path_validation_needed(&self) -> Option<bool> {
        self.is_path_validation_needed
    }

    #[must_use]
    pub fn client_info(&self) -> Option<&str> {
        self.client_info.as_deref()
    }

    #[must_use]
    pub const fn client_tags(&self) -> Option<&BTreeSet<String>> {
        self.client_tags.as_ref()
    }
}

impl fmt::Display for StorageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StorageContext{{user={}", self.identity.user)?;
        if let Some(source) = &self.source {
            write!(f, ", source={source}")?;
        }
        if let Some(query_id) = &self.query_id {
            write!(f, ", queryId={query_id}")?;
        }
        if let Some(schema) = &self.schema_name {
            write!(f, ", schemaName={schema}")?;
        }
        if let Some(table) = &self.table_name {
            write!(f, ", tableName={table}")?;
        }
        if let Some(path) = &self.table_path {
            write!(f, ", tablePath={path}")?;
        }
        if let Some(is_new) = self.is_new_table {
            write!(f, ", isNewTable={is_new}")?;
        }
        if let Some(client_info) = &self.client_info {
            write!(f, ", clientInfo={client_info}")?;
        }
        if let Some(tags) = &self.client_tags {
            let tags: Vec<&str> = tags.iter().map(String::as_str).collect();
            write!(f, ", clientTags=[{}]", tags.join(", "))?;
        }
        write!(f, "}}")
    }
}

/// Builder for [`StorageContext`]
#[derive(Clone, Debug)]
pub struct StorageContextBuilder {
    inner: StorageContext,
}

impl StorageContextBuilder {
    const fn new(identity: ConnectorIdentity) -> Self {
        Self {
            inner: StorageContext {
                identity,
                source: None,
                query_id: None,
                schema_name: None,
                table_name: None,
                table_path: None,
                is_new_table: None,
                is_path_validation_needed: None,
                client_info: None,
                client_tags: None,
            },
        }
    }

    #[must_use]
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.inner.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn query_id(mut self, query_id: impl Into<QueryId>) -> Self {
        self.inner.query_id = Some(query_id.into());
        self
    }

    #[must_use]
    pub fn schema_name(mut self, schema: impl Into<String>) -> Self {
        self.inner.schema_name = Some(schema.into());
        self
    }

    #[must_use]
    pub fn table_name(mut self, table: impl Into<String>) -> Self {
        self.inner.table_name = Some(table.into());
        self
    }

    #[must_use]
    pub fn table_path(mut self, path: impl Into<String>) -> Self {
        self.inner.table_path = Some(path.into());
        self
    }

    #[must_use]
    pub const fn is_new_table(mut self, is_new: bool) -> Self {
        self.inner.is_new_table = Some(is_new);
        self
    }

    #[must_use]
    pub const fn is_path_validation_needed(mut self, needed: bool) -> Self {
        self.inner.is_path_validation_needed = Some(needed);
        self
    }

    #[must_use]
    pub fn client_info(mut self, client_info: impl Into<String>) -> Self {
        self.inner.client_info = Some(client_info.into());
        self
    }

    #[must_use]
    pub fn client_tags(mut self, tags: BTreeSet<String>) -> Self {
        self.inner.client_tags = Some(tags);
        self
    }

    #[must_use]
    pub fn build(self) -> StorageContext {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_only() {
        let ctx = StorageContext::builder(ConnectorIdentity::new("alice")).build();
        assert_eq!(ctx.identity().user(), "alice");
        assert!(ctx.query_id().is_none());
        assert!(ctx.table_path().is_none());
        assert_eq!(ctx.to_string(), "StorageContext{user=alice}");
    }

    #[test]
    fn test_table_location() {
        let ctx = StorageContext::builder(ConnectorIdentity::new("etl"))
            .schema_name("web")
            .table_name("clicks")
            .table_path("hdfs://nn/warehouse/web.db/clicks")
            .is_new_table(true)
            .is_path_validation_needed(false)
            .build();

        assert_eq!(ctx.schema_name(), Some("web"));
        assert_eq!(ctx.table_name(), Some("clicks"));
        assert_eq!(ctx.is_new_table(), Some(true));
        assert_eq!(ctx.is_path_validation_needed(), Some(false));
        assert_eq!(
            ctx.to_string(),
            "StorageContext{user=etl, schemaName=web, tableName=clicks, \
             tablePath=hdfs://nn/warehouse/web.db/clicks, isNewTable=true}"
        );
    }

    #[test]
    fn test_from_access_context() {
        let access = AccessControlContext::builder("q42")
            .source("dashboard")
            .client_tags(["adhoc"])
            .build();
        let ctx = StorageContext::from_access_context(ConnectorIdentity::new("bob"), &access)
            .schema_name("sales")
            .build();

        assert_eq!(ctx.source(), Some("dashboard"));
        assert_eq!(ctx.query_id().map(QueryId::as_str), Some("q42"));
        assert!(ctx.client_info().is_none());
        assert!(ctx.client_tags().unwrap().contains("adhoc"));
        assert_eq!(ctx.schema_name(), Some("sales"));
    }
}
