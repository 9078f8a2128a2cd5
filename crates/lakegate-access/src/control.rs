//! Connector access-control contract
//!
//! One method per schema, table, column, view and role action the engine
//! may ask about. Every method has a permissive default: checks allow,
//! filters return their input untouched, and row filters / column masks are
//! empty. Implementations override only the actions they govern.

use async_trait::async_trait;
use lakegate_common::{
    AccessControlContext, ColumnMetadata, ConnectorIdentity, Principal, Privilege,
    SchemaTableName, TransactionHandle, ViewExpression,
};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::AccessResult;

/// Payload of GRANT / REVOKE on a table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TablePrivilegeGrant {
    pub privilege: Privilege,
    pub principal: Principal,
    /// `WITH GRANT OPTION` on grant, `GRANT OPTION FOR` on revoke
    pub grant_option: bool,
}

/// Payload of GRANT / REVOKE of roles
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleGrant {
    pub roles: BTreeSet<String>,
    pub principals: BTreeSet<Principal>,
    /// `WITH ADMIN OPTION` on grant, `ADMIN OPTION FOR` on revoke
    pub admin_option: bool,
    pub grantor: Option<Principal>,
    pub catalog_name: String,
}

#[async_trait]
pub trait ConnectorAccessControl: Send + Sync {
    // Schemas

    fn check_can_create_schema(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _schema_name: &str,
    ) -> AccessResult {
        Ok(())
    }

    fn check_can_drop_schema(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _schema_name: &str,
    ) -> AccessResult {
        Ok(())
    }

    fn check_can_rename_schema(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _schema_name: &str,
        _new_schema_name: &str,
    ) -> AccessResult {
        Ok(())
    }

    fn check_can_show_schemas(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
    ) -> AccessResult {
        Ok(())
    }

    /// Schemas visible to the caller. Never adds names.
    fn filter_schemas(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        schema_names: BTreeSet<String>,
    ) -> BTreeSet<String> {
        schema_names
    }

    // Tables

    fn check_can_show_create_table(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _table: &SchemaTableName,
    ) -> AccessResult {
        Ok(())
    }

    fn check_can_create_table(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _table: &SchemaTableName,
    ) -> AccessResult {
        Ok(())
    }

    fn check_can_set_table_properties(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _table: &SchemaTableName,
        _properties: &BTreeMap<String, serde_json::Value>,
    ) -> AccessResult {
        Ok(())
    }

    /// The only check that may need to consult the metastore.
    async fn check_can_drop_table(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _table: &SchemaTableName,
    ) -> AccessResult {
        Ok(())
    }

    fn check_can_rename_table(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _table: &SchemaTableName,
        _new_table: &SchemaTableName,
    ) -> AccessResult {
        Ok(())
    }

    fn check_can_truncate_table(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _table: &SchemaTableName,
    ) -> AccessResult {
        Ok(())
    }

    fn check_can_show_tables_metadata(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _schema_name: &str,
    ) -> AccessResult {
        Ok(())
    }

    /// Tables visible to the caller. Never adds names.
    fn filter_tables(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        tables: BTreeSet<SchemaTableName>,
    ) -> BTreeSet<SchemaTableName> {
        tables
    }

    // Columns

    fn check_can_show_columns_metadata(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _table: &SchemaTableName,
    ) -> AccessResult {
        Ok(())
    }

    /// Columns of `table` visible to the caller, in their original order.
    fn filter_columns(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _table: &SchemaTableName,
        columns: Vec<ColumnMetadata>,
    ) -> Vec<ColumnMetadata> {
        columns
    }

    fn check_can_add_column(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _table: &SchemaTableName,
    ) -> AccessResult {
        Ok(())
    }

    fn check_can_drop_column(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _table: &SchemaTableName,
    ) -> AccessResult {
        Ok(())
    }

    fn check_can_rename_column(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _table: &SchemaTableName,
    ) -> AccessResult {
        Ok(())
    }

    // Data access

    fn check_can_select_from_columns(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _table: &SchemaTableName,
        _columns: &BTreeSet<String>,
    ) -> AccessResult {
        Ok(())
    }

    fn check_can_insert_into_table(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _table: &SchemaTableName,
    ) -> AccessResult {
        Ok(())
    }

    fn check_can_delete_from_table(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _table: &SchemaTableName,
    ) -> AccessResult {
        Ok(())
    }

    fn check_can_update_table_columns(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _table: &SchemaTableName,
        _updated_columns: &BTreeSet<String>,
    ) -> AccessResult {
        Ok(())
    }

    // Views

    fn check_can_create_view(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _view: &SchemaTableName,
    ) -> AccessResult {
        Ok(())
    }

    fn check_can_rename_view(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _view: &SchemaTableName,
        _new_view: &SchemaTableName,
    ) -> AccessResult {
        Ok(())
    }

    fn check_can_drop_view(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _view: &SchemaTableName,
    ) -> AccessResult {
        Ok(())
    }

    fn check_can_create_view_with_select_from_columns(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _table: &SchemaTableName,
        _columns: &BTreeSet<String>,
    ) -> AccessResult {
        Ok(())
    }

    // Session

    fn check_can_set_catalog_session_property(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _property_name: &str,
    ) -> AccessResult {
        Ok(())
    }

    // Privileges and roles

    fn check_can_grant_table_privilege(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _table: &SchemaTableName,
        _grant: &TablePrivilegeGrant,
    ) -> AccessResult {
        Ok(())
    }

    fn check_can_revoke_table_privilege(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _table: &SchemaTableName,
        _revoke: &TablePrivilegeGrant,
    ) -> AccessResult {
        Ok(())
    }

    fn check_can_create_role(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _role: &str,
        _grantor: Option<&Principal>,
    ) -> AccessResult {
        Ok(())
    }

    fn check_can_drop_role(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _role: &str,
    ) -> AccessResult {
        Ok(())
    }

    fn check_can_grant_roles(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _grant: &RoleGrant,
    ) -> AccessResult {
        Ok(())
    }

    fn check_can_revoke_roles(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _revoke: &RoleGrant,
    ) -> AccessResult {
        Ok(())
    }

    fn check_can_set_role(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _role: &str,
        _catalog_name: &str,
    ) -> AccessResult {
        Ok(())
    }

    fn check_can_show_roles(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _catalog_name: &str,
    ) -> AccessResult {
        Ok(())
    }

    fn check_can_show_current_roles(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _catalog_name: &str,
    ) -> AccessResult {
        Ok(())
    }

    fn check_can_show_role_grants(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _catalog_name: &str,
    ) -> AccessResult {
        Ok(())
    }

    // Constraints

    fn check_can_drop_constraint(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _table: &SchemaTableName,
    ) -> AccessResult {
        Ok(())
    }

    fn check_can_add_constraint(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _table: &SchemaTableName,
    ) -> AccessResult {
        Ok(())
    }

    // Row- and column-level security

    fn get_row_filters(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _table: &SchemaTableName,
    ) -> Vec<ViewExpression> {
        Vec::new()
    }

    fn get_column_masks(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        _table: &SchemaTableName,
        _columns: &[ColumnMetadata],
    ) -> HashMap<ColumnMetadata, ViewExpression> {
        HashMap::new()
    }
}
