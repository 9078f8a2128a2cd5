//! Legacy connector access control
//!
//! Governs seven table/column actions with static capability flags. Drop
//! table additionally requires the caller to own the table, which is the
//! only check that reaches the metastore. Every other action falls through
//! to the always-allow defaults of [`ConnectorAccessControl`].

use async_trait::async_trait;
use lakegate_common::{
    AccessControlContext, ConnectorIdentity, SchemaTableName, TransactionHandle,
};
use lakegate_metastore::{MetastoreContext, TransactionManager};
use std::sync::Arc;

use crate::config::LegacySecurityConfig;
use crate::control::ConnectorAccessControl;
use crate::error::{AccessDenied, AccessError, AccessResult, DenyReason, DeniedAction};

pub struct LegacyAccessControl {
    transaction_manager: Arc<dyn TransactionManager>,
    config: LegacySecurityConfig,
}

impl LegacyAccessControl {
    #[must_use]
    pub fn new(
        transaction_manager: Arc<dyn TransactionManager>,
        config: LegacySecurityConfig,
    ) -> Self {
        Self {
            transaction_manager,
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &LegacySecurityConfig {
        &self.config
    }

    fn deny(action: DeniedAction, table: &SchemaTableName, reason: DenyReason) -> AccessError {
        let denied = AccessDenied::new(action, table.to_string(), Some(reason));
        tracing::debug!(
            action = denied.action.name(),
            target = %denied.target,
            %reason,
            "Access denied"
        );
        AccessError::Denied(denied)
    }

    fn check_flag(allowed: bool, action: DeniedAction, table: &SchemaTableName) -> AccessResult {
        if allowed {
            Ok(())
        } else {
            Err(Self::deny(action, table, DenyReason::DisabledByPolicy))
        }
    }
}

#[async_trait]
impl ConnectorAccessControl for LegacyAccessControl {
    async fn check_can_drop_table(
        &self,
        transaction: &TransactionHandle,
        identity: &ConnectorIdentity,
        context: &AccessControlContext,
        table: &SchemaTableName,
    ) -> AccessResult {
        // Flag first: a disabled drop never costs a metastore round trip.
        Self::check_flag(self.config.allow_drop_table(), DeniedAction::DropTable, table)?;

        let metadata = self.transaction_manager.get(transaction).inspect_err(|e| {
            tracing::warn!("Cannot resolve transaction for drop of {}: {}", table, e);
        })?;
        let metastore_context = MetastoreContext::new(identity, context);
        let target = metadata
            .get_table(&metastore_context, table.schema_name(), table.table_name())
            .await
            .inspect_err(|e| {
                tracing::warn!("Metastore lookup failed for drop of {}: {}", table, e);
            })?;

        let Some(target) = target else {
            return Err(Self::deny(
                DeniedAction::DropTable,
                table,
                DenyReason::TableNotFound,
            ));
        };
        if identity.user != target.owner {
            return Err(Self::deny(
                DeniedAction::DropTable,
                table,
                DenyReason::OwnerMismatch,
            ));
        }
        Ok(())
    }

    fn check_can_rename_table(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        table: &SchemaTableName,
        new_table: &SchemaTableName,
    ) -> AccessResult {
        Self::check_flag(
            self.config.allow_rename_table(),
            DeniedAction::RenameTable {
                new_table: new_table.to_string(),
            },
            table,
        )
    }

    fn check_can_add_column(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        table: &SchemaTableName,
    ) -> AccessResult {
        Self::check_flag(self.config.allow_add_column(), DeniedAction::AddColumn, table)
    }

    fn check_can_drop_column(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        table: &SchemaTableName,
    ) -> AccessResult {
        Self::check_flag(self.config.allow_drop_column(), DeniedAction::DropColumn, table)
    }

    fn check_can_rename_column(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        table: &SchemaTableName,
    ) -> AccessResult {
        Self::check_flag(
            self.config.allow_rename_column(),
            DeniedAction::RenameColumn,
            table,
        )
    }

    fn check_can_drop_constraint(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        table: &SchemaTableName,
    ) -> AccessResult {
        Self::check_flag(
            self.config.allow_drop_constraint(),
            DeniedAction::DropConstraint,
            table,
        )
    }

    fn check_can_add_constraint(
        &self,
        _transaction: &TransactionHandle,
        _identity: &ConnectorIdentity,
        _context: &AccessControlContext,
        table: &SchemaTableName,
    ) -> AccessResult {
        Self::check_flag(
            self.config.allow_add_constraint(),
            DeniedAction::AddConstraint,
            table,
        )
    }
}
