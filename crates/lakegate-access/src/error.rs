//! Access-control outcomes
//!
//! A check either returns `Ok(())` or one of two very different failures:
//! a denial (a policy decision) or a metastore fault (the decision could
//! not be made). Callers must not treat the latter as an authorization
//! outcome.

use lakegate_metastore::MetastoreError;
use std::fmt;
use thiserror::Error;

/// Result of an access-control check
pub type AccessResult = Result<(), AccessError>;

/// Governed action that was refused
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeniedAction {
    DropTable,
    RenameTable { new_table: String },
    AddColumn,
    DropColumn,
    RenameColumn,
    AddConstraint,
    DropConstraint,
}

impl DeniedAction {
    /// Stable action name for logs and metrics
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::DropTable => "drop_table",
            Self::RenameTable { .. } => "rename_table",
            Self::AddColumn => "add_column",
            Self::DropColumn => "drop_column",
            Self::RenameColumn => "rename_column",
            Self::AddConstraint => "add_constraint",
            Self::DropConstraint => "drop_constraint",
        }
    }
}

/// Why a governed action was refused
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DenyReason {
    /// The action's capability flag is off
    DisabledByPolicy,
    /// Drop target does not exist in the transaction's view
    TableNotFound,
    /// Caller is not the owner of the drop target
    OwnerMismatch,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DisabledByPolicy => "Operation disabled by connector policy",
            Self::TableNotFound => "Table not found",
            Self::OwnerMismatch => "Owner of the table is different from session user",
        })
    }
}

/// Denial of a governed action
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("Access Denied: {}", self.describe())]
pub struct AccessDenied {
    pub action: DeniedAction,
    /// String form of the target table
    pub target: String,
    pub reason: Option<DenyReason>,
}

impl AccessDenied {
    pub fn new(
        action: DeniedAction,
        target: impl Into<String>,
        reason: Option<DenyReason>,
    ) -> Self {
        Self {
            action,
            target: target.into(),
            reason,
        }
    }

    /// Denial message without the `Access Denied` prefix
    #[must_use]
    pub fn describe(&self) -> String {
        let target = &self.target;
        let message = match &self.action {
            DeniedAction::DropTable => format!("Cannot drop table {target}"),
            DeniedAction::RenameTable { new_table } => {
                format!("Cannot rename table from {target} to {new_table}")
            }
            DeniedAction::AddColumn => format!("Cannot add a column to table {target}"),
            DeniedAction::DropColumn => format!("Cannot drop a column from table {target}"),
            DeniedAction::RenameColumn => format!("Cannot rename a column in table {target}"),
            DeniedAction::AddConstraint => format!("Cannot add constraints to table {target}"),
            DeniedAction::DropConstraint => {
                format!("Cannot drop constraints from table {target}")
            }
        };
        match self.reason {
            Some(reason) => format!("{message}: {reason}"),
            None => message,
        }
    }
}

/// Failure of an access-control check
#[derive(Debug, Error)]
pub enum AccessError {
    #[error(transparent)]
    Denied(#[from] AccessDenied),

    #[error("metadata lookup failed: {0}")]
    Metastore(#[from] MetastoreError),
}

impl AccessError {
    /// True for policy denials, false for infrastructure faults
    #[must_use]
    pub const fn is_denied(&self) -> bool {
        matches!(self, Self::Denied(_))
    }

    #[must_use]
    pub const fn as_denied(&self) -> Option<&AccessDenied> {
        match self {
            Self::Denied(denied) => Some(denied),
            Self::Metastore(_) => None,
        }
    }
}
