//! Metastore error types

use lakegate_common::TransactionHandle;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MetastoreError>;

/// Failures of the metadata lookup itself.
///
/// None of these are authorization outcomes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MetastoreError {
    #[error("unknown or expired transaction: {0}")]
    UnknownTransaction(TransactionHandle),

    #[error("table already exists: {0}")]
    TableAlreadyExists(String),

    #[error("table not found: {0}")]
    TableNotFound(String),

    #[error("metastore unavailable: {0}")]
    Unavailable(String),
}
