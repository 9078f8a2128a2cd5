//! Error types for Lakegate
//!
//! Errors raised while building the shared value types.

use thiserror::Error;

/// Common result type for Lakegate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for Lakegate
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{0} is empty")]
    EmptyName(&'static str),

    #[error("invalid qualified name: {0} (expected schema.table)")]
    InvalidQualifiedName(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
