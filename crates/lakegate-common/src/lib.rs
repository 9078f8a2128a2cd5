//! Lakegate Common - Shared types and utilities
//!
//! This crate provides the value types, request contexts and error
//! definitions used across all Lakegate components.

pub mod context;
pub mod error;
pub mod storage;
pub mod types;

pub use context::{
    AccessControlContext, AccessControlContextBuilder, RuntimeMetric, RuntimeStats,
    WarningCollector,
};
pub use error::{Error, Result};
pub use storage::{StorageContext, StorageContextBuilder};
pub use types::*;
