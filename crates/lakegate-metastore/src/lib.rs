//! Lakegate Metastore
//!
//! This crate provides:
//! - The read-only contract the access-control gate uses to look up table
//!   metadata inside a transaction (`TransactionManager`, `MetadataView`)
//! - The lookup request carried to the metastore (`MetastoreContext`)
//! - An in-memory catalog with snapshot-per-transaction semantics
//!
//! # Example
//!
//! ```rust,ignore
//! use lakegate_metastore::{InMemoryMetastore, SnapshotTransactionManager, Table};
//! use std::sync::Arc;
//!
//! let metastore = Arc::new(InMemoryMetastore::new());
//! metastore.create_table(Table::new("sales", "orders", "alice"))?;
//!
//! let transactions = SnapshotTransactionManager::new(Arc::clone(&metastore));
//! let handle = transactions.begin();
//! // let view = transactions.get(&handle)?;
//! ```

pub mod error;
pub mod memory;
pub mod resolver;
pub mod table;

pub use error::{MetastoreError, Result};
pub use memory::{CatalogSnapshot, GET_TABLE_METRIC, InMemoryMetastore, SnapshotTransactionManager};
pub use resolver::{MetadataView, MetastoreContext, TransactionManager};
pub use table::{Table, TableType};
