//! Lakegate connector access control
//!
//! This crate provides:
//! - `LegacySecurityConfig`, the static capability flags of a connector
//! - `ConnectorAccessControl`, one check per schema/table/view/role action
//!   with always-allow defaults
//! - `LegacyAccessControl`, which gates the flagged table and column
//!   actions and verifies table ownership before a drop
//!
//! # Example
//!
//! ```rust,ignore
//! use lakegate_access::{ConnectorAccessControl, LegacyAccessControl, LegacySecurityConfig};
//! use std::sync::Arc;
//!
//! let config = LegacySecurityConfig::load(Some(Path::new("/etc/lakegate/security.toml")))?;
//! let access_control = LegacyAccessControl::new(transaction_manager, config);
//!
//! access_control
//!     .check_can_drop_table(&handle, &identity, &context, &table)
//!     .await?;
//! ```

pub mod config;
pub mod control;
pub mod error;
pub mod legacy;

pub use self::config::{ConfigError, LegacySecurityConfig};
pub use control::{ConnectorAccessControl, RoleGrant, TablePrivilegeGrant};
pub use error::{AccessDenied, AccessError, AccessResult, DenyReason, DeniedAction};
pub use legacy::LegacyAccessControl;
