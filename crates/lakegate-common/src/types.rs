//! Core type definitions for Lakegate
//!
//! This module defines the value types passed through the access-control
//! surface: identifiers, principals, qualified names and column metadata.

use crate::error::{Error, Result};
use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque handle scoping a metadata view to one query's transaction
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, From, Into)]
pub struct TransactionHandle(Uuid);

impl TransactionHandle {
    /// Generate a new random transaction handle
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from existing UUID
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TransactionHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TransactionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransactionHandle({})", self.0)
    }
}

impl fmt::Display for TransactionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Engine-assigned query identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct QueryId(String);

impl QueryId {
    /// Create a query ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the query ID as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for QueryId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Schema-qualified table (or view) name.
///
/// Both parts are lower-cased on construction, matching how the engine
/// resolves unquoted identifiers.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SchemaTableName {
    schema: String,
    table: String,
}

impl SchemaTableName {
    /// Create a new schema-qualified name.
    ///
    /// # Errors
    /// Returns `Error::EmptyName` if either part is empty.
    pub fn new(schema: impl AsRef<str>, table: impl AsRef<str>) -> Result<Self> {
        let schema = schema.as_ref();
        let table = table.as_ref();
        if schema.is_empty() {
            return Err(Error::EmptyName("schema name"));
        }
        if table.is_empty() {
            return Err(Error::EmptyName("table name"));
        }
        Ok(Self {
            schema: schema.to_lowercase(),
            table: table.to_lowercase(),
        })
    }

    /// Schema part
    #[must_use]
    pub fn schema_name(&self) -> &str {
        &self.schema
    }

    /// Table part
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table
    }
}

impl fmt::Display for SchemaTableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.table)
    }
}

impl FromStr for SchemaTableName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (schema, table) = s
            .split_once('.')
            .ok_or_else(|| Error::InvalidQualifiedName(s.to_string()))?;
        if table.contains('.') {
            return Err(Error::InvalidQualifiedName(s.to_string()));
        }
        Self::new(schema, table)
    }
}

/// Authenticated principal issuing the current query
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorIdentity {
    /// User principal name
    pub user: String,
    /// Group memberships
    pub groups: BTreeSet<String>,
    /// Currently selected role, if any
    pub role: Option<String>,
}

impl ConnectorIdentity {
    /// Create an identity with no groups and no role
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            groups: BTreeSet::new(),
            role: None,
        }
    }

    /// Add a group membership
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.insert(group.into());
        self
    }

    /// Set the selected role
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }
}

impl fmt::Display for ConnectorIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user)
    }
}

/// Kind of principal a grant refers to
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PrincipalType {
    User,
    Role,
}

/// Grantee or grantor of a privilege or role
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Principal {
    pub kind: PrincipalType,
    pub name: String,
}

impl Principal {
    pub fn user(name: impl Into<String>) -> Self {
        Self {
            kind: PrincipalType::User,
            name: name.into(),
        }
    }

    pub fn role(name: impl Into<String>) -> Self {
        Self {
            kind: PrincipalType::Role,
            name: name.into(),
        }
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            PrincipalType::User => write!(f, "USER {}", self.name),
            PrincipalType::Role => write!(f, "ROLE {}", self.name),
        }
    }
}

/// Table privilege named in GRANT / REVOKE
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Privilege {
    #[display("SELECT")]
    Select,
    #[display("DELETE")]
    Delete,
    #[display("INSERT")]
    Insert,
    #[display("UPDATE")]
    Update,
}

/// Column description as exposed to the engine
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub name: String,
    /// Engine type signature (e.g. `bigint`, `varchar(10)`)
    pub type_name: String,
    pub comment: Option<String>,
    pub hidden: bool,
}

impl ColumnMetadata {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            comment: None,
            hidden: false,
        }
    }
}

/// SQL expression injected by a row filter or column mask
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewExpression {
    /// Identity the expression is evaluated as
    pub identity: String,
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub expression: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_handle_unique() {
        let a = TransactionHandle::new();
        let b = TransactionHandle::new();
        assert_ne!(a, b);
        assert_eq!(TransactionHandle::from_uuid(a.as_uuid()), a);
    }

    #[test]
    fn test_schema_table_name_lowercases() {
        let name = SchemaTableName::new("Sales", "Orders").unwrap();
        assert_eq!(name.schema_name(), "sales");
        assert_eq!(name.table_name(), "orders");
        assert_eq!(name.to_string(), "sales.orders");
    }

    #[test]
    fn test_schema_table_name_rejects_empty() {
        assert_eq!(
            SchemaTableName::new("", "orders"),
            Err(Error::EmptyName("schema name"))
        );
        assert_eq!(
            SchemaTableName::new("sales", ""),
            Err(Error::EmptyName("table name"))
        );
    }

    #[test]
    fn test_schema_table_name_parse() {
        let name: SchemaTableName = "web.page_views".parse().unwrap();
        assert_eq!(name, SchemaTableName::new("web", "page_views").unwrap());

        assert!("no_schema".parse::<SchemaTableName>().is_err());
        assert!("a.b.c".parse::<SchemaTableName>().is_err());
        assert!(".t".parse::<SchemaTableName>().is_err());
    }

    #[test]
    fn test_identity_builder() {
        let identity = ConnectorIdentity::new("alice")
            .with_group("analysts")
            .with_role("admin");
        assert_eq!(identity.user(), "alice");
        assert!(identity.groups.contains("analysts"));
        assert_eq!(identity.role.as_deref(), Some("admin"));
    }

    #[test]
    fn test_principal_display() {
        assert_eq!(Principal::user("bob").to_string(), "USER bob");
        assert_eq!(Principal::role("etl").to_string(), "ROLE etl");
        assert_eq!(Privilege::Insert.to_string(), "INSERT");
    }

    #[test]
    fn test_query_id_serde() {
        let id = QueryId::new("20240101_000000_00001_abcde");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"20240101_000000_00001_abcde\"");
    }
}
