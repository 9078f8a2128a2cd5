//! Stored table attributes

use lakegate_common::SchemaTableName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How the table's data is managed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableType {
    #[default]
    ManagedTable,
    ExternalTable,
    VirtualView,
}

/// Table as recorded in the metastore
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    #[serde(alias = "schema")]
    pub schema_name: String,
    #[serde(alias = "table")]
    pub table_name: String,
    pub owner: String,
    #[serde(default)]
    pub table_type: TableType,
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

impl Table {
    /// Create a managed table record. Names are lower-cased the same way
    /// `SchemaTableName` does.
    pub fn new(schema: &str, table: &str, owner: impl Into<String>) -> Self {
        Self {
            schema_name: schema.to_lowercase(),
            table_name: table.to_lowercase(),
            owner: owner.into(),
            table_type: TableType::ManagedTable,
            parameters: BTreeMap::new(),
        }
    }

    #[must_use]
    pub const fn with_table_type(mut self, table_type: TableType) -> Self {
        self.table_type = table_type;
        self
    }

    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Qualified name of this table.
    ///
    /// # Errors
    /// Returns an error if either name part is empty.
    pub fn name(&self) -> lakegate_common::Result<SchemaTableName> {
        SchemaTableName::new(&self.schema_name, &self.table_name)
    }
}
