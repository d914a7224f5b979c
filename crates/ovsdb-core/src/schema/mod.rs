//! Server-declared database schema.
//!
//! The schema is fetched from the server when a connection is established and
//! is never known at compile time. This module only describes it; loading it
//! is the transport's job.

mod column_type;

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Deserialize;

pub use self::column_type::{AtomicType, BaseType, ColumnType, Limit};

/// Name of the implicit row-identity column present in every table.
pub const UUID_COLUMN: &str = "_uuid";

/// Name of the implicit row-version column present in every table.
pub const VERSION_COLUMN: &str = "_version";

static IMPLICIT_UUID: Lazy<ColumnSchema> = Lazy::new(ColumnSchema::implicit_uuid);

/// Description of a whole database.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DatabaseSchema {
    /// Database name, e.g. `Open_vSwitch`.
    pub name: String,
    /// Schema version string.
    #[serde(default)]
    pub version: String,
    /// Optional checksum advertised by the server.
    #[serde(default)]
    pub cksum: Option<String>,
    /// Tables keyed by name.
    pub tables: HashMap<String, TableSchema>,
}

impl DatabaseSchema {
    /// Looks up a table by name.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.get(name)
    }
}

/// Description of one table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TableSchema {
    /// Declared columns keyed by name.
    pub columns: HashMap<String, ColumnSchema>,
    /// Optional row limit.
    #[serde(rename = "maxRows", default)]
    pub max_rows: Option<u64>,
    /// Whether rows survive without being referenced.
    #[serde(rename = "isRoot", default)]
    pub is_root: bool,
    /// Column groups that must be unique across rows.
    #[serde(default)]
    pub indexes: Vec<Vec<String>>,
}

impl TableSchema {
    /// Looks up a column, including the implicit `_uuid` and `_version`.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.get(name).or_else(|| match name {
            UUID_COLUMN | VERSION_COLUMN => Some(&*IMPLICIT_UUID),
            _ => None,
        })
    }
}

/// Description of one column.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ColumnSchema {
    /// Declared value type.
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Whether the server skips persisting the column.
    #[serde(default)]
    pub ephemeral: bool,
    /// Whether clients may modify the column after insertion.
    #[serde(default = "default_mutable")]
    pub mutable: bool,
}

impl ColumnSchema {
    /// Builds a column with the given type and default flags.
    #[must_use]
    pub const fn new(column_type: ColumnType) -> Self {
        Self {
            column_type,
            ephemeral: false,
            mutable: true,
        }
    }

    fn implicit_uuid() -> Self {
        Self {
            mutable: false,
            ..Self::new(ColumnType::atomic(AtomicType::Uuid))
        }
    }
}

const fn default_mutable() -> bool {
    true
}

#[cfg(test)]
mod tests;
