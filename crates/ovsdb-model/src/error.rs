//! Domain errors raised by the model registry and the column mapper.
//!
//! Registry construction fails fast with [`ModelError::Configuration`].
//! Validation never fails fast: it collects every defect it finds into a
//! `Vec<ModelError>` so callers see the whole picture at once.

use ovsdb_core::WireError;
use thiserror::Error;

/// Errors arising from model registry operations.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A record shape cannot be registered.
    #[error("invalid model configuration: {message}")]
    Configuration {
        /// Description of the defect.
        message: String,
    },

    /// The requested table has no registered record shape.
    #[error("table '{table}' not found in database model")]
    NotFound {
        /// Table that was looked up.
        table: String,
    },

    /// The registry and the schema describe different databases.
    #[error("database model name ({model}) does not match schema ({schema})")]
    NameMismatch {
        /// Name claimed by the registry.
        model: String,
        /// Name declared by the schema.
        schema: String,
    },

    /// A registered table is absent from the schema.
    #[error("database model contains a model for table '{table}' that does not exist in schema")]
    MissingTable {
        /// Registered table name.
        table: String,
    },

    /// A registered record shape cannot be bound to its schema table.
    #[error("table '{table}': {source}")]
    Mapper {
        /// Table whose binding failed.
        table: String,
        /// Underlying binding failure.
        #[source]
        source: Box<MapperError>,
    },
}

impl ModelError {
    /// Builds a `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Builds a `NotFound` error.
    #[must_use]
    pub fn not_found(table: impl Into<String>) -> Self {
        Self::NotFound {
            table: table.into(),
        }
    }

    /// Wraps a mapper failure for the given table.
    #[must_use]
    pub fn mapper(table: impl Into<String>, source: MapperError) -> Self {
        Self::Mapper {
            table: table.into(),
            source: Box::new(source),
        }
    }
}

/// Errors arising while binding record shapes to schema tables or while
/// moving values between rows and records.
#[derive(Debug, Error)]
pub enum MapperError {
    /// A field is tagged with a column the table does not declare.
    #[error("field '{field}' is bound to column '{column}', which does not exist in the table")]
    UnknownColumn {
        /// Record field name.
        field: String,
        /// Column named by the field's tag.
        column: String,
    },

    /// A field's kind cannot hold the column's declared values.
    #[error("field '{field}' of kind {found} cannot hold column '{column}' of type {expected}")]
    IncompatibleField {
        /// Record field name.
        field: String,
        /// Column name.
        column: String,
        /// Column type as declared by the schema.
        expected: String,
        /// Field kind as declared by the record.
        found: String,
    },

    /// The record declares no row-identity field.
    #[error("record shape {type_name} has no row-identity field")]
    MissingRowIdentity {
        /// Rust type name of the record.
        type_name: String,
    },

    /// The record does not expose the named field.
    #[error("record has no field named '{field}'")]
    UnknownField {
        /// Field name that was requested.
        field: String,
    },

    /// A value could not be converted into the field's Rust type.
    #[error("cannot convert {found} into {expected}")]
    FieldConversion {
        /// Kind the field requires.
        expected: String,
        /// Kind that was supplied.
        found: String,
    },

    /// A column value could not be interpreted for its declared type.
    #[error("column '{column}': {source}")]
    Wire {
        /// Column being decoded.
        column: String,
        /// Underlying wire failure.
        #[source]
        source: WireError,
    },

    /// A row could not be serialised.
    #[error("failed to serialise row: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl MapperError {
    /// Builds an `UnknownField` error.
    #[must_use]
    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self::UnknownField {
            field: field.into(),
        }
    }

    /// Builds a `FieldConversion` error.
    #[must_use]
    pub fn conversion(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::FieldConversion {
            expected: expected.into(),
            found: found.into(),
        }
    }
}
