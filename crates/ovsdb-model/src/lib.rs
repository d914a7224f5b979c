//! Typed records for OVSDB tables.
//!
//! Applications describe each table they use as a Rust struct implementing
//! [`Model`], register the structs in a [`ClientDbModel`] under their table
//! names, and check the registry against the schema the server reports. A
//! successful [`ClientDbModel::bind`] yields the per-table mapper metadata
//! used to turn rows into records and back.

mod error;
mod mapper;
mod model;
mod registry;

pub use self::error::{MapperError, ModelError};
pub use self::mapper::{ColumnBinding, DatabaseBinding, ModelUpdate, TableBinding};
pub use self::model::{FieldKind, FieldSpec, FieldType, FieldValue, Model, ScalarField, ScalarKind};
pub use self::registry::{ClientDbModel, ModelDescriptor};

#[cfg(test)]
mod tests;
