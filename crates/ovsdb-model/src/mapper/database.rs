//! Mapper metadata for a whole database.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use ovsdb_config::SetEncoding;
use ovsdb_core::{Row, RowUpdate};
use serde_json::{Map, Value};

use super::TableBinding;
use crate::error::ModelError;
use crate::model::Model;
use crate::registry::ModelDescriptor;

pub(crate) type BoundTables = HashMap<String, (ModelDescriptor, TableBinding)>;

/// Records decoded from one row update.
///
/// `new` is absent for deletions and `old` for insertions. For
/// modifications, `old` is rebuilt from the current values overlaid with the
/// previous values of the columns that changed.
#[derive(Debug, Default)]
pub struct ModelUpdate {
    /// Record before the change.
    pub old: Option<Box<dyn Model>>,
    /// Record after the change.
    pub new: Option<Box<dyn Model>>,
}

/// Validated bindings for every registered table.
///
/// Produced by [`ClientDbModel::bind`](crate::ClientDbModel::bind).
#[derive(Debug)]
pub struct DatabaseBinding {
    tables: BoundTables,
}

impl DatabaseBinding {
    pub(crate) const fn new(tables: BoundTables) -> Self {
        Self { tables }
    }

    /// Number of bound tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns `true` when no tables are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Binding for a table.
    #[must_use]
    pub fn table(&self, table: &str) -> Option<&TableBinding> {
        self.tables.get(table).map(|(_, binding)| binding)
    }

    /// Builds a record for `table` from a row identity and its columns.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotFound`] for unbound tables and
    /// [`ModelError::Mapper`] when a column does not fit its field.
    pub fn model_from_row(&self, table: &str, uuid: &str, row: &Row) -> Result<Box<dyn Model>, ModelError> {
        let (descriptor, binding) = self.lookup(table)?;
        let mut model = descriptor.instantiate();
        binding
            .populate(uuid, row, model.as_mut())
            .map_err(|source| ModelError::mapper(table, source))?;
        Ok(model)
    }

    /// Decodes both sides of a row update into records.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`DatabaseBinding::model_from_row`].
    pub fn model_update(&self, table: &str, uuid: &str, update: &RowUpdate) -> Result<ModelUpdate, ModelError> {
        let new = update
            .new
            .as_ref()
            .map(|row| self.model_from_row(table, uuid, row))
            .transpose()?;
        let old = match (&update.old, &update.new) {
            (Some(old), Some(current)) => {
                let mut model = self.model_from_row(table, uuid, current)?;
                let (_, binding) = self.lookup(table)?;
                binding
                    .apply_row(old, model.as_mut())
                    .map_err(|source| ModelError::mapper(table, source))?;
                Some(model)
            }
            (Some(old), None) => Some(self.model_from_row(table, uuid, old)?),
            (None, _) => None,
        };
        Ok(ModelUpdate { old, new })
    }

    /// Builds the wire row for a record, returning its table name too.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotFound`] when the record's shape is not bound
    /// and [`ModelError::Mapper`] when the row cannot be built or encoded.
    pub fn encode_model(
        &self,
        model: &dyn Model,
        encoding: SetEncoding,
    ) -> Result<(&str, Map<String, Value>), ModelError> {
        let any: &dyn Any = model;
        let type_id: TypeId = any.type_id();
        let (table, (_, binding)) = self
            .tables
            .iter()
            .find(|(_, (descriptor, _))| descriptor.type_id() == type_id)
            .ok_or_else(|| ModelError::not_found(model.type_name()))?;
        let encoded = binding
            .row_from_model(model)
            .and_then(|row| binding.encode_row(&row, encoding))
            .map_err(|source| ModelError::mapper(table.as_str(), source))?;
        Ok((table.as_str(), encoded))
    }

    fn lookup(&self, table: &str) -> Result<(&ModelDescriptor, &TableBinding), ModelError> {
        self.tables
            .get(table)
            .map(|(descriptor, binding)| (descriptor, binding))
            .ok_or_else(|| ModelError::not_found(table))
    }
}
