//! Database model registry.
//!
//! A [`ClientDbModel`] names one database and maps each of its table names to
//! the record shape the client uses for that table. It is checked against the
//! server schema with [`ClientDbModel::validate`], which reports every defect
//! at once, and turned into per-table mapper metadata with
//! [`ClientDbModel::bind`].

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use ovsdb_core::DatabaseSchema;
use ovsdb_core::schema::UUID_COLUMN;
use tracing::{debug, warn};

use crate::error::ModelError;
use crate::mapper::{BoundTables, DatabaseBinding, TableBinding};
use crate::model::{FieldKind, FieldSpec, Model, ScalarKind};

const REGISTRY_TARGET: &str = "ovsdb_model::registry";

/// Registration entry for one record shape.
///
/// Capturing the shape through [`ModelDescriptor::of`] keeps the factory and
/// the type identity together, so only default-constructible record types
/// can be registered.
#[derive(Clone)]
pub struct ModelDescriptor {
    type_id: TypeId,
    type_name: &'static str,
    fields: Vec<FieldSpec>,
    factory: fn() -> Box<dyn Model>,
}

impl ModelDescriptor {
    /// Describes the record shape `T`.
    #[must_use]
    pub fn of<T: Model + Default>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            fields: T::default().field_specs(),
            factory: create::<T>,
        }
    }

    /// Type identity of the record shape.
    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Rust type name of the record shape.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Declared fields of the record shape.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Instantiates a zero-valued record.
    #[must_use]
    pub fn instantiate(&self) -> Box<dyn Model> {
        (self.factory)()
    }

    /// Name of the field bound to `_uuid`.
    #[must_use]
    pub fn uuid_field(&self) -> Option<&'static str> {
        self.fields
            .iter()
            .find(|spec| spec.column == UUID_COLUMN)
            .map(|spec| spec.name)
    }

    fn check(&self) -> Result<(), ModelError> {
        let identities: Vec<&FieldSpec> = self
            .fields
            .iter()
            .filter(|spec| spec.column == UUID_COLUMN)
            .collect();
        match identities.as_slice() {
            [] => {
                return Err(ModelError::configuration(format!(
                    "model {} is expected to have a string field bound to {UUID_COLUMN}",
                    self.type_name
                )));
            }
            [identity] if identity.kind != FieldKind::Scalar(ScalarKind::String) => {
                return Err(ModelError::configuration(format!(
                    "field {} of model {} is bound to {UUID_COLUMN} but has kind {}",
                    identity.name, self.type_name, identity.kind
                )));
            }
            [_] => {}
            _ => {
                return Err(ModelError::configuration(format!(
                    "model {} binds more than one field to {UUID_COLUMN}",
                    self.type_name
                )));
            }
        }

        let mut columns: HashMap<&str, &str> = HashMap::new();
        for spec in &self.fields {
            if let Some(previous) = columns.insert(spec.column, spec.name) {
                return Err(ModelError::configuration(format!(
                    "model {} binds column {} to both {previous} and {}",
                    self.type_name, spec.column, spec.name
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ModelDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelDescriptor")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

fn create<T: Model + Default>() -> Box<dyn Model> {
    Box::new(T::default())
}

/// Client-side description of one database: its name and the record shape
/// registered for each table.
#[derive(Debug, Clone)]
pub struct ClientDbModel {
    name: String,
    models: HashMap<String, ModelDescriptor>,
}

impl ClientDbModel {
    /// Builds a registry from `(table, descriptor)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Configuration`] when a record shape has no
    /// string row-identity field, binds a column twice, or when a table name
    /// or record shape is registered twice.
    pub fn new<I, S>(database: impl Into<String>, models: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = (S, ModelDescriptor)>,
        S: Into<String>,
    {
        let name = database.into();
        let mut registered: HashMap<String, ModelDescriptor> = HashMap::new();
        for (table, descriptor) in models {
            descriptor.check()?;
            if let Some(existing) = registered
                .iter()
                .find(|(_, other)| other.type_id == descriptor.type_id)
            {
                return Err(ModelError::configuration(format!(
                    "model {} is already registered for table {}",
                    descriptor.type_name,
                    existing.0
                )));
            }
            match registered.entry(table.into()) {
                Entry::Occupied(entry) => {
                    return Err(ModelError::configuration(format!(
                        "table {} is registered more than once",
                        entry.key()
                    )));
                }
                Entry::Vacant(entry) => {
                    entry.insert(descriptor);
                }
            }
        }
        debug!(
            target: REGISTRY_TARGET,
            database = %name,
            tables = registered.len(),
            "database model registered"
        );
        Ok(Self {
            name,
            models: registered,
        })
    }

    /// Database name the registry describes.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of registered tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns `true` when no tables are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Registered table names in sorted order.
    #[must_use]
    pub fn tables(&self) -> Vec<&str> {
        let mut tables: Vec<&str> = self.models.keys().map(String::as_str).collect();
        tables.sort_unstable();
        tables
    }

    /// Registration entry for a table.
    #[must_use]
    pub fn descriptor(&self, table: &str) -> Option<&ModelDescriptor> {
        self.models.get(table)
    }

    /// Instantiates a fresh zero-valued record for `table`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotFound`] when no record shape is registered
    /// for the table.
    pub fn new_model(&self, table: &str) -> Result<Box<dyn Model>, ModelError> {
        self.models
            .get(table)
            .map(ModelDescriptor::instantiate)
            .ok_or_else(|| ModelError::not_found(table))
    }

    /// Table registered for the record shape with the given type identity.
    ///
    /// `None` means the shape is not registered; it is an ordinary outcome,
    /// not an error.
    #[must_use]
    pub fn find_table(&self, type_id: TypeId) -> Option<&str> {
        self.models
            .iter()
            .find(|(_, descriptor)| descriptor.type_id == type_id)
            .map(|(table, _)| table.as_str())
    }

    /// Table registered for the record shape `T`.
    #[must_use]
    pub fn find_table_for<T: Model>(&self) -> Option<&str> {
        self.find_table(TypeId::of::<T>())
    }

    /// Table registered for the concrete shape of `model`.
    #[must_use]
    pub fn find_table_of(&self, model: &dyn Model) -> Option<&str> {
        let any: &dyn Any = model;
        self.find_table(any.type_id())
    }

    /// Checks the registry against a server schema.
    ///
    /// Every defect is reported: a name mismatch, each registered table
    /// missing from the schema, and each table whose record shape cannot be
    /// bound to its schema columns. An empty vector means the registry is
    /// usable with this schema.
    #[must_use]
    pub fn validate(&self, schema: &DatabaseSchema) -> Vec<ModelError> {
        self.check_against(schema).0
    }

    /// Validates the registry and builds mapper metadata for every table.
    ///
    /// # Errors
    ///
    /// Returns every validation error when the registry does not fit the
    /// schema.
    pub fn bind(&self, schema: &DatabaseSchema) -> Result<DatabaseBinding, Vec<ModelError>> {
        let (errors, tables) = self.check_against(schema);
        if errors.is_empty() {
            Ok(DatabaseBinding::new(tables))
        } else {
            Err(errors)
        }
    }

    fn check_against(&self, schema: &DatabaseSchema) -> (Vec<ModelError>, BoundTables) {
        let mut errors = Vec::new();
        let mut tables = BoundTables::new();

        if self.name != schema.name {
            errors.push(ModelError::NameMismatch {
                model: self.name.clone(),
                schema: schema.name.clone(),
            });
        }

        for table in self.tables() {
            let Some(descriptor) = self.models.get(table) else {
                continue;
            };
            let Some(table_schema) = schema.table(table) else {
                errors.push(ModelError::MissingTable {
                    table: table.to_owned(),
                });
                continue;
            };
            let prototype = descriptor.instantiate();
            match TableBinding::new(table_schema, prototype.as_ref()) {
                Ok(binding) => {
                    tables.insert(table.to_owned(), (descriptor.clone(), binding));
                }
                Err(source) => errors.push(ModelError::mapper(table, source)),
            }
        }

        if errors.is_empty() {
            debug!(
                target: REGISTRY_TARGET,
                database = %self.name,
                tables = tables.len(),
                "database model validated"
            );
        } else {
            for error in &errors {
                warn!(target: REGISTRY_TARGET, database = %self.name, %error, "model validation failed");
            }
        }
        (errors, tables)
    }
}

#[cfg(test)]
mod tests;
