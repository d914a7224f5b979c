//! Column mapper: binds record fields to schema columns and moves values
//! between rows and records.

mod database;

use ovsdb_config::SetEncoding;
use ovsdb_core::schema::{UUID_COLUMN, VERSION_COLUMN};
use ovsdb_core::{
    Atom, AtomicType, BaseType, ColumnType, Limit, OvsMap, OvsSet, Row, TableSchema, WireError,
    WireValue,
};
use serde_json::{Map, Value};

pub(crate) use self::database::BoundTables;
pub use self::database::{DatabaseBinding, ModelUpdate};
use crate::error::MapperError;
use crate::model::{FieldKind, FieldValue, Model, ScalarKind};

/// Binding of one record field to one schema column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnBinding {
    /// Record field name.
    pub field: &'static str,
    /// Column name.
    pub column: &'static str,
    /// Field shape.
    pub kind: FieldKind,
    /// Column type declared by the schema.
    pub column_type: ColumnType,
}

/// Mapper metadata for one table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableBinding {
    uuid_field: &'static str,
    columns: Vec<ColumnBinding>,
}

impl TableBinding {
    /// Binds the fields of `model` to the columns of `table`.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::MissingRowIdentity`] when no field binds to
    /// `_uuid`, [`MapperError::UnknownColumn`] when a field names a column
    /// the table lacks, and [`MapperError::IncompatibleField`] when a field
    /// cannot hold its column's values.
    pub fn new(table: &TableSchema, model: &dyn Model) -> Result<Self, MapperError> {
        let specs = model.field_specs();
        let uuid_field = specs
            .iter()
            .find(|spec| spec.column == UUID_COLUMN)
            .map(|spec| spec.name)
            .ok_or_else(|| MapperError::MissingRowIdentity {
                type_name: model.type_name().to_owned(),
            })?;

        let mut columns = Vec::with_capacity(specs.len());
        for spec in specs {
            let column = table
                .column(spec.column)
                .ok_or_else(|| MapperError::UnknownColumn {
                    field: spec.name.to_owned(),
                    column: spec.column.to_owned(),
                })?;
            if !compatible(spec.kind, &column.column_type) {
                return Err(MapperError::IncompatibleField {
                    field: spec.name.to_owned(),
                    column: spec.column.to_owned(),
                    expected: describe(&column.column_type),
                    found: spec.kind.to_string(),
                });
            }
            columns.push(ColumnBinding {
                field: spec.name,
                column: spec.column,
                kind: spec.kind,
                column_type: column.column_type.clone(),
            });
        }
        Ok(Self {
            uuid_field,
            columns,
        })
    }

    /// Field holding the row identity.
    #[must_use]
    pub const fn uuid_field(&self) -> &'static str {
        self.uuid_field
    }

    /// Bindings in field declaration order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnBinding] {
        &self.columns
    }

    /// Binding for a column.
    #[must_use]
    pub fn column(&self, column: &str) -> Option<&ColumnBinding> {
        self.columns.iter().find(|binding| binding.column == column)
    }

    /// Binding for a field.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<&ColumnBinding> {
        self.columns.iter().find(|binding| binding.field == field)
    }

    /// Copies the columns present in `row` into `model`.
    ///
    /// Columns the row omits leave their fields untouched; columns the
    /// record does not bind are ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`MapperError`] when a column value does not fit its field.
    pub fn apply_row(&self, row: &Row, model: &mut dyn Model) -> Result<(), MapperError> {
        for binding in &self.columns {
            if let Some(value) = row.get(binding.column) {
                let field_value = to_field_value(binding, value.clone())?;
                model.set_field(binding.field, field_value)?;
            }
        }
        Ok(())
    }

    /// Sets the row identity of `model` and copies `row` into it.
    ///
    /// # Errors
    ///
    /// Returns a [`MapperError`] when a column value does not fit its field.
    pub fn populate(&self, uuid: &str, row: &Row, model: &mut dyn Model) -> Result<(), MapperError> {
        model.set_field(self.uuid_field, FieldValue::Scalar(Atom::uuid(uuid)))?;
        self.apply_row(row, model)
    }

    /// Builds a row holding every writable column of `model`.
    ///
    /// The implicit `_uuid` and `_version` columns are never written. String
    /// fields bound to UUID columns are emitted as UUID references.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::UnknownField`] when the record does not expose
    /// a bound field.
    pub fn row_from_model(&self, model: &dyn Model) -> Result<Row, MapperError> {
        let mut row = Row::new();
        for binding in &self.columns {
            if matches!(binding.column, UUID_COLUMN | VERSION_COLUMN) {
                continue;
            }
            let value = model
                .field(binding.field)
                .ok_or_else(|| MapperError::unknown_field(binding.field))?;
            row.insert(binding.column, to_wire_value(&binding.column_type, value));
        }
        Ok(row)
    }

    /// Serialises `row` for the wire.
    ///
    /// Each set column is written with `encoding` restricted by the column's
    /// own policy, so columns that can never hold one element always keep
    /// the tagged form.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::Serialize`] when a value cannot be serialised.
    pub fn encode_row(&self, row: &Row, encoding: SetEncoding) -> Result<Map<String, Value>, MapperError> {
        let mut encoded = Map::new();
        for (column, value) in row {
            let policy = self
                .column(column)
                .map_or(encoding, |binding| binding.column_type.set_encoding().restrict(encoding));
            let json = match value {
                WireValue::Set(set) => serde_json::to_value(set.encode(policy))?,
                other => serde_json::to_value(other)?,
            };
            encoded.insert(column.clone(), json);
        }
        Ok(encoded)
    }
}

const fn accepts(kind: ScalarKind, base: &BaseType) -> bool {
    matches!(
        (kind, base.atomic),
        (ScalarKind::String, AtomicType::String | AtomicType::Uuid)
            | (ScalarKind::Integer, AtomicType::Integer)
            | (ScalarKind::Real, AtomicType::Real)
            | (ScalarKind::Boolean, AtomicType::Boolean)
    )
}

const fn compatible(kind: FieldKind, column_type: &ColumnType) -> bool {
    match (kind, column_type) {
        (FieldKind::Scalar(scalar), ColumnType::Atomic(base))
        | (FieldKind::Set(scalar), ColumnType::Set { key: base, .. }) => accepts(scalar, base),
        (FieldKind::Optional(scalar), ColumnType::Set { key, max, .. }) => {
            !max.allows_many() && accepts(scalar, key)
        }
        (FieldKind::Map(key_kind, value_kind), ColumnType::Map { key, value, .. }) => {
            accepts(key_kind, key) && accepts(value_kind, value)
        }
        _ => false,
    }
}

fn describe(column_type: &ColumnType) -> String {
    match column_type {
        ColumnType::Atomic(base) => base.atomic.to_string(),
        ColumnType::Set { key, min, max } => {
            format!("set of {} ({min}..{})", key.atomic, describe_limit(*max))
        }
        ColumnType::Map {
            key,
            value,
            min,
            max,
        } => format!(
            "map of {} to {} ({min}..{})",
            key.atomic,
            value.atomic,
            describe_limit(*max)
        ),
    }
}

fn describe_limit(limit: Limit) -> String {
    match limit {
        Limit::Bounded(max) => max.to_string(),
        Limit::Unlimited => "unlimited".to_owned(),
    }
}

fn to_field_value(binding: &ColumnBinding, value: WireValue) -> Result<FieldValue, MapperError> {
    let wire = |source: WireError| MapperError::Wire {
        column: binding.column.to_owned(),
        source,
    };
    match binding.kind {
        FieldKind::Scalar(_) => match value {
            WireValue::Atom(atom) => Ok(FieldValue::Scalar(atom)),
            other => Err(wire(WireError::type_mismatch("atom", other.kind_name()))),
        },
        FieldKind::Optional(_) => match value.into_set().map_err(wire)? {
            OvsSet::Empty => Ok(FieldValue::Optional(None)),
            OvsSet::Single(atom) => Ok(FieldValue::Optional(Some(atom))),
            OvsSet::Many(atoms) => Err(MapperError::conversion(
                binding.kind.to_string(),
                format!("set of {} elements", atoms.len()),
            )),
        },
        FieldKind::Set(_) => Ok(FieldValue::Set(value.into_set().map_err(wire)?.into_vec())),
        FieldKind::Map(..) => Ok(FieldValue::Map(value.into_map().map_err(wire)?.into_entries())),
    }
}

fn retag(base: &BaseType, atom: Atom) -> Atom {
    match (base.atomic, atom) {
        (AtomicType::Uuid, Atom::String(id)) => Atom::Uuid(id),
        (_, other) => other,
    }
}

fn to_wire_value(column_type: &ColumnType, value: FieldValue) -> WireValue {
    let key = column_type.key();
    match value {
        FieldValue::Scalar(atom) => WireValue::Atom(retag(key, atom)),
        FieldValue::Optional(element) => {
            WireValue::Set(element.into_iter().map(|atom| retag(key, atom)).collect::<OvsSet>())
        }
        FieldValue::Set(atoms) => {
            WireValue::Set(atoms.into_iter().map(|atom| retag(key, atom)).collect::<OvsSet>())
        }
        FieldValue::Map(entries) => {
            let value_base = match column_type {
                ColumnType::Map { value: map_value, .. } => map_value,
                ColumnType::Atomic(base) | ColumnType::Set { key: base, .. } => base,
            };
            WireValue::Map(OvsMap::from_pairs(
                entries
                    .into_iter()
                    .map(|(k, v)| (retag(key, k), retag(value_base, v))),
            ))
        }
    }
}
