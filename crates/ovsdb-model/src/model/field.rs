//! Conversions between Rust field types and [`FieldValue`].

use std::collections::BTreeMap;

use ovsdb_core::Atom;

use super::{FieldKind, FieldValue, ScalarKind};
use crate::error::MapperError;

/// A Rust type that holds one atom.
pub trait ScalarField: Sized {
    /// Scalar kind of the type.
    const KIND: ScalarKind;

    /// Converts the value into an atom.
    fn to_atom(&self) -> Atom;

    /// Extracts a value from an atom.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::FieldConversion`] when the atom has another
    /// type.
    fn from_atom(atom: Atom) -> Result<Self, MapperError>;
}

fn mismatch(expected: ScalarKind, atom: &Atom) -> MapperError {
    MapperError::conversion(expected.as_str(), atom.kind_name())
}

impl ScalarField for String {
    const KIND: ScalarKind = ScalarKind::String;

    fn to_atom(&self) -> Atom {
        Atom::String(self.clone())
    }

    fn from_atom(atom: Atom) -> Result<Self, MapperError> {
        match atom {
            Atom::String(text) | Atom::Uuid(text) | Atom::NamedUuid(text) => Ok(text),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }
}

impl ScalarField for i64 {
    const KIND: ScalarKind = ScalarKind::Integer;

    fn to_atom(&self) -> Atom {
        Atom::Integer(*self)
    }

    fn from_atom(atom: Atom) -> Result<Self, MapperError> {
        atom.as_integer().ok_or_else(|| mismatch(Self::KIND, &atom))
    }
}

impl ScalarField for f64 {
    const KIND: ScalarKind = ScalarKind::Real;

    fn to_atom(&self) -> Atom {
        Atom::Real(*self)
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "JSON integers are valid values for real columns"
    )]
    fn from_atom(atom: Atom) -> Result<Self, MapperError> {
        match atom {
            Atom::Real(value) => Ok(value),
            Atom::Integer(value) => Ok(value as Self),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }
}

impl ScalarField for bool {
    const KIND: ScalarKind = ScalarKind::Boolean;

    fn to_atom(&self) -> Atom {
        Atom::Boolean(*self)
    }

    fn from_atom(atom: Atom) -> Result<Self, MapperError> {
        atom.as_bool().ok_or_else(|| mismatch(Self::KIND, &atom))
    }
}

/// A Rust type usable as a record field.
pub trait FieldType: Sized {
    /// Shape of the field.
    fn kind() -> FieldKind;

    /// Converts the field into its wire shape.
    fn to_field_value(&self) -> FieldValue;

    /// Rebuilds the field from its wire shape.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::FieldConversion`] when the value's shape or
    /// element types do not match.
    fn from_field_value(value: FieldValue) -> Result<Self, MapperError>;
}

fn shape_mismatch(expected: FieldKind, value: &FieldValue) -> MapperError {
    MapperError::conversion(expected.to_string(), value.shape_name())
}

macro_rules! scalar_field_type {
    ($($ty:ty),+) => {
        $(
            impl FieldType for $ty {
                fn kind() -> FieldKind {
                    FieldKind::Scalar(<$ty as ScalarField>::KIND)
                }

                fn to_field_value(&self) -> FieldValue {
                    FieldValue::Scalar(self.to_atom())
                }

                fn from_field_value(value: FieldValue) -> Result<Self, MapperError> {
                    match value {
                        FieldValue::Scalar(atom) => Self::from_atom(atom),
                        other => Err(shape_mismatch(Self::kind(), &other)),
                    }
                }
            }
        )+
    };
}

scalar_field_type!(String, i64, f64, bool);

impl<T: ScalarField> FieldType for Option<T> {
    fn kind() -> FieldKind {
        FieldKind::Optional(T::KIND)
    }

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Optional(self.as_ref().map(ScalarField::to_atom))
    }

    fn from_field_value(value: FieldValue) -> Result<Self, MapperError> {
        match value {
            FieldValue::Optional(atom) => atom.map(T::from_atom).transpose(),
            other => Err(shape_mismatch(Self::kind(), &other)),
        }
    }
}

impl<T: ScalarField> FieldType for Vec<T> {
    fn kind() -> FieldKind {
        FieldKind::Set(T::KIND)
    }

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Set(self.iter().map(ScalarField::to_atom).collect())
    }

    fn from_field_value(value: FieldValue) -> Result<Self, MapperError> {
        match value {
            FieldValue::Set(atoms) => atoms.into_iter().map(T::from_atom).collect(),
            other => Err(shape_mismatch(Self::kind(), &other)),
        }
    }
}

impl<K: ScalarField + Ord, V: ScalarField> FieldType for BTreeMap<K, V> {
    fn kind() -> FieldKind {
        FieldKind::Map(K::KIND, V::KIND)
    }

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Map(
            self.iter()
                .map(|(key, value)| (key.to_atom(), value.to_atom()))
                .collect(),
        )
    }

    fn from_field_value(value: FieldValue) -> Result<Self, MapperError> {
        match value {
            FieldValue::Map(entries) => entries
                .into_iter()
                .map(|(key, entry)| Ok((K::from_atom(key)?, V::from_atom(entry)?)))
                .collect(),
            other => Err(shape_mismatch(Self::kind(), &other)),
        }
    }
}
