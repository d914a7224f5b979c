//! Record shapes: how a Rust type declares the table columns it mirrors.
//!
//! A record type implements [`Model`], usually through [`impl_model!`],
//! listing each field with the column it binds to and the field's Rust type.
//! Field types implement [`FieldType`], which fixes the [`FieldKind`] the
//! mapper checks against the server schema and converts values through
//! [`FieldValue`].
//!
//! [`impl_model!`]: crate::impl_model

mod field;

use std::any::Any;
use std::fmt;

use ovsdb_core::Atom;

pub use self::field::{FieldType, ScalarField};
use crate::error::MapperError;

/// Scalar type of a field, or of a collection field's elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// `String`; also holds UUID references.
    String,
    /// `i64`.
    Integer,
    /// `f64`.
    Real,
    /// `bool`.
    Boolean,
}

impl ScalarKind {
    /// Lower-case name used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Real => "real",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// A single required value.
    Scalar(ScalarKind),
    /// Zero or one value (`Option<T>`).
    Optional(ScalarKind),
    /// Any number of values (`Vec<T>`).
    Set(ScalarKind),
    /// Key/value pairs (`BTreeMap<K, V>`).
    Map(ScalarKind, ScalarKind),
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => write!(f, "{kind}"),
            Self::Optional(kind) => write!(f, "optional {kind}"),
            Self::Set(kind) => write!(f, "set of {kind}"),
            Self::Map(key, value) => write!(f, "map of {key} to {value}"),
        }
    }
}

/// A field's value in wire terms, as exchanged between records and rows.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Value of a [`FieldKind::Scalar`] field.
    Scalar(Atom),
    /// Value of a [`FieldKind::Optional`] field.
    Optional(Option<Atom>),
    /// Value of a [`FieldKind::Set`] field.
    Set(Vec<Atom>),
    /// Value of a [`FieldKind::Map`] field.
    Map(Vec<(Atom, Atom)>),
}

impl FieldValue {
    /// Short name of the value's shape for diagnostics.
    #[must_use]
    pub const fn shape_name(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Optional(_) => "optional",
            Self::Set(_) => "set",
            Self::Map(_) => "map",
        }
    }
}

/// One declared field of a record shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Rust field name.
    pub name: &'static str,
    /// Column the field binds to.
    pub column: &'static str,
    /// Field shape.
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Declares a field.
    #[must_use]
    pub const fn new(name: &'static str, column: &'static str, kind: FieldKind) -> Self {
        Self { name, column, kind }
    }
}

/// A typed record mirroring one table's rows.
///
/// Implementations describe their fields and give name-based access to them,
/// which is all the mapper needs to move values between rows and records.
pub trait Model: Any + Send + Sync + fmt::Debug {
    /// Rust type name of the concrete record.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Declared fields in declaration order.
    fn field_specs(&self) -> Vec<FieldSpec>;

    /// Reads a field by name.
    fn field(&self, name: &str) -> Option<FieldValue>;

    /// Writes a field by name.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::UnknownField`] for undeclared names and
    /// [`MapperError::FieldConversion`] when the value does not fit the
    /// field's type.
    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), MapperError>;
}

impl dyn Model {
    /// Returns `true` when the record is a `T`.
    #[must_use]
    pub fn is<T: Model>(&self) -> bool {
        let any: &dyn Any = self;
        any.is::<T>()
    }

    /// Borrows the record as a `T`.
    #[must_use]
    pub fn downcast_ref<T: Model>(&self) -> Option<&T> {
        let any: &dyn Any = self;
        any.downcast_ref()
    }

    /// Mutably borrows the record as a `T`.
    #[must_use]
    pub fn downcast_mut<T: Model>(&mut self) -> Option<&mut T> {
        let any: &mut dyn Any = self;
        any.downcast_mut()
    }

    /// Converts a boxed record into a `T`, discarding it on mismatch.
    #[must_use]
    pub fn downcast<T: Model>(self: Box<Self>) -> Option<Box<T>> {
        let any: Box<dyn Any> = self;
        any.downcast().ok()
    }
}

/// Implements [`Model`] for a struct by listing its fields.
///
/// Each entry names the Rust field, its type and the column it binds to.
/// Exactly one field must bind to `_uuid`.
///
/// ```
/// use ovsdb_model::impl_model;
///
/// #[derive(Debug, Default)]
/// struct Bridge {
///     uuid: String,
///     name: String,
///     ports: Vec<String>,
/// }
///
/// impl_model!(Bridge {
///     uuid: String => "_uuid",
///     name: String => "name",
///     ports: Vec<String> => "ports",
/// });
/// ```
#[macro_export]
macro_rules! impl_model {
    ($model:ty { $($field:ident : $ty:ty => $column:expr),+ $(,)? }) => {
        impl $crate::Model for $model {
            fn field_specs(&self) -> ::std::vec::Vec<$crate::FieldSpec> {
                ::std::vec![
                    $($crate::FieldSpec::new(
                        ::std::stringify!($field),
                        $column,
                        <$ty as $crate::FieldType>::kind(),
                    )),+
                ]
            }

            fn field(&self, name: &str) -> ::std::option::Option<$crate::FieldValue> {
                match name {
                    $(::std::stringify!($field) => ::std::option::Option::Some(
                        <$ty as $crate::FieldType>::to_field_value(&self.$field),
                    ),)+
                    _ => ::std::option::Option::None,
                }
            }

            fn set_field(
                &mut self,
                name: &str,
                value: $crate::FieldValue,
            ) -> ::std::result::Result<(), $crate::MapperError> {
                match name {
                    $(::std::stringify!($field) => {
                        self.$field = <$ty as $crate::FieldType>::from_field_value(value)?;
                        ::std::result::Result::Ok(())
                    })+
                    _ => ::std::result::Result::Err($crate::MapperError::unknown_field(name)),
                }
            }
        }
    };
}
