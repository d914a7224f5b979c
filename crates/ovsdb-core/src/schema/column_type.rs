//! Column type grammar.
//!
//! A column type is either a bare atomic type name (`"string"`) or an object
//! `{ "key": .., "value": .., "min": .., "max": .. }`. Decoding goes through
//! permissive raw shapes first and is then normalised into [`ColumnType`], so
//! every declaration reaching the rest of the crate is already validated.

use std::fmt;
use std::str::FromStr;

use ovsdb_config::SetEncoding;
use serde::Deserialize;
use serde_json::Value;

use crate::error::SchemaError;
use crate::wire::OvsSet;

/// Scalar types the protocol defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomicType {
    /// 64-bit signed integer.
    Integer,
    /// Double-precision real.
    Real,
    /// Boolean.
    Boolean,
    /// UTF-8 string.
    String,
    /// Row identifier.
    Uuid,
}

impl AtomicType {
    /// Canonical protocol name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Real => "real",
            Self::Boolean => "boolean",
            Self::String => "string",
            Self::Uuid => "uuid",
        }
    }
}

impl fmt::Display for AtomicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AtomicType {
    type Err = SchemaError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "integer" => Ok(Self::Integer),
            "real" => Ok(Self::Real),
            "boolean" => Ok(Self::Boolean),
            "string" => Ok(Self::String),
            "uuid" => Ok(Self::Uuid),
            other => Err(SchemaError::UnknownAtomicType {
                name: other.to_owned(),
            }),
        }
    }
}

/// Upper cardinality bound of a set or map column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// At most this many elements.
    Bounded(u64),
    /// No upper bound.
    Unlimited,
}

impl Limit {
    /// Returns `true` when the bound admits more than one element.
    #[must_use]
    pub const fn allows_many(self) -> bool {
        match self {
            Self::Bounded(max) => max > 1,
            Self::Unlimited => true,
        }
    }
}

/// Key or value type of a column, with its optional constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseType {
    /// Underlying scalar type.
    pub atomic: AtomicType,
    /// Table referenced by UUID columns.
    pub ref_table: Option<String>,
    /// Permitted values, when the schema restricts them.
    pub enumeration: Option<OvsSet>,
}

impl BaseType {
    /// Unconstrained base type.
    #[must_use]
    pub const fn new(atomic: AtomicType) -> Self {
        Self {
            atomic,
            ref_table: None,
            enumeration: None,
        }
    }
}

/// Normalised column type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawColumnType")]
pub enum ColumnType {
    /// Exactly one scalar.
    Atomic(BaseType),
    /// A set of scalars within `min..=max` elements.
    Set {
        /// Element type.
        key: BaseType,
        /// Minimum element count.
        min: u64,
        /// Maximum element count.
        max: Limit,
    },
    /// A map with `min..=max` entries.
    Map {
        /// Key type.
        key: BaseType,
        /// Value type.
        value: BaseType,
        /// Minimum entry count.
        min: u64,
        /// Maximum entry count.
        max: Limit,
    },
}

impl ColumnType {
    /// Type of a plain scalar column.
    #[must_use]
    pub const fn atomic(atomic: AtomicType) -> Self {
        Self::Atomic(BaseType::new(atomic))
    }

    /// Key type; for atomic columns, the column's own type.
    #[must_use]
    pub const fn key(&self) -> &BaseType {
        match self {
            Self::Atomic(key) | Self::Set { key, .. } | Self::Map { key, .. } => key,
        }
    }

    /// Returns `true` for set columns.
    #[must_use]
    pub const fn is_set(&self) -> bool {
        matches!(self, Self::Set { .. })
    }

    /// Returns `true` for map columns.
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Self::Map { .. })
    }

    /// Returns `true` for sets holding zero or one element.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        matches!(
            self,
            Self::Set {
                min: 0,
                max: Limit::Bounded(1),
                ..
            }
        )
    }

    /// Singleton-collapse policy implied by the column's cardinality.
    ///
    /// A set whose `min` exceeds 1 can never hold one element, so it always
    /// uses the tagged form. Decoded schemas never declare such sets, since
    /// the protocol restricts `min` to 0 or 1; only set types built in code
    /// can reach that branch.
    #[must_use]
    pub const fn set_encoding(&self) -> SetEncoding {
        match self {
            Self::Set { min, .. } if *min > 1 => SetEncoding::Tagged,
            _ => SetEncoding::Collapse,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
pub(super) enum RawColumnType {
    Name(String),
    Full(RawFullType),
}

#[derive(Deserialize)]
pub(super) struct RawFullType {
    key: RawBaseType,
    #[serde(default)]
    value: Option<RawBaseType>,
    #[serde(default)]
    min: Option<u64>,
    #[serde(default)]
    max: Option<RawLimit>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBaseType {
    Name(String),
    Full {
        #[serde(rename = "type")]
        atomic: String,
        #[serde(rename = "refTable", default)]
        ref_table: Option<String>,
        #[serde(rename = "enum", default)]
        enumeration: Option<Value>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLimit {
    Count(u64),
    Word(String),
}

impl TryFrom<RawBaseType> for BaseType {
    type Error = SchemaError;

    fn try_from(raw: RawBaseType) -> Result<Self, Self::Error> {
        match raw {
            RawBaseType::Name(name) => Ok(Self::new(name.parse()?)),
            RawBaseType::Full {
                atomic,
                ref_table,
                enumeration: raw_enumeration,
            } => {
                let enumeration = raw_enumeration
                    .map(|value| OvsSet::from_json(&value))
                    .transpose()
                    .map_err(|source| SchemaError::InvalidEnum { source })?;
                Ok(Self {
                    atomic: atomic.parse()?,
                    ref_table,
                    enumeration,
                })
            }
        }
    }
}

impl TryFrom<RawLimit> for Limit {
    type Error = SchemaError;

    fn try_from(raw: RawLimit) -> Result<Self, Self::Error> {
        match raw {
            RawLimit::Count(count) => Ok(Self::Bounded(count)),
            RawLimit::Word(word) if word == "unlimited" => Ok(Self::Unlimited),
            RawLimit::Word(word) => Err(SchemaError::InvalidLimit { value: word }),
        }
    }
}

impl TryFrom<RawColumnType> for ColumnType {
    type Error = SchemaError;

    fn try_from(raw: RawColumnType) -> Result<Self, Self::Error> {
        let full = match raw {
            RawColumnType::Name(name) => return Ok(Self::atomic(name.parse()?)),
            RawColumnType::Full(full) => full,
        };

        let key = BaseType::try_from(full.key)?;
        let min = full.min.unwrap_or(1);
        let max = full
            .max
            .map(Limit::try_from)
            .transpose()?
            .unwrap_or(Limit::Bounded(1));
        if min > 1 {
            return Err(SchemaError::InvalidMinimum { min });
        }
        if let Limit::Bounded(bound) = max
            && (bound == 0 || min > bound)
        {
            return Err(SchemaError::InvalidCardinality { min, max: bound });
        }

        match full.value {
            Some(value) => Ok(Self::Map {
                key,
                value: BaseType::try_from(value)?,
                min,
                max,
            }),
            None if min == 1 && max == Limit::Bounded(1) => Ok(Self::Atomic(key)),
            None => Ok(Self::Set { key, min, max }),
        }
    }
}
