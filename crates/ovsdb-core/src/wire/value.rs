//! The polymorphic column value carried inside rows.

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use serde_json::Value;

use super::atom::{Atom, split_tagged};
use super::map::OvsMap;
use super::set::OvsSet;
use crate::error::WireError;

/// Any value a row column can hold.
///
/// Decoding is schema-less: a bare atom decodes to [`WireValue::Atom`] even
/// though the sender may have meant a one-element set. Callers that know the
/// column is a set resolve the ambiguity with [`WireValue::into_set`].
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    /// A scalar or row reference.
    Atom(Atom),
    /// A set of atoms.
    Set(OvsSet),
    /// A map of atoms to atoms.
    Map(OvsMap),
}

impl WireValue {
    /// Short name used in diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Atom(atom) => atom.kind_name(),
            Self::Set(_) => "set",
            Self::Map(_) => "map",
        }
    }

    /// Returns the atom when this value is atomic.
    #[must_use]
    pub const fn as_atom(&self) -> Option<&Atom> {
        match self {
            Self::Atom(atom) => Some(atom),
            Self::Set(_) | Self::Map(_) => None,
        }
    }

    /// Interprets the value as a set, lifting a bare atom into a singleton.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::TypeMismatch`] when the value is a map.
    pub fn into_set(self) -> Result<OvsSet, WireError> {
        match self {
            Self::Atom(atom) => Ok(OvsSet::Single(atom)),
            Self::Set(set) => Ok(set),
            Self::Map(_) => Err(WireError::type_mismatch("set", "map")),
        }
    }

    /// Interprets the value as a map.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::TypeMismatch`] unless the value is a map.
    pub fn into_map(self) -> Result<OvsMap, WireError> {
        match self {
            Self::Map(map) => Ok(map),
            other => Err(WireError::type_mismatch("map", other.kind_name())),
        }
    }

    /// Decodes any protocol value from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Format`] for JSON that follows none of the
    /// protocol's forms and [`WireError::TypeMismatch`] for collections whose
    /// members are themselves collections.
    pub fn from_json(value: &Value) -> Result<Self, WireError> {
        if let Value::Array(items) = value {
            let (tag, payload) = split_tagged(items)?;
            match tag {
                "set" => return OvsSet::from_tagged_payload(payload).map(Self::Set),
                "map" => return OvsMap::from_tagged_payload(payload).map(Self::Map),
                _ => {}
            }
        }
        Atom::from_json(value).map(Self::Atom)
    }
}

impl From<Atom> for WireValue {
    fn from(atom: Atom) -> Self {
        Self::Atom(atom)
    }
}

impl From<OvsSet> for WireValue {
    fn from(set: OvsSet) -> Self {
        Self::Set(set)
    }
}

impl From<OvsMap> for WireValue {
    fn from(map: OvsMap) -> Self {
        Self::Map(map)
    }
}

impl Serialize for WireValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Atom(atom) => atom.serialize(serializer),
            Self::Set(set) => set.serialize(serializer),
            Self::Map(map) => map.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for WireValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Self::from_json(&raw).map_err(de::Error::custom)
    }
}
