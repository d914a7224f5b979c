//! Ordered sets with the protocol's singleton-collapse rule.

use std::slice;

use ovsdb_config::SetEncoding;
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use serde_json::Value;

use super::atom::{Atom, split_tagged};
use super::value::WireValue;
use crate::error::WireError;

const SET_TAG: &str = "set";

/// An ordered set of atoms.
///
/// The variants mirror the three wire shapes a set can take. `Many` always
/// holds at least two elements; the constructors normalise smaller inputs
/// into `Empty` or `Single`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum OvsSet {
    /// No elements; always written as `["set", []]`.
    #[default]
    Empty,
    /// Exactly one element; written bare when collapsing is allowed.
    Single(Atom),
    /// Two or more elements in insertion order.
    Many(Vec<Atom>),
}

impl OvsSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self::Empty
    }

    /// Builds a set from anything convertible into atoms.
    #[must_use]
    pub fn from_atoms<I, A>(atoms: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Atom>,
    {
        Self::from_vec(atoms.into_iter().map(Into::into).collect())
    }

    /// Builds a set from arbitrary wire values.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::TypeMismatch`] if any element is itself a set or
    /// a map; sets only nest one level deep.
    pub fn try_from_values<I>(values: I) -> Result<Self, WireError>
    where
        I: IntoIterator<Item = WireValue>,
    {
        let atoms = values
            .into_iter()
            .map(|value| match value {
                WireValue::Atom(atom) => Ok(atom),
                other => Err(WireError::type_mismatch("set element atom", other.kind_name())),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_vec(atoms))
    }

    fn from_vec(mut atoms: Vec<Atom>) -> Self {
        match atoms.len() {
            0 => Self::Empty,
            1 => atoms.pop().map_or(Self::Empty, Self::Single),
            _ => Self::Many(atoms),
        }
    }

    /// Appends an element, promoting the variant as the set grows.
    pub fn push(&mut self, element: impl Into<Atom>) {
        let atom = element.into();
        *self = match std::mem::take(self) {
            Self::Empty => Self::Single(atom),
            Self::Single(first) => Self::Many(vec![first, atom]),
            Self::Many(mut atoms) => {
                atoms.push(atom);
                Self::Many(atoms)
            }
        };
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns `true` for the empty set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Elements in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[Atom] {
        match self {
            Self::Empty => &[],
            Self::Single(atom) => slice::from_ref(atom),
            Self::Many(atoms) => atoms,
        }
    }

    /// Iterates over the elements in insertion order.
    pub fn iter(&self) -> slice::Iter<'_, Atom> {
        self.as_slice().iter()
    }

    /// Returns `true` when `atom` is an element of the set.
    #[must_use]
    pub fn contains(&self, atom: &Atom) -> bool {
        self.as_slice().contains(atom)
    }

    /// Consumes the set, returning its elements in order.
    #[must_use]
    pub fn into_vec(self) -> Vec<Atom> {
        match self {
            Self::Empty => Vec::new(),
            Self::Single(atom) => vec![atom],
            Self::Many(atoms) => atoms,
        }
    }

    /// Returns a serialisable view honouring the given encoding policy.
    #[must_use]
    pub const fn encode(&self, encoding: SetEncoding) -> EncodedSet<'_> {
        EncodedSet {
            set: self,
            encoding,
        }
    }

    /// Decodes a set from its JSON form.
    ///
    /// A bare atom is a one-element set. The tagged form decodes to exactly
    /// the listed elements, including the zero and one element cases.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::TypeMismatch`] for maps or nested collections and
    /// [`WireError::Format`] for shapes the protocol does not define.
    pub fn from_json(value: &Value) -> Result<Self, WireError> {
        if let Value::Array(items) = value {
            let (tag, payload) = split_tagged(items)?;
            match tag {
                SET_TAG => return Self::from_tagged_payload(payload),
                "map" => return Err(WireError::type_mismatch("set", "map")),
                _ => {}
            }
        }
        Atom::from_json(value).map(Self::Single)
    }

    pub(crate) fn from_tagged_payload(payload: &Value) -> Result<Self, WireError> {
        let elements = payload
            .as_array()
            .ok_or_else(|| WireError::format("'set' payload must be an array"))?;
        let atoms = elements
            .iter()
            .map(|element| {
                Atom::from_json(element).map_err(|error| match error {
                    WireError::TypeMismatch { found, .. } => {
                        WireError::type_mismatch("set element atom", found)
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_vec(atoms))
    }
}

impl<'a> IntoIterator for &'a OvsSet {
    type Item = &'a Atom;
    type IntoIter = slice::Iter<'a, Atom>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<A: Into<Atom>> FromIterator<A> for OvsSet {
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
        Self::from_atoms(iter)
    }
}

/// Borrowed view of an [`OvsSet`] that serialises under a chosen policy.
#[derive(Debug, Clone, Copy)]
pub struct EncodedSet<'a> {
    set: &'a OvsSet,
    encoding: SetEncoding,
}

impl Serialize for EncodedSet<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match (self.set, self.encoding) {
            (OvsSet::Single(atom), SetEncoding::Collapse) => atom.serialize(serializer),
            (set, _) => (SET_TAG, set.as_slice()).serialize(serializer),
        }
    }
}

impl Serialize for OvsSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.encode(SetEncoding::Collapse).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for OvsSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Self::from_json(&raw).map_err(de::Error::custom)
    }
}
