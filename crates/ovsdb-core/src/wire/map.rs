//! Insertion-ordered maps of atom keys to atom values.

use std::slice;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use serde_json::Value;

use super::atom::{Atom, split_tagged};
use super::value::WireValue;
use crate::error::WireError;

const MAP_TAG: &str = "map";

/// A map from atoms to atoms.
///
/// Maps are always written in the tagged `["map", [[k, v], ...]]` form, even
/// when empty or holding a single pair. Entries keep insertion order so
/// re-serialisation is deterministic; inserting an existing key replaces its
/// value without moving it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OvsMap {
    entries: Vec<(Atom, Atom)>,
}

impl OvsMap {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Builds a map from pairs convertible into atoms.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Atom>,
        V: Into<Atom>,
    {
        let mut map = Self::new();
        for (key, value) in pairs {
            map.insert(key, value);
        }
        map
    }

    /// Builds a map from arbitrary wire value pairs.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::TypeMismatch`] when a key or value is a set or a
    /// map.
    pub fn try_from_values<I>(pairs: I) -> Result<Self, WireError>
    where
        I: IntoIterator<Item = (WireValue, WireValue)>,
    {
        let mut map = Self::new();
        for (key, value) in pairs {
            map.insert(
                expect_atom("map key atom", key)?,
                expect_atom("map value atom", value)?,
            );
        }
        Ok(map)
    }

    /// Inserts a pair, returning the previous value for the key.
    pub fn insert(&mut self, key: impl Into<Atom>, value: impl Into<Atom>) -> Option<Atom> {
        self.insert_atoms(key.into(), value.into())
    }

    fn insert_atoms(&mut self, key: Atom, value: Atom) -> Option<Atom> {
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Looks up the value stored for `key`.
    #[must_use]
    pub fn get(&self, key: &Atom) -> Option<&Atom> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    /// Looks up the value stored for a string key.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&Atom> {
        self.entries
            .iter()
            .find(|(existing, _)| matches!(existing, Atom::String(text) if text == key))
            .map(|(_, value)| value)
    }

    /// Number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the map has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> slice::Iter<'_, (Atom, Atom)> {
        self.entries.iter()
    }

    /// Consumes the map, returning its entries in insertion order.
    #[must_use]
    pub fn into_entries(self) -> Vec<(Atom, Atom)> {
        self.entries
    }

    /// Decodes a map from its tagged JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::TypeMismatch`] when the input is a set or bare
    /// atom, or when a key or value is not atomic; [`WireError::Format`] for
    /// malformed pair lists and repeated keys.
    pub fn from_json(value: &Value) -> Result<Self, WireError> {
        let Value::Array(items) = value else {
            return Err(WireError::type_mismatch("map", json_kind(value)));
        };
        let (tag, payload) = split_tagged(items)?;
        if tag != MAP_TAG {
            return Err(WireError::type_mismatch("map", tag));
        }
        Self::from_tagged_payload(payload)
    }

    pub(crate) fn from_tagged_payload(payload: &Value) -> Result<Self, WireError> {
        let pairs = payload
            .as_array()
            .ok_or_else(|| WireError::format("'map' payload must be an array"))?;
        let mut map = Self::new();
        for pair in pairs {
            let Some([key, value]) = pair.as_array().map(Vec::as_slice) else {
                return Err(WireError::format("map entries must be [key, value] pairs"));
            };
            let replaced = map.insert_atoms(
                decode_atom("map key atom", key)?,
                decode_atom("map value atom", value)?,
            );
            if replaced.is_some() {
                return Err(WireError::format(format!("duplicate map key {key}")));
            }
        }
        Ok(map)
    }
}

fn expect_atom(expected: &'static str, value: WireValue) -> Result<Atom, WireError> {
    match value {
        WireValue::Atom(atom) => Ok(atom),
        other => Err(WireError::type_mismatch(expected, other.kind_name())),
    }
}

fn decode_atom(expected: &'static str, value: &Value) -> Result<Atom, WireError> {
    Atom::from_json(value).map_err(|error| match error {
        WireError::TypeMismatch { found, .. } => WireError::type_mismatch(expected, found),
        other => other,
    })
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl<'a> IntoIterator for &'a OvsMap {
    type Item = &'a (Atom, Atom);
    type IntoIter = slice::Iter<'a, (Atom, Atom)>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Into<Atom>, V: Into<Atom>> FromIterator<(K, V)> for OvsMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

impl Serialize for OvsMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (MAP_TAG, &self.entries).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for OvsMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Self::from_json(&raw).map_err(de::Error::custom)
    }
}
