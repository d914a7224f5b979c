//! Scalar protocol values.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{self, Serialize, Serializer};
use serde_json::Value;

use crate::error::WireError;
use crate::schema::AtomicType;

pub(crate) const UUID_TAG: &str = "uuid";
pub(crate) const NAMED_UUID_TAG: &str = "named-uuid";

/// A single scalar value.
///
/// Strings, numbers and booleans travel as bare JSON. Row references travel
/// as `["uuid", "<id>"]`, and references to rows created earlier in the same
/// transaction as `["named-uuid", "<name>"]`.
#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    /// UTF-8 string.
    String(String),
    /// 64-bit signed integer.
    Integer(i64),
    /// Double-precision real.
    Real(f64),
    /// Boolean.
    Boolean(bool),
    /// Server-assigned row identifier.
    Uuid(String),
    /// Transaction-local row name.
    NamedUuid(String),
}

impl Atom {
    /// Builds a UUID reference atom.
    #[must_use]
    pub fn uuid(id: impl Into<String>) -> Self {
        Self::Uuid(id.into())
    }

    /// Builds a named-UUID reference atom.
    #[must_use]
    pub fn named_uuid(name: impl Into<String>) -> Self {
        Self::NamedUuid(name.into())
    }

    /// Returns the protocol type of this atom.
    ///
    /// Named UUIDs resolve to [`AtomicType::Uuid`] because they become
    /// ordinary UUIDs once the server commits the transaction.
    #[must_use]
    pub const fn atomic_type(&self) -> AtomicType {
        match self {
            Self::String(_) => AtomicType::String,
            Self::Integer(_) => AtomicType::Integer,
            Self::Real(_) => AtomicType::Real,
            Self::Boolean(_) => AtomicType::Boolean,
            Self::Uuid(_) | Self::NamedUuid(_) => AtomicType::Uuid,
        }
    }

    /// Returns the string payload of string, UUID and named-UUID atoms.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) | Self::Uuid(value) | Self::NamedUuid(value) => Some(value),
            Self::Integer(_) | Self::Real(_) | Self::Boolean(_) => None,
        }
    }

    /// Returns the integer payload.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the real payload.
    #[must_use]
    pub const fn as_real(&self) -> Option<f64> {
        match self {
            Self::Real(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the boolean payload.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// Short name used in diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Boolean(_) => "boolean",
            Self::Uuid(_) => "uuid",
            Self::NamedUuid(_) => "named-uuid",
        }
    }

    /// Decodes an atom from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::TypeMismatch`] when the input is a tagged set or
    /// map, and [`WireError::Format`] for any other non-atomic shape.
    pub fn from_json(value: &Value) -> Result<Self, WireError> {
        match value {
            Value::String(text) => Ok(Self::String(text.clone())),
            Value::Bool(flag) => Ok(Self::Boolean(*flag)),
            Value::Number(number) => number
                .as_i64()
                .map(Self::Integer)
                .or_else(|| number.as_f64().map(Self::Real))
                .ok_or_else(|| WireError::format(format!("unrepresentable number {number}"))),
            Value::Array(items) => Self::from_tagged(items),
            Value::Null => Err(WireError::format("null is not a protocol value")),
            Value::Object(_) => Err(WireError::format("objects are not protocol values")),
        }
    }

    fn from_tagged(items: &[Value]) -> Result<Self, WireError> {
        let (tag, payload) = split_tagged(items)?;
        match tag {
            UUID_TAG => Ok(Self::Uuid(tagged_string(tag, payload)?)),
            NAMED_UUID_TAG => Ok(Self::NamedUuid(tagged_string(tag, payload)?)),
            "set" | "map" => Err(WireError::type_mismatch("atom", tag)),
            other => Err(WireError::format(format!("unknown value tag '{other}'"))),
        }
    }
}

/// Splits a two-element tagged array into its tag and payload.
pub(crate) fn split_tagged(items: &[Value]) -> Result<(&str, &Value), WireError> {
    match items {
        [Value::String(tag), payload] => Ok((tag.as_str(), payload)),
        _ => Err(WireError::format(
            "arrays must be two-element [tag, payload] forms",
        )),
    }
}

fn tagged_string(tag: &str, payload: &Value) -> Result<String, WireError> {
    payload
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| WireError::format(format!("'{tag}' payload must be a string")))
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) => write!(f, "{value:?}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Real(value) => write!(f, "{value}"),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Uuid(value) => write!(f, "uuid:{value}"),
            Self::NamedUuid(value) => write!(f, "named-uuid:{value}"),
        }
    }
}

impl Serialize for Atom {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::String(value) => serializer.serialize_str(value),
            Self::Integer(value) => serializer.serialize_i64(*value),
            Self::Real(value) if value.is_finite() => serializer.serialize_f64(*value),
            Self::Real(value) => Err(ser::Error::custom(format!(
                "real {value} has no JSON representation"
            ))),
            Self::Boolean(value) => serializer.serialize_bool(*value),
            Self::Uuid(value) => (UUID_TAG, value).serialize(serializer),
            Self::NamedUuid(value) => (NAMED_UUID_TAG, value).serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Atom {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Self::from_json(&raw).map_err(de::Error::custom)
    }
}

impl From<String> for Atom {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Atom {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<i64> for Atom {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Atom {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<bool> for Atom {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}
