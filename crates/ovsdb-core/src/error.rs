//! Error types raised while building or decoding protocol values.

use thiserror::Error;

/// Errors arising from wire value construction and decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    /// A value of the wrong kind was supplied where another was required.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Kind the container or decoder required.
        expected: &'static str,
        /// Kind that was actually supplied.
        found: String,
    },

    /// The JSON shape does not follow any of the protocol's value forms.
    #[error("malformed wire value: {message}")]
    Format {
        /// Description of the malformed input.
        message: String,
    },
}

impl WireError {
    /// Builds a `TypeMismatch` error.
    #[must_use]
    pub fn type_mismatch(expected: &'static str, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected,
            found: found.into(),
        }
    }

    /// Builds a `Format` error.
    #[must_use]
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }
}

/// Errors raised while decoding a column type declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The atomic type name is not one the protocol defines.
    #[error("unknown atomic type '{name}'")]
    UnknownAtomicType {
        /// Name found in the schema.
        name: String,
    },

    /// A `max` bound was neither a count nor `"unlimited"`.
    #[error("invalid cardinality limit '{value}'")]
    InvalidLimit {
        /// Text found in the schema.
        value: String,
    },

    /// A `min` other than 0 or 1 was declared.
    #[error("invalid cardinality: min {min} must be 0 or 1")]
    InvalidMinimum {
        /// Declared minimum.
        min: u64,
    },

    /// Declared bounds cannot be satisfied by any value.
    #[error("invalid cardinality: min {min}, max {max}")]
    InvalidCardinality {
        /// Declared minimum.
        min: u64,
        /// Declared maximum.
        max: u64,
    },

    /// The `enum` constraint of a base type could not be decoded.
    #[error("invalid enum constraint: {source}")]
    InvalidEnum {
        /// Underlying decode failure.
        #[source]
        source: WireError,
    },
}
