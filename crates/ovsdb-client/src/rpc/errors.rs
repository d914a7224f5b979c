//! Error types for JSON-RPC dispatch failures.
//!
//! Each variant maps to a protocol error code through
//! [`DispatchError::code`], so the connection can answer with an error reply
//! and stay open.

use std::io;

use thiserror::Error;

/// Errors surfaced while parsing and dispatching JSON-RPC messages.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The message is not a well-formed JSON-RPC request or notification.
    #[error("malformed request: {message}")]
    MalformedRequest {
        /// Description of the defect.
        message: String,
        /// Underlying parse failure, when there is one.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The method parameters do not have the expected shape.
    #[error("format error: {message}")]
    Format {
        /// Description of the defect.
        message: String,
        /// Underlying decode failure, when there is one.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The method name is not handled by this client.
    #[error("unknown method '{method}'")]
    UnknownMethod {
        /// Method name as received.
        method: String,
    },

    /// A message exceeded the size limit before its delimiter arrived.
    #[error("message too large: {size} bytes exceeds {max} byte limit")]
    MessageTooLarge {
        /// Bytes read so far.
        size: usize,
        /// Configured limit.
        max: usize,
    },

    /// IO error while reading a message or writing a reply.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Reply serialisation failed.
    #[error("failed to serialise response: {0}")]
    SerializeResponse(#[from] serde_json::Error),
}

impl DispatchError {
    /// Error code placed in protocol-level error replies.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MalformedRequest { .. } | Self::Format { .. } | Self::MessageTooLarge { .. } => {
                "syntax error"
            }
            Self::UnknownMethod { .. } => "unknown method",
            Self::Io(_) | Self::SerializeResponse(_) => "internal error",
        }
    }

    /// Creates a malformed request error from a serde error.
    #[must_use]
    pub fn malformed_json(source: serde_json::Error) -> Self {
        Self::MalformedRequest {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Creates a malformed request error with a custom message.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRequest {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a format error with a custom message.
    #[must_use]
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a format error from a failed payload decode.
    #[must_use]
    pub fn format_json(context: &str, source: serde_json::Error) -> Self {
        Self::Format {
            message: format!("{context}: {source}"),
            source: Some(source),
        }
    }

    /// Creates a size limit error.
    #[must_use]
    pub const fn message_too_large(size: usize, max: usize) -> Self {
        Self::MessageTooLarge { size, max }
    }

    /// Creates an unknown method error.
    #[must_use]
    pub fn unknown_method(method: impl Into<String>) -> Self {
        Self::UnknownMethod {
            method: method.into(),
        }
    }
}
