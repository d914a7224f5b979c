//! Reply serialisation for server-initiated requests.

use std::io::Write;

use serde::Serialize;
use serde_json::{Value, json};

use super::errors::DispatchError;

/// A JSON-RPC 1.0 reply.
///
/// Exactly one of `result` and `error` is non-null.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcResponse {
    /// Id copied from the request.
    pub id: Value,
    /// Method result, or `null` on failure.
    pub result: Value,
    /// Error object, or `null` on success.
    pub error: Value,
}

impl RpcResponse {
    /// Builds a successful reply.
    #[must_use]
    pub const fn success(id: Value, result: Value) -> Self {
        Self {
            id,
            result,
            error: Value::Null,
        }
    }

    /// Builds an error reply carrying the error's code and message.
    #[must_use]
    pub fn failure(id: Value, error: &DispatchError) -> Self {
        Self {
            id,
            result: Value::Null,
            error: json!({
                "error": error.code(),
                "details": error.to_string(),
            }),
        }
    }

    /// Returns `true` for error replies.
    #[must_use]
    pub fn is_error(&self) -> bool {
        !self.error.is_null()
    }
}

/// Writer that serialises replies to a stream, one per line.
pub struct ResponseWriter<W> {
    writer: W,
}

impl<W: Write> ResponseWriter<W> {
    /// Creates a new response writer wrapping the given output stream.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes one reply and flushes the stream.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation, writing or flushing fails.
    pub fn write_response(&mut self, response: &RpcResponse) -> Result<(), DispatchError> {
        serde_json::to_writer(&mut self.writer, response)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Consumes the writer, returning the wrapped stream.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}
