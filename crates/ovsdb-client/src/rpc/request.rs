//! Request deserialisation for server-initiated messages.

use serde::Deserialize;
use serde_json::Value;

use super::errors::DispatchError;

/// A decoded JSON-RPC 1.0 request or notification.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RpcRequest {
    /// Method name.
    pub method: String,
    /// Positional parameters.
    #[serde(default)]
    pub params: Vec<Value>,
    /// Request id; `null` for notifications.
    #[serde(default)]
    pub id: Value,
}

impl RpcRequest {
    /// Parses one message.
    ///
    /// Trailing whitespace (including a newline delimiter) is trimmed before
    /// parsing.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::MalformedRequest` if the message is empty, is
    /// not valid JSON, or does not have the request shape.
    pub fn parse(message: &[u8]) -> Result<Self, DispatchError> {
        let trimmed = message.trim_ascii_end();
        if trimmed.is_empty() {
            return Err(DispatchError::malformed("empty message"));
        }
        serde_json::from_slice(trimmed).map_err(DispatchError::malformed_json)
    }

    /// Returns `true` when no reply is expected.
    #[must_use]
    pub fn is_notification(&self) -> bool {
        self.id.is_null()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_echo_request() {
        let request = RpcRequest::parse(br#"{"method":"echo","params":[],"id":"echo"}"#)
            .expect("parse echo");
        assert_eq!(request.method, "echo");
        assert!(request.params.is_empty());
        assert_eq!(request.id, json!("echo"));
        assert!(!request.is_notification());
    }

    #[test]
    fn parses_update_notification() {
        let input = b"{\"method\":\"update\",\"params\":[null,{}],\"id\":null}\n";
        let request = RpcRequest::parse(input).expect("parse update");
        assert_eq!(request.params.len(), 2);
        assert!(request.is_notification());
    }

    #[test]
    fn missing_id_is_a_notification() {
        let request = RpcRequest::parse(br#"{"method":"locked","params":["lock"]}"#)
            .expect("parse without id");
        assert!(request.is_notification());
    }

    #[test]
    fn rejects_whitespace_only() {
        let result = RpcRequest::parse(b"  \n");
        assert!(matches!(result, Err(DispatchError::MalformedRequest { .. })));
    }

    #[test]
    fn rejects_invalid_json() {
        let result = RpcRequest::parse(b"not json");
        assert!(matches!(result, Err(DispatchError::MalformedRequest { .. })));
    }

    #[test]
    fn rejects_non_array_params() {
        let result = RpcRequest::parse(br#"{"method":"echo","params":"x","id":1}"#);
        assert!(matches!(result, Err(DispatchError::MalformedRequest { .. })));
    }
}
