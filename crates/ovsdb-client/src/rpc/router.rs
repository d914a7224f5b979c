//! Method routing for server-initiated messages.
//!
//! `echo` is answered from the parameters alone. `update`, `locked` and
//! `stolen` are decoded and fanned out to the registered notification
//! handlers.

use std::sync::Arc;

use ovsdb_core::TableUpdates;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::errors::DispatchError;
use super::request::RpcRequest;
use super::response::RpcResponse;
use crate::handlers::NotificationHandlers;

/// Tracing target for RPC routing.
pub(crate) const RPC_TARGET: &str = "ovsdb_client::rpc";

/// Methods the server may invoke on a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcMethod {
    /// Liveness check; the reply echoes the parameters.
    Echo,
    /// Monitored tables changed.
    Update,
    /// A requested lock was granted.
    Locked,
    /// A held lock was taken by another client.
    Stolen,
}

impl RpcMethod {
    /// Parses a method name.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::UnknownMethod` for names this client does not
    /// handle.
    pub fn parse(method: &str) -> Result<Self, DispatchError> {
        match method {
            "echo" => Ok(Self::Echo),
            "update" => Ok(Self::Update),
            "locked" => Ok(Self::Locked),
            "stolen" => Ok(Self::Stolen),
            other => Err(DispatchError::unknown_method(other)),
        }
    }

    /// Wire name of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Echo => "echo",
            Self::Update => "update",
            Self::Locked => "locked",
            Self::Stolen => "stolen",
        }
    }
}

/// Routes server-initiated messages to their implementations.
#[derive(Debug, Clone)]
pub struct RpcRouter {
    handlers: Arc<NotificationHandlers>,
}

impl RpcRouter {
    /// Creates a router that fans notifications out to `handlers`.
    #[must_use]
    pub const fn new(handlers: Arc<NotificationHandlers>) -> Self {
        Self { handlers }
    }

    /// Handlers this router dispatches to.
    #[must_use]
    pub const fn handlers(&self) -> &Arc<NotificationHandlers> {
        &self.handlers
    }

    /// Runs one method and returns its result.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::UnknownMethod` for unhandled methods and
    /// `DispatchError::Format` when the parameters do not fit the method.
    pub fn handle(&self, name: &str, params: &[Value]) -> Result<Value, DispatchError> {
        let method = RpcMethod::parse(name)?;
        debug!(target: RPC_TARGET, method = method.as_str(), params = params.len(), "handling method");
        match method {
            RpcMethod::Echo => Ok(Value::Array(Self::echo(params))),
            RpcMethod::Update => self.update(params).map(|_| Value::Null),
            RpcMethod::Locked => {
                let lock_id = lock_param(params)?;
                let _notified = self.handlers.dispatch_locked(lock_id);
                Ok(Value::Null)
            }
            RpcMethod::Stolen => {
                let lock_id = lock_param(params)?;
                let _notified = self.handlers.dispatch_stolen(lock_id);
                Ok(Value::Null)
            }
        }
    }

    /// Answers a liveness check: the reply is the parameters, unchanged.
    #[must_use]
    pub fn echo(params: &[Value]) -> Vec<Value> {
        params.to_vec()
    }

    /// Decodes an `update` notification and delivers it to every handler,
    /// returning how many were invoked.
    ///
    /// `params[0]` is the monitor token and `params[1]` the table updates.
    /// Extra parameters are ignored. No handler runs unless the payload
    /// decodes.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Format` when fewer than two parameters are
    /// given or the payload is not a table-updates object.
    pub fn update(&self, params: &[Value]) -> Result<usize, DispatchError> {
        let [token, payload, ..] = params else {
            return Err(DispatchError::format(format!(
                "update expects 2 parameters, got {}",
                params.len()
            )));
        };
        let updates = TableUpdates::deserialize(payload)
            .map_err(|error| DispatchError::format_json("invalid table updates", error))?;
        Ok(self.handlers.dispatch_update(token, &updates))
    }

    /// Processes a decoded message, returning the reply to send.
    ///
    /// Notifications never produce a reply; failures are logged instead.
    #[must_use]
    pub fn route(&self, request: &RpcRequest) -> Option<RpcResponse> {
        let outcome = self.handle(&request.method, &request.params);
        if request.is_notification() {
            if let Err(error) = outcome {
                warn!(target: RPC_TARGET, method = %request.method, %error, "notification rejected");
            }
            return None;
        }
        Some(match outcome {
            Ok(result) => RpcResponse::success(request.id.clone(), result),
            Err(error) => {
                warn!(target: RPC_TARGET, method = %request.method, %error, "request failed");
                RpcResponse::failure(request.id.clone(), &error)
            }
        })
    }
}

fn lock_param(params: &[Value]) -> Result<&str, DispatchError> {
    params
        .first()
        .and_then(Value::as_str)
        .ok_or_else(|| DispatchError::format("expected a lock id as the first parameter"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::*;
    use crate::handlers::{MockNotificationHandler, NotificationHandler};

    #[fixture]
    fn handlers() -> Arc<NotificationHandlers> {
        Arc::new(NotificationHandlers::new())
    }

    fn register(handlers: &NotificationHandlers, handler: MockNotificationHandler) {
        let shared: Arc<dyn NotificationHandler> = Arc::new(handler);
        let _id = handlers.register(shared);
    }

    #[rstest]
    #[case(json!([]))]
    #[case(json!(["hi"]))]
    #[case(json!(["a", 1, {"b": null}, [true]]))]
    fn echo_returns_parameters_unchanged(handlers: Arc<NotificationHandlers>, #[case] raw: Value) {
        let router = RpcRouter::new(handlers);
        let params = raw.as_array().cloned().expect("array params");
        let result = router.handle("echo", &params).expect("echo succeeds");
        assert_eq!(result, Value::Array(params));
    }

    #[rstest]
    #[case(json!([]))]
    #[case(json!(["token"]))]
    #[case(json!(["token", "not an object"]))]
    #[case(json!(["token", {"Bridge": {"row": {"unexpected": {}}}}]))]
    fn malformed_updates_reach_no_handler(handlers: Arc<NotificationHandlers>, #[case] raw: Value) {
        let mut handler = MockNotificationHandler::new();
        handler.expect_update().never();
        register(&handlers, handler);
        let router = RpcRouter::new(handlers);

        let params = raw.as_array().cloned().expect("array params");
        let error = router.update(&params).expect_err("update should fail");
        assert!(matches!(error, DispatchError::Format { .. }), "got {error}");
    }

    #[rstest]
    fn well_formed_update_reaches_handlers(handlers: Arc<NotificationHandlers>) {
        let payload = json!({"table": {"row-uuid": {}}});
        let expected: TableUpdates = serde_json::from_value(payload.clone()).expect("decode updates");
        let row = expected
            .get("table")
            .and_then(|table| table.get("row-uuid"))
            .expect("row update");
        assert!(row.old.is_none() && row.new.is_none());

        let delivered = expected.clone();
        let mut handler = MockNotificationHandler::new();
        handler
            .expect_update()
            .withf(move |token, updates| *token == json!("monitor") && *updates == delivered)
            .times(1)
            .return_const(());
        register(&handlers, handler);
        let router = RpcRouter::new(handlers);

        let invoked = router
            .update(&[json!("monitor"), payload])
            .expect("update succeeds");
        assert_eq!(invoked, 1);
    }

    #[rstest]
    fn update_without_handlers_succeeds(handlers: Arc<NotificationHandlers>) {
        let router = RpcRouter::new(handlers);
        let result = router.handle("update", &[Value::Null, json!({})]);
        assert_eq!(result.expect("update succeeds"), Value::Null);
    }

    #[rstest]
    fn locked_passes_lock_id(handlers: Arc<NotificationHandlers>) {
        let mut handler = MockNotificationHandler::new();
        handler
            .expect_locked()
            .withf(|lock_id| lock_id == "ovn_northd")
            .times(1)
            .return_const(());
        register(&handlers, handler);
        let router = RpcRouter::new(handlers);
        router
            .handle("locked", &[json!("ovn_northd")])
            .expect("locked succeeds");
    }

    #[rstest]
    fn stolen_requires_lock_id(handlers: Arc<NotificationHandlers>) {
        let router = RpcRouter::new(handlers);
        let error = router.handle("stolen", &[json!(5)]).expect_err("lock id required");
        assert_eq!(error.code(), "syntax error");
    }

    #[rstest]
    fn unknown_methods_are_rejected(handlers: Arc<NotificationHandlers>) {
        let router = RpcRouter::new(handlers);
        let error = router.handle("transact", &[]).expect_err("unknown method");
        assert!(matches!(error, DispatchError::UnknownMethod { ref method } if method == "transact"));
    }

    #[rstest]
    fn requests_get_replies_and_notifications_do_not(handlers: Arc<NotificationHandlers>) {
        let router = RpcRouter::new(handlers);

        let echo = RpcRequest::parse(br#"{"method":"echo","params":["x"],"id":"echo"}"#).expect("parse");
        let reply = router.route(&echo).expect("echo reply");
        assert_eq!(reply.id, json!("echo"));
        assert_eq!(reply.result, json!(["x"]));
        assert!(!reply.is_error());

        let unknown = RpcRequest::parse(br#"{"method":"nope","params":[],"id":3}"#).expect("parse");
        let failure = router.route(&unknown).expect("error reply");
        assert!(failure.is_error());

        let notification = RpcRequest::parse(br#"{"method":"update","params":[],"id":null}"#).expect("parse");
        assert!(router.route(&notification).is_none());
    }
}
