//! JSON-RPC message handling for server-initiated methods.
//!
//! The server sends `echo` requests to check liveness and `update`,
//! `locked` and `stolen` notifications. [`RpcRequest`] decodes one message,
//! [`RpcRouter`] routes it by method name, and [`RpcResponse`] renders the
//! reply for requests that carry an id:
//!
//! ```json
//! {"method":"echo","params":["ping"],"id":"echo"}
//! {"id":"echo","result":["ping"],"error":null}
//! ```
//!
//! Notifications (`"id": null`) never receive a reply, not even on failure.

mod errors;
mod request;
mod response;
mod router;

pub use self::errors::DispatchError;
pub use self::request::RpcRequest;
pub use self::response::{ResponseWriter, RpcResponse};
pub use self::router::{RpcMethod, RpcRouter};
