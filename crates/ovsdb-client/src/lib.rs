//! Notification path of an OVSDB client.
//!
//! The server pushes JSON-RPC messages to its clients: `echo` checks that must
//! be answered, and `update`, `locked` and `stolen` notifications describing
//! changes the client subscribed to. [`OvsdbClient`] reads those messages,
//! answers what needs answering, and hands decoded notifications to every
//! [`NotificationHandler`] registered with it, in registration order.
//!
//! ```
//! use std::sync::Arc;
//!
//! use ovsdb_client::{NotificationHandler, OvsdbClient};
//! use ovsdb_config::Config;
//! use ovsdb_core::TableUpdates;
//! use ovsdb_model::ClientDbModel;
//! use serde_json::{Value, json};
//!
//! struct Printer;
//!
//! impl NotificationHandler for Printer {
//!     fn update(&self, _token: &Value, updates: &TableUpdates) {
//!         tracing::info!(rows = updates.row_count(), "update received");
//!     }
//! }
//!
//! let model = ClientDbModel::new("Open_vSwitch", Vec::<(String, _)>::new())
//!     .expect("empty registry");
//! let client = OvsdbClient::new(Config::default(), model);
//! let _id = client.register_handler(Arc::new(Printer));
//!
//! let invoked = client
//!     .update(&[Value::Null, json!({"Bridge": {"row": {}}})])
//!     .expect("update accepted");
//! assert_eq!(invoked, 1);
//! ```

mod client;
mod handlers;
mod rpc;
pub mod telemetry;

pub use self::client::{MAX_MESSAGE_BYTES, OvsdbClient};
pub use self::handlers::{HandlerId, NotificationHandler, NotificationHandlers};
pub use self::rpc::{DispatchError, ResponseWriter, RpcMethod, RpcRequest, RpcResponse, RpcRouter};

#[cfg(test)]
mod tests;
