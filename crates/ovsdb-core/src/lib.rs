//! Wire-level building blocks for the OVSDB management protocol.
//!
//! The crate owns the canonical in-memory form of every value the protocol
//! carries: atoms, sets and maps (see [`wire`]), the server-declared
//! [`schema`] discovered at connection time, and the table-update payloads
//! delivered by `update` notifications (see [`notification`]).
//!
//! Decoding is strict. Tagged forms are matched by their tag and anything the
//! protocol does not define is rejected with a [`WireError`] at the boundary
//! instead of surfacing later as a type confusion.
//!
//! # Example
//!
//! ```
//! use ovsdb_core::wire::{OvsSet, WireValue};
//!
//! let set = OvsSet::from_atoms(["eth0", "eth1"]);
//! let json = serde_json::to_value(&set).expect("serialise set");
//! assert_eq!(json, serde_json::json!(["set", ["eth0", "eth1"]]));
//!
//! let decoded: WireValue = serde_json::from_value(json).expect("decode");
//! assert_eq!(decoded, WireValue::Set(set));
//! ```

mod error;
pub mod notification;
pub mod schema;
pub mod wire;

pub use self::error::{SchemaError, WireError};
pub use self::notification::{Row, RowUpdate, TableUpdate, TableUpdates};
pub use self::schema::{AtomicType, BaseType, ColumnSchema, ColumnType, DatabaseSchema, Limit, TableSchema};
pub use self::wire::{Atom, OvsMap, OvsSet, WireValue};
