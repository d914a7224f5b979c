//! Canonical in-memory forms of protocol values.
//!
//! The protocol encodes collections with a small tagging scheme:
//!
//! | value | wire form |
//! |-------|-----------|
//! | atom | bare JSON string, number or boolean |
//! | row reference | `["uuid", "<id>"]` or `["named-uuid", "<name>"]` |
//! | set | bare atom when it holds one element, otherwise `["set", [..]]` |
//! | map | `["map", [[key, value], ..]]`, always tagged |
//!
//! Sets and maps hold atoms only; a collection inside a collection is
//! rejected with [`crate::WireError::TypeMismatch`].

mod atom;
mod map;
mod set;
mod value;

pub use self::atom::Atom;
pub use self::map::OvsMap;
pub use self::set::{EncodedSet, OvsSet};
pub use self::value::WireValue;
