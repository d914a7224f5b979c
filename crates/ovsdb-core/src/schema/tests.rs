//! Unit tests for schema decoding.

use ovsdb_config::SetEncoding;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::error::SchemaError;
use crate::wire::{Atom, OvsSet};

fn column_type(value: Value) -> Result<ColumnType, serde_json::Error> {
    serde_json::from_value(value)
}

#[fixture]
fn bridge_schema() -> DatabaseSchema {
    serde_json::from_value(json!({
        "name": "Open_vSwitch",
        "version": "8.2.0",
        "tables": {
            "Bridge": {
                "columns": {
                    "name": {"type": "string", "mutable": false},
                    "ports": {"type": {"key": {"type": "uuid", "refTable": "Port"}, "min": 0, "max": "unlimited"}},
                    "external_ids": {"type": {"key": "string", "value": "string", "min": 0, "max": "unlimited"}},
                    "datapath_id": {"type": {"key": "string", "min": 0, "max": 1}, "ephemeral": true}
                },
                "isRoot": true,
                "indexes": [["name"]]
            }
        }
    }))
    .expect("bridge schema should decode")
}

#[rstest]
fn decodes_database_schema(bridge_schema: DatabaseSchema) {
    assert_eq!(bridge_schema.name, "Open_vSwitch");
    assert_eq!(bridge_schema.version, "8.2.0");
    let bridge = bridge_schema.table("Bridge").expect("bridge table");
    assert!(bridge.is_root);
    assert_eq!(bridge.indexes, vec![vec![String::from("name")]]);
    assert!(bridge_schema.table("Port").is_none());
}

#[rstest]
fn decodes_column_flags(bridge_schema: DatabaseSchema) {
    let bridge = bridge_schema.table("Bridge").expect("bridge table");
    let name = bridge.column("name").expect("name column");
    assert!(!name.mutable);
    assert!(!name.ephemeral);
    let datapath = bridge.column("datapath_id").expect("datapath column");
    assert!(datapath.mutable);
    assert!(datapath.ephemeral);
}

#[rstest]
#[case(UUID_COLUMN)]
#[case(VERSION_COLUMN)]
fn exposes_implicit_columns(bridge_schema: DatabaseSchema, #[case] column: &str) {
    let bridge = bridge_schema.table("Bridge").expect("bridge table");
    let implicit = bridge.column(column).expect("implicit column");
    assert_eq!(implicit.column_type, ColumnType::atomic(AtomicType::Uuid));
    assert!(bridge.column("_missing").is_none());
}

#[test]
fn bare_name_is_atomic() {
    let parsed = column_type(json!("integer")).expect("decode");
    assert_eq!(parsed, ColumnType::atomic(AtomicType::Integer));
}

#[test]
fn key_only_with_default_bounds_is_atomic() {
    let parsed = column_type(json!({"key": "boolean"})).expect("decode");
    assert_eq!(parsed, ColumnType::atomic(AtomicType::Boolean));
}

#[test]
fn optional_set_is_detected() {
    let parsed = column_type(json!({"key": "string", "min": 0, "max": 1})).expect("decode");
    assert!(parsed.is_set());
    assert!(parsed.is_optional());
}

#[test]
fn unlimited_set_keeps_reference_table() {
    let parsed = column_type(json!({
        "key": {"type": "uuid", "refTable": "Port"},
        "min": 0,
        "max": "unlimited"
    }))
    .expect("decode");
    let ColumnType::Set { key, min, max } = parsed else {
        panic!("expected set column");
    };
    assert_eq!(key.atomic, AtomicType::Uuid);
    assert_eq!(key.ref_table.as_deref(), Some("Port"));
    assert_eq!(min, 0);
    assert_eq!(max, Limit::Unlimited);
}

#[test]
fn key_value_pair_is_map() {
    let parsed = column_type(json!({"key": "string", "value": "integer", "min": 0, "max": "unlimited"}))
        .expect("decode");
    let ColumnType::Map { key, value, .. } = parsed else {
        panic!("expected map column");
    };
    assert_eq!(key.atomic, AtomicType::String);
    assert_eq!(value.atomic, AtomicType::Integer);
}

#[test]
fn decodes_enum_constraint() {
    let parsed = column_type(json!({
        "key": {"type": "string", "enum": ["set", ["secure", "standalone"]]},
        "min": 0,
        "max": 1
    }))
    .expect("decode");
    let expected = OvsSet::from_atoms(["secure", "standalone"]);
    assert_eq!(parsed.key().enumeration.as_ref(), Some(&expected));
    assert!(
        parsed
            .key()
            .enumeration
            .as_ref()
            .is_some_and(|values| values.contains(&Atom::from("secure")))
    );
}

#[rstest]
#[case(json!("text"))]
#[case(json!({"key": "string", "max": "lots"}))]
#[case(json!({"key": "string", "min": 3, "max": 2}))]
#[case(json!({"key": "string", "min": 0, "max": 0}))]
#[case(json!({"value": "string"}))]
fn rejects_invalid_column_types(#[case] input: Value) {
    assert!(column_type(input).is_err());
}

#[test]
fn unknown_atomic_name_reports_schema_error() {
    let error = "text".parse::<AtomicType>().expect_err("unknown type");
    assert_eq!(
        error,
        SchemaError::UnknownAtomicType {
            name: String::from("text")
        }
    );
}

#[rstest]
#[case(json!({"key": "string", "min": 0, "max": "unlimited"}), SetEncoding::Collapse)]
#[case(json!({"key": "string", "min": 1, "max": 4}), SetEncoding::Collapse)]
#[case(json!("string"), SetEncoding::Collapse)]
fn derives_set_encoding_from_cardinality(#[case] input: Value, #[case] expected: SetEncoding) {
    let parsed = column_type(input).expect("decode");
    assert_eq!(parsed.set_encoding(), expected);
}

#[test]
fn sets_requiring_several_elements_stay_tagged() {
    let built = ColumnType::Set {
        key: BaseType::new(AtomicType::String),
        min: 2,
        max: Limit::Bounded(4),
    };
    assert_eq!(built.set_encoding(), SetEncoding::Tagged);
}

#[rstest]
#[case(2)]
#[case(7)]
fn rejects_minimums_above_one(#[case] min: u64) {
    let error = column_type(json!({"key": "string", "min": min, "max": "unlimited"}))
        .expect_err("min must be 0 or 1");
    let expected = SchemaError::InvalidMinimum { min }.to_string();
    assert!(error.to_string().contains(&expected), "got {error}");
}
