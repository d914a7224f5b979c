//! Crate-level fixtures, integration and BDD tests.

use std::collections::BTreeMap;

use ovsdb_config::SetEncoding;
use ovsdb_core::{Atom, DatabaseSchema, Row, RowUpdate, TableUpdates};
use rstest::fixture;
use serde_json::json;

use crate::registry::{ClientDbModel, ModelDescriptor};


#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Bridge {
    pub(crate) uuid: String,
    pub(crate) name: String,
    pub(crate) ports: Vec<String>,
    pub(crate) external_ids: BTreeMap<String, String>,
    pub(crate) datapath_id: Option<String>,
}

crate::impl_model!(Bridge {
    uuid: String => "_uuid",
    name: String => "name",
    ports: Vec<String> => "ports",
    external_ids: BTreeMap<String, String> => "external_ids",
    datapath_id: Option<String> => "datapath_id",
});

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Port {
    pub(crate) uuid: String,
    pub(crate) name: String,
    pub(crate) tag: Option<i64>,
    pub(crate) trunks: Vec<i64>,
}

crate::impl_model!(Port {
    uuid: String => "_uuid",
    name: String => "name",
    tag: Option<i64> => "tag",
    trunks: Vec<i64> => "trunks",
});

/// Record whose name field is bound to a set column.
#[derive(Debug, Default)]
pub(crate) struct ScalarPorts {
    pub(crate) uuid: String,
    pub(crate) ports: String,
}

crate::impl_model!(ScalarPorts {
    uuid: String => "_uuid",
    ports: String => "ports",
});

/// Record lacking a row-identity field.
#[derive(Debug, Default)]
pub(crate) struct Anonymous {
    pub(crate) name: String,
}

crate::impl_model!(Anonymous {
    name: String => "name",
});

/// Record whose row identity is not a string.
#[derive(Debug, Default)]
pub(crate) struct NumberedRow {
    pub(crate) uuid: i64,
}

crate::impl_model!(NumberedRow {
    uuid: i64 => "_uuid",
});

pub(crate) const BRIDGE_UUID: &str = "2f77b348-9768-4866-b761-89d5177ecda0";
pub(crate) const PORT_UUID: &str = "7ab4bd35-b7f3-4d53-ac3f-2ad4b3a3a3e6";

#[fixture]
pub(crate) fn schema() -> DatabaseSchema {
    serde_json::from_value(json!({
        "name": "Open_vSwitch",
        "version": "8.3.0",
        "tables": {
            "Bridge": {
                "columns": {
                    "name": {"type": "string", "mutable": false},
                    "ports": {"type": {"key": {"type": "uuid", "refTable": "Port"}, "min": 0, "max": "unlimited"}},
                    "external_ids": {"type": {"key": "string", "value": "string", "min": 0, "max": "unlimited"}},
                    "datapath_id": {"type": {"key": "string", "min": 0, "max": 1}, "ephemeral": true}
                },
                "isRoot": true
            },
            "Port": {
                "columns": {
                    "name": {"type": "string"},
                    "tag": {"type": {"key": {"type": "integer", "minInteger": 0, "maxInteger": 4095}, "min": 0, "max": 1}},
                    "trunks": {"type": {"key": "integer", "min": 0, "max": 4096}}
                }
            }
        }
    }))
    .expect("schema should decode")
}

#[fixture]
pub(crate) fn registry() -> ClientDbModel {
    ClientDbModel::new(
        "Open_vSwitch",
        [
            ("Bridge", ModelDescriptor::of::<Bridge>()),
            ("Port", ModelDescriptor::of::<Port>()),
        ],
    )
    .expect("registry should build")
}

#[test]
fn decodes_update_notification_into_records() {
    let schema = schema();
    let binding = registry().bind(&schema).expect("registry binds");
    let updates: TableUpdates = serde_json::from_value(json!({
        "Bridge": {
            BRIDGE_UUID: {
                "old": {"ports": ["set", []]},
                "new": {
                    "name": "br-int",
                    "ports": ["uuid", PORT_UUID],
                    "external_ids": ["map", [["owner", "ovn"]]],
                    "datapath_id": ["set", []]
                }
            }
        }
    }))
    .expect("payload decodes");

    let update = updates
        .get("Bridge")
        .and_then(|table| table.get(BRIDGE_UUID))
        .expect("bridge row update");
    let decoded = binding
        .model_update("Bridge", BRIDGE_UUID, update)
        .expect("update decodes");

    let new = decoded
        .new
        .and_then(|model| model.downcast::<Bridge>())
        .expect("new bridge");
    assert_eq!(new.uuid, BRIDGE_UUID);
    assert_eq!(new.name, "br-int");
    assert_eq!(new.ports, vec![PORT_UUID.to_owned()]);
    assert_eq!(new.external_ids.get("owner").map(String::as_str), Some("ovn"));
    assert_eq!(new.datapath_id, None);

    let old = decoded
        .old
        .and_then(|model| model.downcast::<Bridge>())
        .expect("old bridge");
    assert_eq!(old.name, "br-int");
    assert!(old.ports.is_empty());
}

#[test]
fn deletion_yields_only_old_record() {
    let binding = registry().bind(&schema()).expect("registry binds");
    let row: Row = [("name", Atom::from("eth0"))].into_iter().collect();
    let decoded = binding
        .model_update("Port", PORT_UUID, &RowUpdate::delete(row))
        .expect("update decodes");
    assert!(decoded.new.is_none());
    let old = decoded.old.expect("old record");
    assert_eq!(old.downcast_ref::<Port>().map(|port| port.name.as_str()), Some("eth0"));
}

#[test]
fn encodes_records_for_the_wire() {
    let binding = registry().bind(&schema()).expect("registry binds");
    let port = Port {
        uuid: PORT_UUID.to_owned(),
        name: "eth0".to_owned(),
        tag: Some(10),
        trunks: vec![20],
    };

    let (table, row) = binding
        .encode_model(&port, SetEncoding::Collapse)
        .expect("port encodes");
    assert_eq!(table, "Port");
    assert_eq!(row.get("name"), Some(&json!("eth0")));
    assert_eq!(row.get("tag"), Some(&json!(10)));
    assert_eq!(row.get("trunks"), Some(&json!(20)));
    assert!(row.get("_uuid").is_none());

    let (_, tagged) = binding
        .encode_model(&port, SetEncoding::Tagged)
        .expect("port encodes");
    assert_eq!(tagged.get("trunks"), Some(&json!(["set", [20]])));
}

#[test]
fn unregistered_records_cannot_be_encoded() {
    let binding = registry().bind(&schema()).expect("registry binds");
    let error = binding
        .encode_model(&Anonymous::default(), SetEncoding::Collapse)
        .expect_err("unregistered record");
    assert!(matches!(error, crate::ModelError::NotFound { .. }), "got {error}");
}
