//! Shared fixtures and BDD tests for the notification path.

use std::sync::{Arc, Mutex};

use ovsdb_core::{DatabaseSchema, TableUpdates};
use ovsdb_model::{ClientDbModel, ModelDescriptor};
use rstest::fixture;
use serde_json::{Value, json};

use crate::handlers::NotificationHandler;


#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Interface {
    pub(crate) uuid: String,
    pub(crate) name: String,
    pub(crate) ofport: Vec<i64>,
}

ovsdb_model::impl_model!(Interface {
    uuid: String => "_uuid",
    name: String => "name",
    ofport: Vec<i64> => "ofport",
});

#[fixture]
pub(crate) fn schema() -> DatabaseSchema {
    serde_json::from_value(json!({
        "name": "Open_vSwitch",
        "version": "8.3.0",
        "tables": {
            "Interface": {
                "columns": {
                    "name": {"type": "string", "mutable": false},
                    "ofport": {"type": {"key": "integer", "min": 0, "max": 1}}
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
        [("Interface", ModelDescriptor::of::<Interface>())],
    )
    .expect("registry should build")
}

/// Handler appending `label:notification` to a shared log.
pub(crate) struct Recorder {
    label: String,
    log: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub(crate) fn new(label: impl Into<String>, log: &Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            label: label.into(),
            log: Arc::clone(log),
        }
    }

    fn record(&self, notification: &str) {
        self.log
            .lock()
            .expect("log lock")
            .push(format!("{}:{notification}", self.label));
    }
}

impl NotificationHandler for Recorder {
    fn update(&self, _token: &Value, updates: &TableUpdates) {
        self.record(&format!("update({})", updates.row_count()));
    }

    fn locked(&self, lock_id: &str) {
        self.record(&format!("locked({lock_id})"));
    }

    fn disconnected(&self) {
        self.record("disconnected");
    }
}
