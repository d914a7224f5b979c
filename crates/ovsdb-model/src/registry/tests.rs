//! Unit tests for the database model registry.

use ovsdb_core::DatabaseSchema;
use rstest::rstest;

use super::*;
use crate::error::MapperError;
use crate::tests::{Anonymous, Bridge, NumberedRow, Port, ScalarPorts, registry, schema};

#[rstest]
fn registry_reports_name_and_tables(registry: ClientDbModel) {
    assert_eq!(registry.name(), "Open_vSwitch");
    assert_eq!(registry.len(), 2);
    assert!(!registry.is_empty());
    assert_eq!(registry.tables(), vec!["Bridge", "Port"]);
}

#[rstest]
fn new_model_returns_fresh_instances(registry: ClientDbModel) {
    let mut first = registry.new_model("Bridge").expect("bridge instance");
    if let Some(bridge) = first.downcast_mut::<Bridge>() {
        bridge.name = "br0".to_owned();
    }
    let second = registry.new_model("Bridge").expect("bridge instance");
    assert_eq!(second.downcast_ref::<Bridge>(), Some(&Bridge::default()));
}

#[rstest]
fn new_model_rejects_unknown_tables(registry: ClientDbModel) {
    let error = registry.new_model("Interface").expect_err("unknown table");
    assert!(matches!(error, ModelError::NotFound { ref table } if table == "Interface"));
    assert_eq!(error.to_string(), "table 'Interface' not found in database model");
}

#[rstest]
fn find_table_resolves_registered_shapes(registry: ClientDbModel) {
    assert_eq!(registry.find_table(TypeId::of::<Port>()), Some("Port"));
    assert_eq!(registry.find_table_for::<Bridge>(), Some("Bridge"));
    assert_eq!(registry.find_table_of(&Port::default()), Some("Port"));
    assert_eq!(registry.find_table_for::<Anonymous>(), None);
}

#[test]
fn rejects_shapes_without_row_identity() {
    let error = ClientDbModel::new("db", [("Anon", ModelDescriptor::of::<Anonymous>())])
        .expect_err("missing identity");
    assert!(matches!(error, ModelError::Configuration { .. }));
    assert!(error.to_string().contains("_uuid"), "got {error}");
}

#[test]
fn rejects_non_string_row_identity() {
    let error = ClientDbModel::new("db", [("Numbered", ModelDescriptor::of::<NumberedRow>())])
        .expect_err("integer identity");
    assert!(matches!(error, ModelError::Configuration { .. }));
}

#[test]
fn rejects_duplicate_registrations() {
    let error = ClientDbModel::new(
        "db",
        [
            ("Port", ModelDescriptor::of::<Port>()),
            ("Interface", ModelDescriptor::of::<Port>()),
        ],
    )
    .expect_err("shape registered twice");
    assert!(matches!(error, ModelError::Configuration { .. }));
}

#[rstest]
fn validate_accepts_matching_schema(registry: ClientDbModel, schema: DatabaseSchema) {
    assert!(registry.validate(&schema).is_empty());
}

#[rstest]
fn validate_collects_every_error(schema: DatabaseSchema) {
    let registry = ClientDbModel::new(
        "Fake",
        [
            ("Bridge", ModelDescriptor::of::<ScalarPorts>()),
            ("Interface", ModelDescriptor::of::<Port>()),
        ],
    )
    .expect("registry builds");

    let errors = registry.validate(&schema);
    assert_eq!(errors.len(), 3, "got {errors:?}");
    assert!(matches!(
        errors.first(),
        Some(ModelError::NameMismatch { model, schema: server }) if model == "Fake" && server == "Open_vSwitch"
    ));
    assert!(errors.iter().any(|error| matches!(
        error,
        ModelError::Mapper { table, source }
            if table == "Bridge" && matches!(**source, MapperError::IncompatibleField { .. })
    )));
    assert!(errors.iter().any(
        |error| matches!(error, ModelError::MissingTable { table } if table == "Interface")
    ));
}

#[rstest]
fn validate_reports_name_mismatch_message(schema: DatabaseSchema) {
    let registry = ClientDbModel::new("Fake", [("Port", ModelDescriptor::of::<Port>())])
        .expect("registry builds");
    let messages: Vec<String> = registry
        .validate(&schema)
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        messages,
        vec!["database model name (Fake) does not match schema (Open_vSwitch)".to_owned()]
    );
}

#[rstest]
fn bind_returns_errors_instead_of_bindings(schema: DatabaseSchema) {
    let registry = ClientDbModel::new("Open_vSwitch", [("Interface", ModelDescriptor::of::<Port>())])
        .expect("registry builds");
    let errors = registry.bind(&schema).expect_err("missing table");
    assert_eq!(errors.len(), 1);
}

#[rstest]
fn bind_covers_every_table(registry: ClientDbModel, schema: DatabaseSchema) {
    let binding = registry.bind(&schema).expect("registry binds");
    assert_eq!(binding.len(), 2);
    assert_eq!(binding.table("Port").map(TableBinding::uuid_field), Some("uuid"));
}
