//! Payload types carried by `update` notifications.
//!
//! An `update` notification delivers a [`TableUpdates`] value: for every
//! monitored table, the rows that changed, keyed by row UUID. Each
//! [`RowUpdate`] holds the previous and/or current column values, and which
//! of the two is present tells the consumer whether the row was inserted,
//! deleted or modified.

use std::collections::HashMap;
use std::collections::hash_map;

use serde::{Deserialize, Serialize};

use crate::wire::WireValue;

/// Column values of one row.
///
/// Columns the server did not send are absent rather than null-filled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(HashMap<String, WireValue>);

impl Row {
    /// Creates a row with no columns.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of a column, if present.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&WireValue> {
        self.0.get(column)
    }

    /// Sets a column value, returning the previous one.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<WireValue>) -> Option<WireValue> {
        self.0.insert(column.into(), value.into())
    }

    /// Removes a column, returning its value.
    pub fn remove(&mut self, column: &str) -> Option<WireValue> {
        self.0.remove(column)
    }

    /// Number of columns present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no columns are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(column, value)` pairs in arbitrary order.
    #[must_use]
    pub fn iter(&self) -> hash_map::Iter<'_, String, WireValue> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<WireValue>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(column, value)| (column.into(), value.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = (&'a String, &'a WireValue);
    type IntoIter = hash_map::Iter<'a, String, WireValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Old and new column values of one changed row.
///
/// Both present means the row was modified, only `old` that it was deleted,
/// only `new` that it was inserted. Neither present is accepted on the wire
/// and passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RowUpdate {
    /// Column values before the change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old: Option<Row>,
    /// Column values after the change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new: Option<Row>,
}

impl RowUpdate {
    /// Update describing a freshly inserted row.
    #[must_use]
    pub const fn insert(new: Row) -> Self {
        Self {
            old: None,
            new: Some(new),
        }
    }

    /// Update describing a deleted row.
    #[must_use]
    pub const fn delete(old: Row) -> Self {
        Self {
            old: Some(old),
            new: None,
        }
    }

    /// Update describing a modified row.
    #[must_use]
    pub const fn modify(old: Row, new: Row) -> Self {
        Self {
            old: Some(old),
            new: Some(new),
        }
    }

    /// Returns `true` when only `new` is present.
    #[must_use]
    pub const fn is_insert(&self) -> bool {
        self.old.is_none() && self.new.is_some()
    }

    /// Returns `true` when only `old` is present.
    #[must_use]
    pub const fn is_delete(&self) -> bool {
        self.old.is_some() && self.new.is_none()
    }

    /// Returns `true` when both `old` and `new` are present.
    #[must_use]
    pub const fn is_modify(&self) -> bool {
        self.old.is_some() && self.new.is_some()
    }
}

/// Changed rows of one table, keyed by row UUID.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableUpdate(HashMap<String, RowUpdate>);

impl TableUpdate {
    /// Creates an empty table update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the update for a row.
    #[must_use]
    pub fn get(&self, uuid: &str) -> Option<&RowUpdate> {
        self.0.get(uuid)
    }

    /// Records the update for a row, returning any previous one.
    pub fn insert(&mut self, uuid: impl Into<String>, update: RowUpdate) -> Option<RowUpdate> {
        self.0.insert(uuid.into(), update)
    }

    /// Number of changed rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no rows changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(uuid, update)` pairs in arbitrary order.
    #[must_use]
    pub fn iter(&self) -> hash_map::Iter<'_, String, RowUpdate> {
        self.0.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, RowUpdate)> for TableUpdate {
    fn from_iter<I: IntoIterator<Item = (K, RowUpdate)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(uuid, update)| (uuid.into(), update)).collect())
    }
}

/// Full payload of one `update` notification, keyed by table name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableUpdates(HashMap<String, TableUpdate>);

impl TableUpdates {
    /// Creates an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the changes for one table.
    #[must_use]
    pub fn get(&self, table: &str) -> Option<&TableUpdate> {
        self.0.get(table)
    }

    /// Records the changes for a table, returning any previous ones.
    pub fn insert(&mut self, table: impl Into<String>, update: TableUpdate) -> Option<TableUpdate> {
        self.0.insert(table.into(), update)
    }

    /// Number of tables with changes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no table changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of changed rows across all tables.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.0.values().map(TableUpdate::len).sum()
    }

    /// Iterates over `(table, update)` pairs in arbitrary order.
    #[must_use]
    pub fn iter(&self) -> hash_map::Iter<'_, String, TableUpdate> {
        self.0.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, TableUpdate)> for TableUpdates {
    fn from_iter<I: IntoIterator<Item = (K, TableUpdate)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(table, update)| (table.into(), update)).collect())
    }
}
