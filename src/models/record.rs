//! Record shapes: the JSON object exchanged over HTTP and the presence-aware
//! row handed to the storage backends.

use serde_json::{Map, Value};

/// A record as sent and received over the API: a flat JSON object.
pub type WireRecord = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Incomplete,
    Completed,
}

impl Status {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Status::Incomplete => "incomplete",
            Status::Completed => "completed",
        }
    }

    /// Convert DB string → enum. Anything but `completed` counts as incomplete.
    pub fn from_db_str(s: &str) -> Self {
        match s {
            "completed" => Status::Completed,
            _ => Status::Incomplete,
        }
    }

    pub fn from_wire(value: &Value) -> Self {
        value
            .as_str()
            .map(Status::from_db_str)
            .unwrap_or_default()
    }

    /// Display label used in exports.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Incomplete => "미완료",
            Status::Completed => "완료",
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Status::Completed)
    }
}

/// Column values for one category row.
///
/// Only the columns that are present are listed, which is what lets an
/// update touch a subset of fields. `id` and `status` live outside `fields`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StorageRow {
    pub id: Option<i64>,
    pub status: Option<Status>,
    pub fields: Vec<(&'static str, Value)>,
}

impl StorageRow {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Replace the value of `key`, appending it if absent.
    pub fn set(&mut self, key: &'static str, value: Value) {
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Shallow merge: every column present in `patch` overwrites ours.
    /// The id is never taken from the patch.
    pub fn merge(&mut self, patch: &StorageRow) {
        if let Some(status) = patch.status {
            self.status = Some(status);
        }
        for (key, value) in &patch.fields {
            self.set(key, value.clone());
        }
    }

    pub fn no(&self) -> Option<&Value> {
        self.get("no")
    }
}
