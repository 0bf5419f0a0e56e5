//! Flattening of wire records into export rows.

use crate::models::category::Category;
use crate::models::record::{Status, WireRecord};
use serde_json::Value;

pub const STATUS_LABEL: &str = "상태";

/// Korean display labels in registry order, then the status column.
pub fn headers(category: Category) -> Vec<&'static str> {
    category
        .fields()
        .iter()
        .map(|f| f.label)
        .chain(std::iter::once(STATUS_LABEL))
        .collect()
}

pub fn record_to_row(category: Category, record: &WireRecord) -> Vec<String> {
    let mut row: Vec<String> = category
        .fields()
        .iter()
        .map(|f| cell_text(record.get(f.key)))
        .collect();

    let status = record
        .get("status")
        .map(Status::from_wire)
        .unwrap_or_default();
    row.push(status.label().to_string());
    row
}

pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
