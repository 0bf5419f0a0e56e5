//! Translation between wire records and storage rows.
//!
//! Wire keys and column names are the same English keys from the category
//! registry, so the codec only filters by presence and types values:
//! `encode` keeps the fields present in the input, `decode` fills every
//! registry field.
//!
//! Values are coerced the way SQLite column affinity would store them, in
//! both backends.

use crate::models::category::{Category, FieldDef, FieldKind};
use crate::models::record::{Status, StorageRow, WireRecord};
use serde_json::{Number, Value};

/// Storage row → wire record. Absent or NULL fields become `""`.
pub fn decode(row: &StorageRow, category: Category) -> WireRecord {
    let mut out = WireRecord::new();
    out.insert("id".into(), row.id.map(Value::from).unwrap_or(Value::Null));
    out.insert(
        "status".into(),
        Value::from(row.status.unwrap_or_default().to_db_str()),
    );

    for field in category.fields() {
        let value = match row.get(field.key) {
            None | Some(Value::Null) => Value::String(String::new()),
            Some(v) => v.clone(),
        };
        out.insert(field.key.into(), value);
    }

    out
}

/// Wire record → storage row for an insert.
/// Status defaults to `incomplete`; absent fields are left out entirely.
pub fn encode(input: &WireRecord, category: Category) -> StorageRow {
    let mut row = encode_patch(input, category);
    row.status.get_or_insert(Status::Incomplete);
    row
}

/// Wire record → storage row for a partial update.
/// Unlike [`encode`], a missing status stays missing so the stored one is kept.
pub fn encode_patch(input: &WireRecord, category: Category) -> StorageRow {
    let fields = category
        .fields()
        .iter()
        .filter_map(|field| {
            input
                .get(field.key)
                .map(|value| (field.key, coerce(field, value)))
        })
        .collect();

    StorageRow {
        id: wire_id(input),
        status: input.get("status").map(Status::from_wire),
        fields,
    }
}

/// Wire record → full storage row for bulk insert-or-replace.
/// Every registry field is written; missing or null ones become `""`.
pub fn encode_replacement(input: &WireRecord, category: Category) -> StorageRow {
    let fields = category
        .fields()
        .iter()
        .map(|field| {
            let value = match input.get(field.key) {
                None | Some(Value::Null) => Value::String(String::new()),
                Some(v) => coerce(field, v),
            };
            (field.key, value)
        })
        .collect();

    StorageRow {
        id: wire_id(input),
        status: Some(
            input
                .get("status")
                .map(Status::from_wire)
                .unwrap_or_default(),
        ),
        fields,
    }
}

/// Caller-supplied id, as a JSON integer or a numeric string.
pub fn wire_id(input: &WireRecord) -> Option<i64> {
    match input.get("id")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerce(field: &FieldDef, value: &Value) -> Value {
    match field.kind {
        FieldKind::Integer => integer_affinity(value),
        FieldKind::Text => text_affinity(value),
    }
}

/// INTEGER affinity: numeric text becomes a number, integral reals become integers.
fn integer_affinity(value: &Value) -> Value {
    match value {
        Value::Bool(b) => Value::from(i64::from(*b)),
        Value::Number(n) if n.is_i64() => value.clone(),
        Value::Number(n) => n
            .as_f64()
            .and_then(integral)
            .map(Value::from)
            .unwrap_or_else(|| value.clone()),
        Value::String(s) => {
            let trimmed = s.trim();
            if let Ok(i) = trimmed.parse::<i64>() {
                return Value::from(i);
            }
            match trimmed.parse::<f64>() {
                Ok(f) if f.is_finite() && !trimmed.is_empty() => integral(f)
                    .map(Value::from)
                    .or_else(|| Number::from_f64(f).map(Value::Number))
                    .unwrap_or_else(|| value.clone()),
                _ => value.clone(),
            }
        }
        Value::Array(_) | Value::Object(_) => Value::String(value.to_string()),
        Value::Null => Value::Null,
    }
}

/// TEXT affinity: numbers are stored as their text form.
fn text_affinity(value: &Value) -> Value {
    match value {
        Value::String(_) | Value::Null => value.clone(),
        Value::Bool(b) => Value::String(i64::from(*b).to_string()),
        Value::Number(n) => Value::String(n.to_string()),
        Value::Array(_) | Value::Object(_) => Value::String(value.to_string()),
    }
}

fn integral(f: f64) -> Option<i64> {
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
