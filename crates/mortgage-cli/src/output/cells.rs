//! Cell rendering shared by the table and CSV writers.

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;

/// Keys whose arrays are shown as their own row set rather than inline.
pub const ROW_KEYS: [&str; 2] = ["schedule", "mortgages"];

/// Render a scalar for display. Decimal strings are rounded to cents; the
/// JSON output keeps full precision.
pub fn format_cell(value: &Value) -> String {
    match value {
        Value::String(s) => match Decimal::from_str(s) {
            Ok(d) => d.round_dp(2).to_string(),
            Err(_) => s.clone(),
        },
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(format_cell).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Flatten one level of nested objects into `parent.child` columns.
pub fn flatten_row(map: &Map<String, Value>) -> Vec<(String, Value)> {
    let mut cells = Vec::with_capacity(map.len());
    for (key, val) in map {
        match val {
            Value::Object(inner) => {
                for (inner_key, inner_val) in inner {
                    if inner_val.is_array() {
                        continue;
                    }
                    cells.push((format!("{key}.{inner_key}"), inner_val.clone()));
                }
            }
            Value::Array(_) => {}
            _ => cells.push((key.clone(), val.clone())),
        }
    }
    cells
}

/// Scalar fields of a result object, skipping the row-set arrays.
pub fn scalar_fields(map: &Map<String, Value>) -> Vec<(&str, &Value)> {
    map.iter()
        .filter(|(key, val)| !(ROW_KEYS.contains(&key.as_str()) && val.is_array()))
        .map(|(key, val)| (key.as_str(), val))
        .collect()
}

/// The first non-empty row set (schedule or per-mortgage breakdown).
pub fn row_set(map: &Map<String, Value>) -> Option<(&str, &[Value])> {
    ROW_KEYS.iter().find_map(|key| match map.get(*key) {
        Some(Value::Array(rows)) if !rows.is_empty() => Some((*key, rows.as_slice())),
        _ => None,
    })
}

/// Column headers and rendered rows for an array of objects.
pub fn tabulate(rows: &[Value]) -> Option<(Vec<String>, Vec<Vec<String>>)> {
    let Some(Value::Object(first)) = rows.first() else {
        return None;
    };
    let headers: Vec<String> = flatten_row(first).into_iter().map(|(k, _)| k).collect();

    let body = rows
        .iter()
        .filter_map(|row| row.as_object())
        .map(|map| {
            let cells = flatten_row(map);
            headers
                .iter()
                .map(|h| {
                    cells
                        .iter()
                        .find(|(k, _)| k == h)
                        .map(|(_, v)| format_cell(v))
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();

    Some((headers, body))
}
