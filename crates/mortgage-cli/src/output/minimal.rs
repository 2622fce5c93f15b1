use serde_json::Value;

use super::cells::format_cell;

/// Well-known answer fields, most specific first.
const PRIORITY_KEYS: [&str; 7] = [
    "monthly_payment",
    "total_monthly_payment",
    "new_term",
    "url",
    "encoded",
    "months_saved",
    "total_amount",
];

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields in order of priority, then falls back
/// to the first field. Arrays print their length.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_answer(value));
}

fn minimal_answer(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result_obj {
        Value::Object(map) => {
            for key in PRIORITY_KEYS {
                if let Some(val) = map.get(key) {
                    if !val.is_null() {
                        return format_cell(val);
                    }
                }
            }
            match map.iter().next() {
                Some((key, val)) => format!("{}: {}", key, format_cell(val)),
                None => String::new(),
            }
        }
        Value::Array(rows) => rows.len().to_string(),
        other => format_cell(other),
    }
}
