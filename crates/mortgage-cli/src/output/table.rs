use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::cells::{format_cell, row_set, scalar_fields, tabulate};

/// Format output as tables using the tabled crate.
///
/// Envelopes print their result fields, then the schedule or per-mortgage
/// breakdown as a second table, then warnings and methodology.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => print_envelope(result, map),
            _ => print_object(map),
        },
        Value::Array(rows) => print_rows(rows),
        _ => println!("{}", format_cell(value)),
    }
}

fn print_envelope(result: &Map<String, Value>, envelope: &Map<String, Value>) {
    print_object(result);

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in scalar_fields(map) {
        builder.push_record([key.to_string(), format_cell(val)]);
    }
    println!("{}", Table::from(builder));

    if let Some((key, rows)) = row_set(map) {
        println!("\n{}:", key);
        print_rows(rows);
    }
}

fn print_rows(rows: &[Value]) {
    match tabulate(rows) {
        Some((headers, body)) => {
            let mut builder = Builder::default();
            builder.push_record(headers);
            for row in body {
                builder.push_record(row);
            }
            println!("{}", Table::from(builder));
        }
        None if rows.is_empty() => println!("(empty)"),
        None => {
            for item in rows {
                println!("{}", format_cell(item));
            }
        }
    }
}
