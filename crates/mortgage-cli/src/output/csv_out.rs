use serde_json::Value;
use std::io;

use super::cells::{format_cell, row_set, scalar_fields, tabulate};

type StdoutWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
///
/// Arrays and results carrying a schedule (or per-mortgage breakdown) become
/// one row per entry; other results become `field,value` pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let written = match value {
        Value::Object(map) => {
            let result = match map.get("result") {
                Some(Value::Object(result)) => result,
                _ => map,
            };
            match row_set(result) {
                Some((_, rows)) => write_rows(&mut wtr, rows),
                None => write_fields(&mut wtr, scalar_fields(result)),
            }
        }
        Value::Array(rows) => write_rows(&mut wtr, rows),
        _ => wtr.write_record([format_cell(value)]),
    };

    if let Err(e) = written.and_then(|_| wtr.flush().map_err(csv::Error::from)) {
        eprintln!("CSV write error: {}", e);
    }
}

fn write_fields(wtr: &mut StdoutWriter<'_>, fields: Vec<(&str, &Value)>) -> csv::Result<()> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in fields {
        wtr.write_record([key.to_string(), format_cell(val)])?;
    }
    Ok(())
}

fn write_rows(wtr: &mut StdoutWriter<'_>, rows: &[Value]) -> csv::Result<()> {
    match tabulate(rows) {
        Some((headers, body)) => {
            wtr.write_record(&headers)?;
            for row in body {
                wtr.write_record(&row)?;
            }
        }
        None => {
            for item in rows {
                wtr.write_record([format_cell(item)])?;
            }
        }
    }
    Ok(())
}
