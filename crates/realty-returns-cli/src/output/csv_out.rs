use serde_json::Value;
use std::io;

use super::{cell_text, matrix_rows};

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let written = match value {
        Value::Object(map) => match map.get("result") {
            Some(result) => match matrix_rows(result) {
                Some(rows) => rows.iter().try_for_each(|r| wtr.write_record(r)),
                None => write_fields(&mut wtr, result),
            },
            None => write_fields(&mut wtr, value),
        },
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        _ => wtr.write_record([cell_text(value)]),
    };

    if let Err(e) = written.and_then(|_| wtr.flush().map_err(csv::Error::from)) {
        tracing::error!(error = %e, "CSV output failed");
    }
}

fn write_fields<W: io::Write>(wtr: &mut csv::Writer<W>, value: &Value) -> csv::Result<()> {
    wtr.write_record(["field", "value"])?;
    if let Value::Object(map) = value {
        for (key, val) in map {
            wtr.write_record([key.as_str(), &cell_text(val)])?;
        }
    }
    Ok(())
}

fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) -> csv::Result<()> {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            wtr.write_record([cell_text(item)])?;
        }
        return Ok(());
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    wtr.write_record(&headers)?;
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(cell_text).unwrap_or_default())
                .collect();
            wtr.write_record(&row)?;
        }
    }
    Ok(())
}
