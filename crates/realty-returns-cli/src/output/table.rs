use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{cell_text, matrix_rows};

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(result) => print_envelope(result, map),
            None => print_flat_object(map),
        },
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_envelope(result: &Value, envelope: &Map<String, Value>) {
    if let Some(rows) = matrix_rows(result) {
        let mut builder = Builder::default();
        for row in rows {
            builder.push_record(row);
        }
        println!("{}", Table::from(builder));
        if let Some(base) = result.get("base_case_value") {
            println!("\nBase case: {}", cell_text(base));
        }
    } else if let Value::Object(res_map) = result {
        print_flat_object(res_map);
    } else {
        print_flat_object(envelope);
    }

    if let Some(Value::Object(display)) = envelope.get("display") {
        println!("\nDisplay:");
        print_flat_object(display);
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_flat_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        // nested schedules and listings read better as their own table
        if let Value::Array(items) = val {
            if items.first().is_some_and(Value::is_object) {
                continue;
            }
        }
        builder.push_record([key.clone(), cell_text(val)]);
    }
    println!("{}", Table::from(builder));

    for (key, val) in map {
        if let Value::Array(items) = val {
            if items.first().is_some_and(Value::is_object) {
                println!("\n{}:", key);
                print_array_table(items);
            }
        }
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(headers.clone());

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(cell_text).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", cell_text(item));
        }
    }
}
