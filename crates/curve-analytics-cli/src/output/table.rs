use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::format_value;

/// Format output as a table using the tabled crate.
///
/// Three shapes are recognised: a curve report carrying a pre-formatted
/// `table` (headers + string rows), the computation envelope whose `result`
/// holds a `rows` array, and plain arrays/objects.
pub fn print_table(value: &Value) {
    if let Some(model) = value.get("table") {
        print_grid(model);
        print_warnings(value.get("summary").unwrap_or(&Value::Null));
        return;
    }

    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_envelope(result, map);
            } else {
                print_flat_object(value);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

/// The engine's pre-formatted grid: headers plus row-major string cells.
fn print_grid(model: &Value) {
    let headers = model.get("headers").and_then(Value::as_array);
    let rows = model.get("rows").and_then(Value::as_array);
    let (Some(headers), Some(rows)) = (headers, rows) else {
        print_flat_object(model);
        return;
    };

    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(format_value));
    for row in rows {
        if let Value::Array(cells) = row {
            builder.push_record(cells.iter().map(format_value));
        }
    }
    println!("{}", Table::from(builder));
}

fn print_envelope(result: &Value, envelope: &serde_json::Map<String, Value>) {
    // Row-oriented results print as one table; remaining scalar fields follow.
    if let Some(Value::Array(rows)) = result.get("rows") {
        print_array_table(rows);
        if let Value::Object(res_map) = result {
            let scalars: Vec<(&String, &Value)> = res_map
                .iter()
                .filter(|(k, v)| k.as_str() != "rows" && !v.is_array() && !v.is_object())
                .collect();
            for (key, val) in scalars {
                println!("{}: {}", key, format_value(val));
            }
        }
    } else {
        print_flat_object(result);
    }

    print_warnings(&Value::Object(envelope.clone()));

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        println!("{}", Table::from(builder));
    } else {
        println!("{}", value);
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
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }
        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn print_warnings(container: &Value) {
    if let Some(Value::Array(warnings)) = container.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }
}
