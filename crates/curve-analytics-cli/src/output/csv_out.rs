use serde_json::Value;
use std::io;

use super::format_value;

/// Write output as CSV to stdout.
///
/// A curve report's pre-formatted `table` is written as-is; envelope results
/// with a `rows` array become one record per row; anything else falls back
/// to two-column field,value records.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    if let Some(model) = value.get("table") {
        write_grid(&mut wtr, model);
        let _ = wtr.flush();
        return;
    }

    match value {
        Value::Object(map) => {
            if let Some(Value::Array(rows)) = map.get("result").and_then(|r| r.get("rows")) {
                write_array_csv(&mut wtr, rows);
            } else if let Some(Value::Object(result)) = map.get("result") {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in result {
                    let _ = wtr.write_record([key.as_str(), &format_value(val)]);
                }
            } else {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    let _ = wtr.write_record([key.as_str(), &format_value(val)]);
                }
            }
        }
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&format_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_grid(wtr: &mut csv::Writer<io::StdoutLock<'_>>, model: &Value) {
    let headers = model.get("headers").and_then(Value::as_array);
    let rows = model.get("rows").and_then(Value::as_array);
    let (Some(headers), Some(rows)) = (headers, rows) else {
        return;
    };

    let _ = wtr.write_record(headers.iter().map(format_value));
    for row in rows {
        if let Value::Array(cells) = row {
            let _ = wtr.write_record(cells.iter().map(format_value));
        }
    }
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_value(item)]);
        }
    }
}
