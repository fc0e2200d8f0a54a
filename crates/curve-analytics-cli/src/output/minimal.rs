use serde_json::Value;

use super::format_value;

/// Print just the key answer value from the output.
///
/// Heuristic: the solver's centre, then a load summary's cell count, then
/// the row count of a composed report, then the first scalar field.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = ["center", "cells_loaded", "path"];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_value(val));
                    return;
                }
            }
        }

        // Curve reports nest the load summary beside the table.
        if let Some(Value::Object(summary)) = map.get("summary") {
            if let Some(val) = summary.get("cells_loaded") {
                println!("{}", format_value(val));
                return;
            }
        }

        if let Some(Value::Array(rows)) = map.get("rows") {
            println!("{} rows", rows.len());
            return;
        }

        if let Some((_, val)) = map.iter().find(|(_, v)| !v.is_object() && !v.is_array()) {
            println!("{}", format_value(val));
            return;
        }
    }

    if let Value::Array(arr) = result_obj {
        println!("{} rows", arr.len());
        return;
    }

    println!("{}", format_value(result_obj));
}
