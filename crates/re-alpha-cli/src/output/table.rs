use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{scalar_text, scenario_columns};

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_section(None, result);
                print_envelope(map);
            } else {
                print_section(None, value);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

/// Scalars go into a Field/Value table; nested objects and arrays of objects
/// get their own titled section after it.
fn print_section(title: Option<&str>, value: &Value) {
    if let Some(title) = title {
        println!("\n{}:", title);
    }

    if let Some(columns) = scenario_columns(value) {
        print_scenario_table(&columns);
        return;
    }

    match value {
        Value::Object(map) => {
            let mut builder = Builder::default();
            builder.push_record(["Field", "Value"]);
            let mut rows = 0;
            let mut nested: Vec<(&String, &Value)> = Vec::new();
            for (key, val) in map {
                match val {
                    Value::Object(_) => nested.push((key, val)),
                    Value::Array(items) if items.iter().any(Value::is_object) => {
                        nested.push((key, val))
                    }
                    _ => {
                        builder.push_record([key.as_str(), &format_value(val)]);
                        rows += 1;
                    }
                }
            }
            if rows > 0 {
                println!("{}", Table::from(builder));
            }
            for (key, val) in nested {
                print_section(Some(key.as_str()), val);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        other => println!("{}", format_value(other)),
    }
}

/// One row per metric, one column per scenario.
fn print_scenario_table(columns: &[(&'static str, &Map<String, Value>); 3]) {
    let (_, base) = columns[1];
    let mut builder = Builder::default();
    builder.push_record(["Metric", "bull", "base", "bear"]);
    for (key, val) in base {
        if val.is_object() || val.is_array() {
            continue;
        }
        let mut row = vec![key.clone()];
        row.extend(
            columns
                .iter()
                .map(|(_, fields)| fields.get(key).map(format_value).unwrap_or_default()),
        );
        builder.push_record(row);
    }
    println!("{}", Table::from(builder));
}

fn print_envelope(envelope: &Map<String, Value>) {
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
            println!("  - {}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        other => scalar_text(other, "null"),
    }
}
