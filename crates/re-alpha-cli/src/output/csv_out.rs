use serde_json::Value;
use std::io;

use super::scalar_text;

/// Write output as CSV to stdout.
///
/// Objects become two-column `field,value` rows with nested keys joined by
/// dots (`bull.irr_5yr`, `units.0.monthly_rent`). A top-level array of
/// objects is written as a header row plus one row per element.
pub fn print_csv(value: &Value) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let body = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match body {
        Value::Array(arr) if arr.iter().all(Value::is_object) && !arr.is_empty() => {
            write_array_csv(&mut wtr, arr)?;
        }
        _ => {
            wtr.write_record(["field", "value"])?;
            let mut rows = Vec::new();
            flatten("", body, &mut rows);
            for (field, val) in rows {
                wtr.write_record([field.as_str(), val.as_str()])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}

fn write_array_csv(
    wtr: &mut csv::Writer<io::StdoutLock<'_>>,
    arr: &[Value],
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(Value::Object(first)) = arr.first() else {
        return Ok(());
    };
    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    wtr.write_record(&headers)?;

    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(|v| scalar_text(v, "")).unwrap_or_default())
                .collect();
            wtr.write_record(&row)?;
        }
    }
    Ok(())
}

fn flatten(prefix: &str, value: &Value, rows: &mut Vec<(String, String)>) {
    let join = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", prefix, key)
        }
    };
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                flatten(&join(key), val, rows);
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                flatten(&join(&i.to_string()), item, rows);
            }
        }
        scalar => rows.push((prefix.to_string(), scalar_text(scalar, ""))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_dotted_keys() {
        let mut rows = Vec::new();
        flatten(
            "",
            &json!({"bull": {"irr_5yr": "0.42"}, "cash_flows": ["-300000", "34840"], "error": null}),
            &mut rows,
        );
        assert_eq!(
            rows,
            vec![
                ("bull.irr_5yr".to_string(), "0.42".to_string()),
                ("cash_flows.0".to_string(), "-300000".to_string()),
                ("cash_flows.1".to_string(), "34840".to_string()),
                ("error".to_string(), String::new()),
            ]
        );
    }
}
