pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => {
            table::print_table(value);
            Ok(())
        }
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => {
            minimal::print_minimal(value);
            Ok(())
        }
    }
}

/// Scalar rendering shared by the text formatters; `null` prints as `null_text`.
pub(crate) fn scalar_text(value: &Value, null_text: &str) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => null_text.to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// The three scenario objects when `value` is a bull/base/bear map.
pub(crate) fn scenario_columns(value: &Value) -> Option<[(&'static str, &serde_json::Map<String, Value>); 3]> {
    let map = value.as_object()?;
    Some([
        ("bull", map.get("bull")?.as_object()?),
        ("base", map.get("base")?.as_object()?),
        ("bear", map.get("bear")?.as_object()?),
    ])
}
