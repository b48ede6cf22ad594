use serde_json::Value;

use super::{scalar_text, scenario_columns};

/// Key figures in priority order; the first non-null one is printed.
const PRIORITY_KEYS: [&str; 5] = ["irr_5yr", "cap_rate", "noi", "vacancy_rate", "total_units"];

/// Print just the key answer from the output.
///
/// Scenario sets print one IRR per line, leverage lists print one point per
/// line, a full analysis prints its base-case figure.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    for line in minimal_lines(result) {
        println!("{}", line);
    }
}

fn minimal_lines(result: &Value) -> Vec<String> {
    if let Some(columns) = scenario_columns(result) {
        return columns
            .iter()
            .map(|(name, fields)| {
                let irr = fields.get("irr_5yr").unwrap_or(&Value::Null);
                format!("{}: {}", name, scalar_text(irr, "null"))
            })
            .collect();
    }

    match result {
        Value::Array(items) => items.iter().map(|v| scalar_text(v, "null")).collect(),
        Value::Object(map) => {
            // Full analysis: answer from the base-case financials
            if let Some(financials) = map.get("financials") {
                return minimal_lines(financials);
            }
            for key in PRIORITY_KEYS {
                if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                    return vec![scalar_text(val, "null")];
                }
            }
            map.iter()
                .next()
                .map(|(key, val)| vec![format!("{}: {}", key, scalar_text(val, "null"))])
                .unwrap_or_default()
        }
        other => vec![scalar_text(other, "null")],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_irr_preferred_then_fallback() {
        assert_eq!(minimal_lines(&json!({"noi": "78000", "irr_5yr": "0.3246"})), vec!["0.3246"]);
        assert_eq!(minimal_lines(&json!({"noi": "78000", "irr_5yr": null, "cap_rate": null})), vec!["78000"]);
    }

    #[test]
    fn test_scenarios_one_line_each() {
        let v = json!({
            "bull": {"irr_5yr": "0.42"},
            "base": {"irr_5yr": "0.32"},
            "bear": {"irr_5yr": null}
        });
        assert_eq!(minimal_lines(&v), vec!["bull: 0.42", "base: 0.32", "bear: null"]);
    }

    #[test]
    fn test_leverage_points_listed() {
        let v = json!(["first", "second"]);
        assert_eq!(minimal_lines(&v), vec!["first", "second"]);
    }

    #[test]
    fn test_analysis_reads_financials() {
        let v = json!({"rent_roll": {"total_units": 4}, "financials": {"irr_5yr": "0.11"}});
        assert_eq!(minimal_lines(&v), vec!["0.11"]);
    }
}
