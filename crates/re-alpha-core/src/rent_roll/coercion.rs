//! Lenient coercion of untrusted extraction values.
//!
//! Nothing here fails: values that cannot be interpreted become `None`
//! (numbers) or `false` (occupancy) and the caller decides whether to warn.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

/// Strings that mark a unit as occupied, compared after trim + lowercase.
pub const OCCUPIED_TOKENS: [&str; 5] = ["occupied", "yes", "true", "1", "leased"];

/// Coerce a JSON value into a decimal.
///
/// Numbers are taken as-is. Strings have `$` and `,` removed before parsing,
/// in plain or scientific notation. Everything else is `None`.
pub fn coerce_number(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => {
            let cleaned = s.replace(['$', ','], "");
            parse_decimal(cleaned.trim())
        }
        _ => None,
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
        .map(|d| d.normalize())
}

/// Coerce an occupancy indicator.
///
/// Booleans pass through; strings must match [`OCCUPIED_TOKENS`]; other
/// values fall back to [`is_truthy`].
pub fn coerce_occupancy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => {
            let token = s.trim().to_lowercase();
            OCCUPIED_TOKENS.contains(&token.as_str())
        }
        other => is_truthy(other),
    }
}

/// Explicit truthiness: null and false are false, numbers are true when
/// non-zero, strings/arrays/objects when non-empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Render an identifier-like value as text (`101` and `"101"` both give `101`).
pub fn as_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// First alias whose value is truthy.
pub fn first_present<'a>(
    record: &'a serde_json::Map<String, Value>,
    aliases: &[&str],
) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|key| record.get(*key))
        .find(|v| is_truthy(v))
}
