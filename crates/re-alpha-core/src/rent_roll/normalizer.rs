use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tracing::debug;

use super::coercion::{as_label, coerce_number, coerce_occupancy, first_present};
use super::{CanonicalRentRoll, CanonicalUnit};
use crate::types::Rate;

const UNKNOWN_PROPERTY: &str = "Unknown Property";
const UNKNOWN_ADDRESS: &str = "Unknown Address";

const UNIT_ID_ALIASES: [&str; 2] = ["unit_number", "unit_id"];
const SQUARE_FEET_ALIASES: [&str; 2] = ["square_footage", "square_feet"];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Validate and canonicalize a raw extraction record.
///
/// Never fails. Malformed values degrade to `None` or defaults and the
/// problems a reviewer should verify are reported in `warnings`.
pub fn normalize_rent_roll(raw: &Value) -> CanonicalRentRoll {
    let empty = Map::new();
    let record = raw.as_object().unwrap_or(&empty);
    let mut warnings: Vec<String> = Vec::new();

    let property_name = text_field(record, "property_name", UNKNOWN_PROPERTY);
    let address = text_field(record, "address", UNKNOWN_ADDRESS);
    let purchase_price = record.get("purchase_price").and_then(coerce_number);
    let reported_units = record.get("total_units").and_then(coerce_number);

    let rows: &[Value] = match record.get("rent_roll") {
        Some(Value::Array(rows)) => rows.as_slice(),
        Some(Value::Null) | None => &[],
        Some(_) => {
            warnings.push("rent_roll is not a list — no units extracted".into());
            &[]
        }
    };

    let units: Vec<CanonicalUnit> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| normalize_unit(i, row, &mut warnings))
        .collect();

    let total_units = units.len();
    if let Some(reported) = reported_units {
        if !reported.is_zero() && reported != Decimal::from(total_units) {
            warnings.push(format!(
                "Unit count mismatch: reported {reported}, extracted {total_units}"
            ));
        }
    }

    let occupied = units.iter().filter(|u| u.occupied).count();
    let vacancy_rate = vacancy_rate(occupied, total_units);

    debug!(
        property = %property_name,
        total_units,
        occupied,
        vacancy_rate = %vacancy_rate,
        warnings = warnings.len(),
        "rent roll normalized"
    );

    CanonicalRentRoll {
        property_name,
        address,
        purchase_price,
        total_units,
        units,
        vacancy_rate,
        warnings,
    }
}

/// `1 - occupied / total`, rounded to 4 dp; zero for an empty roll.
pub fn vacancy_rate(occupied: usize, total: usize) -> Rate {
    if total == 0 {
        return Decimal::ZERO;
    }
    (Decimal::ONE - Decimal::from(occupied) / Decimal::from(total)).round_dp(4)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn normalize_unit(index: usize, row: &Value, warnings: &mut Vec<String>) -> CanonicalUnit {
    let empty = Map::new();
    let record = match row.as_object() {
        Some(map) => map,
        None => {
            warnings.push(format!(
                "Row {} is not an object — unit kept with default values",
                index + 1
            ));
            &empty
        }
    };

    let unit_id = first_present(record, &UNIT_ID_ALIASES)
        .map(as_label)
        .unwrap_or_else(|| format!("Unit-{}", index + 1));

    // A missing rent key reads as zero so the unit is flagged for review;
    // an explicit null or blank stays unknown.
    let monthly_rent = match record.get("monthly_rent") {
        Some(v) => {
            let parsed = coerce_number(v);
            if parsed.is_none() && !is_blank(v) {
                warnings.push(format!("{unit_id}: rent {v} could not be parsed — verify"));
            }
            parsed
        }
        None => Some(Decimal::ZERO),
    };

    let occupied = record
        .get("occupancy_status")
        .or_else(|| record.get("occupied"))
        .map(coerce_occupancy)
        .unwrap_or(true);

    let square_feet = first_present(record, &SQUARE_FEET_ALIASES).and_then(coerce_number);

    if let Some(rent) = monthly_rent {
        if rent <= Decimal::ZERO {
            warnings.push(format!("{unit_id}: rent is ${rent} — verify"));
        }
    }

    CanonicalUnit {
        unit_id,
        monthly_rent,
        occupied,
        square_feet,
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn text_field(record: &Map<String, Value>, key: &str, default: &str) -> String {
    match record.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => default.to_string(),
    }
}
