use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use tracing::info;

use crate::assumptions::AssumptionOverrides;
use crate::negotiation::negotiation_leverage;
use crate::rent_roll::{normalize_rent_roll, CanonicalRentRoll};
use crate::types::{with_metadata, ComputationOutput};
use crate::underwriting::{run_financial_model, run_scenarios_with, FinancialResult, ScenarioResults};

/// Every stage's output for one deal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealAnalysis {
    pub rent_roll: CanonicalRentRoll,
    pub financials: FinancialResult,
    pub scenarios: ScenarioResults,
    pub negotiation_points: Vec<String>,
}

/// Normalize a raw extraction and run the model, scenarios and leverage
/// heuristics on it.
///
/// `overrides` apply to the base case and sit beneath each scenario bundle.
/// Envelope warnings carry the rent roll's data-quality warnings and, when
/// the price is unusable, the model's error.
pub fn analyze_deal(
    raw: &Value,
    overrides: Option<&AssumptionOverrides>,
) -> ComputationOutput<DealAnalysis> {
    let start = Instant::now();

    let rent_roll = normalize_rent_roll(raw);
    let financials = run_financial_model(&rent_roll, overrides);
    let scenarios = run_scenarios_with(&rent_roll, overrides);
    let negotiation_points = negotiation_leverage(&rent_roll, &financials);

    let mut warnings = rent_roll.warnings.clone();
    if let Some(error) = &financials.error {
        warnings.push(error.clone());
    }

    info!(
        property = %rent_roll.property_name,
        units = rent_roll.total_units,
        warnings = warnings.len(),
        "deal analyzed"
    );

    let assumptions = financials.assumptions_used;
    let analysis = DealAnalysis {
        rent_roll,
        financials,
        scenarios,
        negotiation_points,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Multifamily Underwriting (interest-only debt, NOI growth, bull/base/bear)",
        &assumptions,
        warnings,
        elapsed,
        analysis,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_pipeline_end_to_end() {
        let raw = json!({
            "property_name": "Oak Terrace",
            "purchase_price": 1000000,
            "rent_roll": (1..=10).map(|i| json!({"unit_id": i, "monthly_rent": "$1,000"})).collect::<Vec<_>>()
        });
        let out = analyze_deal(&raw, None);
        let a = &out.result;
        assert_eq!(a.rent_roll.total_units, 10);
        assert_eq!(a.financials.noi, dec!(78000));
        assert_eq!(a.scenarios.base.financials, a.financials);
        assert!(!a.negotiation_points.is_empty());
        assert!(out.warnings.is_empty());
        assert_eq!(out.assumptions["hold_period"], 5);
    }

    #[test]
    fn test_missing_price_surfaces_in_warnings() {
        let raw = json!({"rent_roll": [{"unit_id": "1", "monthly_rent": 0}]});
        let out = analyze_deal(&raw, None);
        // zero-rent warning plus the model error
        assert_eq!(out.warnings.len(), 2);
        assert!(out.result.financials.error.is_some());
    }
}
