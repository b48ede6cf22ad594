use re_alpha_core::analysis::analyze_deal;
use re_alpha_core::assumptions::{AssumptionOverrides, DEFAULT_ASSUMPTIONS};
use re_alpha_core::rent_roll::normalize_rent_roll;
use re_alpha_core::time_value;
use re_alpha_core::underwriting::model::NUMERIC_RANGE_ERROR;
use re_alpha_core::underwriting::{run_financial_model, run_scenarios};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

fn ten_unit_deal(price: Value, vacant_units: usize) -> Value {
    let rows: Vec<_> = (0..10)
        .map(|i| {
            json!({
                "unit_number": format!("{}", 101 + i),
                "monthly_rent": "$1,000",
                "occupancy_status": if i < vacant_units { "Vacant" } else { "Occupied" }
            })
        })
        .collect();
    json!({
        "property_name": "Elm Street Apartments",
        "address": "400 Elm St",
        "total_units": 10,
        "purchase_price": price,
        "rent_roll": rows
    })
}

// ===========================================================================
// Financial model tests
// ===========================================================================

#[test]
fn test_reference_deal_income_and_cap_rate() {
    let rr = normalize_rent_roll(&ten_unit_deal(json!(1000000), 0));
    let r = run_financial_model(&rr, None);
    assert_eq!(r.gross_annual_rent, dec!(120000));
    assert_eq!(r.effective_gross_income, dec!(120000));
    assert_eq!(r.operating_expenses, dec!(42000));
    assert_eq!(r.noi, dec!(78000));
    assert_eq!(r.cap_rate, Some(dec!(0.078)));
    assert_eq!(r.assumptions_used, DEFAULT_ASSUMPTIONS);
}

#[test]
fn test_cash_flow_vector_shape() {
    let rr = normalize_rent_roll(&ten_unit_deal(json!("$1,000,000"), 1));
    let r = run_financial_model(&rr, None);
    let hold = r.assumptions_used.hold_period as usize;
    assert_eq!(r.cash_flows.len(), hold + 1);
    assert!(r.cash_flows[0] < Decimal::ZERO);
    assert_eq!(-r.cash_flows[0], r.equity_invested.unwrap());
    // exit proceeds make the last year the largest
    assert!(r.cash_flows[hold] > r.cash_flows[hold - 1]);
}

#[test]
fn test_null_and_zero_price_are_degenerate() {
    for price in [Value::Null, json!(0), json!("TBD")] {
        let rr = normalize_rent_roll(&ten_unit_deal(price.clone(), 0));
        let r = run_financial_model(&rr, None);
        assert_eq!(r.gross_annual_rent, dec!(120000), "price {price}");
        assert_eq!(r.noi, dec!(78000));
        assert!(r.cap_rate.is_none());
        assert!(r.irr_5yr.is_none());
        assert!(r.exit_value.is_none());
        assert!(!r.error.as_deref().unwrap_or_default().is_empty());
    }
}

#[test]
fn test_degenerate_serializes_nulls() {
    let rr = normalize_rent_roll(&ten_unit_deal(Value::Null, 0));
    let v = serde_json::to_value(run_financial_model(&rr, None)).unwrap();
    assert!(v["cap_rate"].is_null());
    assert!(v["irr_5yr"].is_null());
    assert!(v["error"].is_string());
}

#[test]
fn test_overrides_change_leverage() {
    let rr = normalize_rent_roll(&ten_unit_deal(json!(1000000), 0));
    let o = AssumptionOverrides::from_json(r#"{"ltv": 0.5, "interest_rate": 0.05, "unknown": 1}"#).unwrap();
    let r = run_financial_model(&rr, Some(&o));
    assert_eq!(r.loan_amount, Some(dec!(500000)));
    assert_eq!(r.debt_service, Some(dec!(25000)));
    assert_eq!(r.dscr, Some(dec!(3.12)));
}

#[test]
fn test_out_of_range_rent_degrades_instead_of_failing() {
    let raw = json!({
        "purchase_price": 1000000,
        "rent_roll": [{"unit_id": "1", "monthly_rent": "10000000000000000000000000000"}]
    });
    let rr = normalize_rent_roll(&raw);
    let r = run_financial_model(&rr, None);
    assert_eq!(r.error.as_deref(), Some(NUMERIC_RANGE_ERROR));
    assert!(r.irr_5yr.is_none());

    let scenarios = run_scenarios(&rr);
    assert!(scenarios.iter().all(|(_, s)| s.financials.error.is_some()));

    let out = analyze_deal(&raw, None);
    assert!(out.warnings.iter().any(|w| w == NUMERIC_RANGE_ERROR));
}

#[test]
fn test_extreme_price_and_leverage_overrides_degrade() {
    let rr = normalize_rent_roll(&ten_unit_deal(json!("1e27"), 0));
    let o = AssumptionOverrides::from_json(r#"{"ltv": 1000, "interest_rate": 1000}"#).unwrap();
    let r = run_financial_model(&rr, Some(&o));
    assert_eq!(r.error.as_deref(), Some(NUMERIC_RANGE_ERROR));
    assert_eq!(r.noi, dec!(78000));
}

#[test]
fn test_model_is_deterministic() {
    let rr = normalize_rent_roll(&ten_unit_deal(json!(1200000), 2));
    assert_eq!(run_financial_model(&rr, None), run_financial_model(&rr, None));
}

// ===========================================================================
// IRR tests
// ===========================================================================

#[test]
fn test_irr_sanity_bound() {
    let cfs = vec![dec!(-100), dec!(20), dec!(20), dec!(20), dec!(20), dec!(120)];
    let irr = time_value::irr(&cfs, dec!(0.10)).unwrap();
    assert!(irr > Decimal::ZERO && irr < Decimal::ONE, "got {irr}");
}

// ===========================================================================
// Scenario tests
// ===========================================================================

#[test]
fn test_scenarios_twice_identical() {
    let rr = normalize_rent_roll(&ten_unit_deal(json!(1000000), 1));
    let first = run_scenarios(&rr);
    let second = run_scenarios(&rr);
    assert_eq!(first, second);
}

#[test]
fn test_scenarios_independent_of_prior_model_runs() {
    let rr = normalize_rent_roll(&ten_unit_deal(json!(1000000), 1));
    let before = run_scenarios(&rr);
    let o = AssumptionOverrides {
        rent_growth: Some(dec!(0.09)),
        ..Default::default()
    };
    let _ = run_financial_model(&rr, Some(&o));
    assert_eq!(run_scenarios(&rr), before);
}

#[test]
fn test_scenarios_concurrent_match_sequential() {
    let rr = normalize_rent_roll(&ten_unit_deal(json!(1000000), 1));
    let sequential = run_scenarios(&rr);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let rr = rr.clone();
            std::thread::spawn(move || run_scenarios(&rr))
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), sequential);
    }
}

#[test]
fn test_bear_vacancy_adjusted() {
    let rr = normalize_rent_roll(&ten_unit_deal(json!(1000000), 1));
    let s = run_scenarios(&rr);
    assert_eq!(rr.vacancy_rate, dec!(0.1));
    assert_eq!(s.bear.vacancy_rate_adjusted, dec!(0.15));
    assert_eq!(s.bull.vacancy_rate_adjusted, dec!(0.08));
    assert!(s.bear.financials.noi < s.base.financials.noi);
}
