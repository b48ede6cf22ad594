use re_alpha_core::analysis::analyze_deal;
use re_alpha_core::assumptions::AssumptionOverrides;
use re_alpha_core::negotiation::leverage::NO_LEVERAGE_MESSAGE;
use re_alpha_core::negotiation::negotiation_leverage;
use re_alpha_core::rent_roll::normalize_rent_roll;
use re_alpha_core::underwriting::run_financial_model;
use serde_json::json;

// ===========================================================================
// Negotiation leverage tests
// ===========================================================================

#[test]
fn test_overpriced_deal_flags_every_metric() {
    // 10 x $1,000 at $1.9M with 2 vacancies: cap ~3.3%, negative leverage,
    // flat rents and no exit compression
    let rows: Vec<_> = (0..10)
        .map(|i| json!({"unit_id": i + 1, "monthly_rent": 1000, "occupied": i >= 2}))
        .collect();
    let rr = normalize_rent_roll(&json!({"purchase_price": 1900000, "rent_roll": rows}));
    let flat = AssumptionOverrides::from_json(r#"{"rent_growth": "0", "exit_cap_compression": "0"}"#).unwrap();
    let fr = run_financial_model(&rr, Some(&flat));
    assert!(fr.irr_5yr.unwrap() < rust_decimal::Decimal::ZERO);
    let points = negotiation_leverage(&rr, &fr);
    assert_eq!(points.len(), 5, "{points:#?}");
    assert!(points[0].starts_with("Below-market cap rate"));
    assert!(points[1].starts_with("Elevated vacancy (20%)"));
}

#[test]
fn test_priced_to_market_has_no_leverage() {
    let rows: Vec<_> = (0..10)
        .map(|i| json!({"unit_id": i + 1, "monthly_rent": 1000, "occupied": true}))
        .collect();
    let rr = normalize_rent_roll(&json!({"purchase_price": 1000000, "rent_roll": rows}));
    let fr = run_financial_model(&rr, None);
    assert_eq!(negotiation_leverage(&rr, &fr), vec![NO_LEVERAGE_MESSAGE.to_string()]);
}

#[test]
fn test_pipeline_reports_low_rent_cluster() {
    let mut rows: Vec<_> = (0..9)
        .map(|i| json!({"unit_id": i + 1, "monthly_rent": "$1,000", "occupied": true}))
        .collect();
    rows.push(json!({"unit_id": 10, "monthly_rent": "$400", "occupied": true}));
    let out = analyze_deal(&json!({"purchase_price": 900000, "rent_roll": rows}), None);
    let points = &out.result.negotiation_points;
    assert!(points.iter().any(|p| p.starts_with("1 units renting 25%+ below average")));
}
