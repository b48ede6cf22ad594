use napi::Result as NapiResult;
use napi_derive::napi;

use re_alpha_core::assumptions::AssumptionOverrides;
use re_alpha_core::rent_roll::CanonicalRentRoll;
use re_alpha_core::underwriting::FinancialResult;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_rent_roll(rent_roll_json: &str) -> NapiResult<CanonicalRentRoll> {
    serde_json::from_str(rent_roll_json).map_err(to_napi_error)
}

fn parse_overrides(assumptions_json: Option<String>) -> NapiResult<Option<AssumptionOverrides>> {
    assumptions_json
        .as_deref()
        .map(AssumptionOverrides::from_json)
        .transpose()
        .map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Rent roll
// ---------------------------------------------------------------------------

/// Raw extraction JSON in, canonical rent roll JSON out.
#[napi]
pub fn normalize_rent_roll(raw_json: String) -> NapiResult<String> {
    let raw: serde_json::Value = serde_json::from_str(&raw_json).map_err(to_napi_error)?;
    let rent_roll = re_alpha_core::rent_roll::normalize_rent_roll(&raw);
    serde_json::to_string(&rent_roll).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Underwriting
// ---------------------------------------------------------------------------

#[napi]
pub fn run_financial_model(
    rent_roll_json: String,
    assumptions_json: Option<String>,
) -> NapiResult<String> {
    let rent_roll = parse_rent_roll(&rent_roll_json)?;
    let overrides = parse_overrides(assumptions_json)?;
    let result = re_alpha_core::underwriting::run_financial_model(&rent_roll, overrides.as_ref());
    serde_json::to_string(&result).map_err(to_napi_error)
}

#[napi]
pub fn run_scenarios(rent_roll_json: String, assumptions_json: Option<String>) -> NapiResult<String> {
    let rent_roll = parse_rent_roll(&rent_roll_json)?;
    let overrides = parse_overrides(assumptions_json)?;
    let results = re_alpha_core::underwriting::run_scenarios_with(&rent_roll, overrides.as_ref());
    serde_json::to_string(&results).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Negotiation
// ---------------------------------------------------------------------------

#[napi]
pub fn negotiation_leverage(rent_roll_json: String, financials_json: String) -> NapiResult<String> {
    let rent_roll = parse_rent_roll(&rent_roll_json)?;
    let financials: FinancialResult =
        serde_json::from_str(&financials_json).map_err(to_napi_error)?;
    let points = re_alpha_core::negotiation::negotiation_leverage(&rent_roll, &financials);
    serde_json::to_string(&points).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Normalize, model, scenarios and leverage in one call, wrapped in the
/// computation envelope.
#[napi]
pub fn analyze_deal(raw_json: String, assumptions_json: Option<String>) -> NapiResult<String> {
    let raw: serde_json::Value = serde_json::from_str(&raw_json).map_err(to_napi_error)?;
    let overrides = parse_overrides(assumptions_json)?;
    let output = re_alpha_core::analysis::analyze_deal(&raw, overrides.as_ref());
    serde_json::to_string(&output).map_err(to_napi_error)
}
