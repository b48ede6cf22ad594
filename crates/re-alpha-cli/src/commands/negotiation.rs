use clap::Args;
use serde_json::{json, Value};
use std::time::Instant;

use re_alpha_core::negotiation::leverage::{
    CAP_RATE_FLOOR, CASH_ON_CASH_FLOOR, DSCR_FLOOR, IRR_HURDLE, LOW_RENT_FRACTION,
    VACANCY_CEILING,
};
use re_alpha_core::negotiation::negotiation_leverage;
use re_alpha_core::rent_roll::normalize_rent_roll;
use re_alpha_core::underwriting::run_financial_model;
use re_alpha_core::with_metadata;

use super::{elapsed_us, AssumptionArgs, DealArgs};

/// Arguments for negotiation leverage
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct LeverageArgs {
    #[command(flatten)]
    pub deal: DealArgs,

    // Overrides for the base-case model the heuristics read
    #[command(flatten)]
    pub assumptions: AssumptionArgs,
}

pub fn run_leverage(args: LeverageArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let raw = args.deal.read_raw()?;
    let overrides = args.assumptions.overrides()?;

    let start = Instant::now();
    let rent_roll = normalize_rent_roll(&raw);
    let financials = run_financial_model(&rent_roll, overrides.as_ref());
    let points = negotiation_leverage(&rent_roll, &financials);

    let mut warnings = rent_roll.warnings;
    warnings.extend(financials.error);

    let output = with_metadata(
        "Negotiation Leverage Heuristics",
        &json!({
            "cap_rate_floor": CAP_RATE_FLOOR,
            "vacancy_ceiling": VACANCY_CEILING,
            "dscr_floor": DSCR_FLOOR,
            "cash_on_cash_floor": CASH_ON_CASH_FLOOR,
            "irr_hurdle": IRR_HURDLE,
            "low_rent_fraction": LOW_RENT_FRACTION,
        }),
        warnings,
        elapsed_us(start),
        points,
    );
    Ok(serde_json::to_value(output)?)
}
