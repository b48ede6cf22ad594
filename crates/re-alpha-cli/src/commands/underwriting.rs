use clap::Args;
use serde_json::{json, Value};
use std::time::Instant;

use re_alpha_core::rent_roll::normalize_rent_roll;
use re_alpha_core::underwriting::scenarios::{BASE, BEAR, BULL};
use re_alpha_core::underwriting::{run_financial_model, run_scenarios_with};
use re_alpha_core::with_metadata;

use super::{elapsed_us, AssumptionArgs, DealArgs};

/// Arguments for the base-case financial model
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ModelArgs {
    #[command(flatten)]
    pub deal: DealArgs,

    #[command(flatten)]
    pub assumptions: AssumptionArgs,
}

/// Arguments for the bull/base/bear scenario set
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ScenariosArgs {
    #[command(flatten)]
    pub deal: DealArgs,

    // Overrides sit beneath each scenario bundle
    #[command(flatten)]
    pub assumptions: AssumptionArgs,
}

pub fn run_model(args: ModelArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let raw = args.deal.read_raw()?;
    let overrides = args.assumptions.overrides()?;

    let start = Instant::now();
    let rent_roll = normalize_rent_roll(&raw);
    let financials = run_financial_model(&rent_roll, overrides.as_ref());

    let mut warnings = rent_roll.warnings;
    warnings.extend(financials.error.clone());
    let assumptions = financials.assumptions_used;

    let output = with_metadata(
        "Multifamily Underwriting (interest-only debt, NOI growth)",
        &assumptions,
        warnings,
        elapsed_us(start),
        financials,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_scenarios(args: ScenariosArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let raw = args.deal.read_raw()?;
    let overrides = args.assumptions.overrides()?;

    let start = Instant::now();
    let rent_roll = normalize_rent_roll(&raw);
    let scenarios = run_scenarios_with(&rent_roll, overrides.as_ref());

    let mut warnings = rent_roll.warnings;
    warnings.extend(scenarios.base.financials.error.clone());

    let output = with_metadata(
        "Bull/Base/Bear Scenario Analysis",
        &json!({
            "base_overrides": overrides,
            "bundles": { "bull": BULL, "base": BASE, "bear": BEAR },
        }),
        warnings,
        elapsed_us(start),
        scenarios,
    );
    Ok(serde_json::to_value(output)?)
}
