use clap::Args;
use serde_json::Value;

use re_alpha_core::analysis::analyze_deal;

use super::{AssumptionArgs, DealArgs};

/// Arguments for the full deal pipeline
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub deal: DealArgs,

    #[command(flatten)]
    pub assumptions: AssumptionArgs,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let raw = args.deal.read_raw()?;
    let overrides = args.assumptions.overrides()?;
    let output = analyze_deal(&raw, overrides.as_ref());
    Ok(serde_json::to_value(output)?)
}
