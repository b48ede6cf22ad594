use clap::Args;
use serde_json::{json, Value};
use std::time::Instant;

use re_alpha_core::rent_roll::coercion::OCCUPIED_TOKENS;
use re_alpha_core::rent_roll::normalize_rent_roll;
use re_alpha_core::with_metadata;

use super::{elapsed_us, DealArgs};

/// Arguments for rent roll normalization
#[derive(Args)]
pub struct NormalizeArgs {
    #[command(flatten)]
    pub deal: DealArgs,
}

pub fn run_normalize(args: NormalizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let raw = args.deal.read_raw()?;
    let start = Instant::now();
    let rent_roll = normalize_rent_roll(&raw);
    let warnings = rent_roll.warnings.clone();

    let output = with_metadata(
        "Rent Roll Normalization",
        &json!({ "occupied_tokens": OCCUPIED_TOKENS }),
        warnings,
        elapsed_us(start),
        rent_roll,
    );
    Ok(serde_json::to_value(output)?)
}
