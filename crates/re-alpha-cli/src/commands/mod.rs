pub mod analysis;
pub mod negotiation;
pub mod rent_roll;
pub mod underwriting;

use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use std::time::Instant;

use re_alpha_core::assumptions::AssumptionOverrides;

use crate::input;

/// Where to read the raw extraction record from
#[derive(Args)]
pub struct DealArgs {
    /// Path to the raw extraction JSON (read from stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,
}

/// Assumption overrides. Individual flags win over the `--assumptions` file.
#[derive(Args)]
pub struct AssumptionArgs {
    /// Path to a JSON or YAML file of assumption overrides
    #[arg(long)]
    pub assumptions: Option<String>,

    /// Annual NOI growth (e.g. 0.03 for 3%)
    #[arg(long)]
    pub rent_growth: Option<Decimal>,

    /// Hold period in years
    #[arg(long)]
    pub hold_period: Option<u32>,

    /// Loan-to-value (e.g. 0.70)
    #[arg(long)]
    pub ltv: Option<Decimal>,

    /// Interest rate on the interest-only loan
    #[arg(long)]
    pub interest_rate: Option<Decimal>,

    /// Operating expenses as a fraction of EGI
    #[arg(long)]
    pub expense_ratio: Option<Decimal>,

    /// Cap rate reduction assumed at exit
    #[arg(long)]
    pub exit_cap_compression: Option<Decimal>,
}

impl DealArgs {
    pub fn read_raw(&self) -> Result<Value, Box<dyn std::error::Error>> {
        if let Some(ref path) = self.input {
            input::file::read_json_value(path)
        } else if let Some(data) = input::stdin::read_stdin()? {
            Ok(data)
        } else {
            Err("--input <raw.json> or stdin required".into())
        }
    }
}

impl AssumptionArgs {
    /// File overrides with flag overrides on top; `None` when nothing was set.
    pub fn overrides(&self) -> Result<Option<AssumptionOverrides>, Box<dyn std::error::Error>> {
        let from_file = match self.assumptions {
            Some(ref path) => input::assumptions::read_overrides(path)?,
            None => AssumptionOverrides::default(),
        };
        let from_flags = AssumptionOverrides {
            rent_growth: self.rent_growth,
            hold_period: self.hold_period,
            ltv: self.ltv,
            interest_rate: self.interest_rate,
            expense_ratio: self.expense_ratio,
            exit_cap_compression: self.exit_cap_compression,
        };
        let merged = from_file.layered(&from_flags);
        Ok((!merged.is_empty()).then_some(merged))
    }
}

pub(crate) fn elapsed_us(start: Instant) -> u64 {
    start.elapsed().as_micros() as u64
}
