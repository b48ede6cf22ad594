use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::model::{run_financial_model, FinancialResult};
use crate::assumptions::AssumptionOverrides;
use crate::rent_roll::CanonicalRentRoll;
use crate::types::Rate;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioName {
    Bull,
    Base,
    Bear,
}

/// Fixed assumption bundle for a named scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioBundle {
    pub rent_growth: Rate,
    pub exit_cap_compression: Rate,
    /// Signed adjustment to the rent roll vacancy rate
    pub vacancy_adj: Rate,
}

pub const BULL: ScenarioBundle = ScenarioBundle {
    rent_growth: dec!(0.04),
    exit_cap_compression: dec!(0.03),
    vacancy_adj: dec!(-0.02),
};

pub const BASE: ScenarioBundle = ScenarioBundle {
    rent_growth: dec!(0.03),
    exit_cap_compression: dec!(0.02),
    vacancy_adj: dec!(0.0),
};

pub const BEAR: ScenarioBundle = ScenarioBundle {
    rent_growth: dec!(0.01),
    exit_cap_compression: dec!(0.0),
    vacancy_adj: dec!(0.05),
};

/// One scenario's model output plus the vacancy it was run at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    #[serde(flatten)]
    pub financials: FinancialResult,
    pub vacancy_rate_adjusted: Rate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResults {
    pub bull: ScenarioResult,
    pub base: ScenarioResult,
    pub bear: ScenarioResult,
}

// ---------------------------------------------------------------------------
// Scenario definitions
// ---------------------------------------------------------------------------

impl ScenarioName {
    pub const ALL: [ScenarioName; 3] = [ScenarioName::Bull, ScenarioName::Base, ScenarioName::Bear];

    pub fn bundle(self) -> ScenarioBundle {
        match self {
            ScenarioName::Bull => BULL,
            ScenarioName::Base => BASE,
            ScenarioName::Bear => BEAR,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScenarioName::Bull => "bull",
            ScenarioName::Base => "base",
            ScenarioName::Bear => "bear",
        }
    }
}

impl ScenarioBundle {
    /// Caller overrides with this bundle's keys layered on top.
    pub fn overrides_over(&self, base: &AssumptionOverrides) -> AssumptionOverrides {
        base.layered(&AssumptionOverrides {
            rent_growth: Some(self.rent_growth),
            exit_cap_compression: Some(self.exit_cap_compression),
            ..Default::default()
        })
    }

    /// Vacancy after the adjustment, clamped to [0, 1].
    pub fn adjusted_vacancy(&self, vacancy_rate: Rate) -> Rate {
        (vacancy_rate + self.vacancy_adj).clamp(Decimal::ZERO, Decimal::ONE)
    }
}

impl ScenarioResults {
    pub fn get(&self, name: ScenarioName) -> &ScenarioResult {
        match name {
            ScenarioName::Bull => &self.bull,
            ScenarioName::Base => &self.base,
            ScenarioName::Bear => &self.bear,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScenarioName, &ScenarioResult)> {
        ScenarioName::ALL.into_iter().map(move |name| (name, self.get(name)))
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run bull/base/bear on top of the default assumptions.
pub fn run_scenarios(rent_roll: &CanonicalRentRoll) -> ScenarioResults {
    run_scenarios_with(rent_roll, None)
}

/// Run bull/base/bear with each bundle layered over `base_overrides`.
///
/// Bundles are constants and every run builds its own override value, so
/// runs are independent of each other and of call order.
pub fn run_scenarios_with(
    rent_roll: &CanonicalRentRoll,
    base_overrides: Option<&AssumptionOverrides>,
) -> ScenarioResults {
    let base = base_overrides.copied().unwrap_or_default();
    ScenarioResults {
        bull: run_scenario(rent_roll, ScenarioName::Bull, &base),
        base: run_scenario(rent_roll, ScenarioName::Base, &base),
        bear: run_scenario(rent_roll, ScenarioName::Bear, &base),
    }
}

/// Run a single named scenario.
pub fn run_scenario(
    rent_roll: &CanonicalRentRoll,
    name: ScenarioName,
    base_overrides: &AssumptionOverrides,
) -> ScenarioResult {
    let bundle = name.bundle();
    let vacancy_rate_adjusted = bundle.adjusted_vacancy(rent_roll.vacancy_rate);
    let adjusted = CanonicalRentRoll {
        vacancy_rate: vacancy_rate_adjusted,
        ..rent_roll.clone()
    };
    let overrides = bundle.overrides_over(base_overrides);

    let financials = run_financial_model(&adjusted, Some(&overrides));
    debug!(
        scenario = name.as_str(),
        vacancy = %vacancy_rate_adjusted,
        irr = ?financials.irr_5yr,
        "scenario complete"
    );

    ScenarioResult {
        financials,
        vacancy_rate_adjusted,
    }
}
