use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Rate;
use crate::AlphaResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Fully-resolved underwriting assumptions for a single model run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssumptionSet {
    /// Annual growth applied to NOI over the hold
    pub rent_growth: Rate,
    /// Hold period in whole years
    pub hold_period: u32,
    /// Loan-to-value (financed fraction of purchase price)
    pub ltv: Rate,
    /// Annual interest rate on the interest-only loan
    pub interest_rate: Rate,
    /// Operating expenses as a fraction of EGI
    pub expense_ratio: Rate,
    /// Reduction in cap rate assumed at exit
    pub exit_cap_compression: Rate,
}

/// System-wide defaults used wherever a caller leaves an assumption unset.
pub const DEFAULT_ASSUMPTIONS: AssumptionSet = AssumptionSet {
    rent_growth: dec!(0.03),
    hold_period: 5,
    ltv: dec!(0.70),
    interest_rate: dec!(0.065),
    expense_ratio: dec!(0.35),
    exit_cap_compression: dec!(0.02),
};

impl Default for AssumptionSet {
    fn default() -> Self {
        DEFAULT_ASSUMPTIONS
    }
}

/// Partial set of caller overrides. Unknown keys are ignored on deserialize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssumptionOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rent_growth: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hold_period: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ltv: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expense_ratio: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_cap_compression: Option<Rate>,
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

impl AssumptionSet {
    /// Defaults merged with `overrides`; an override wins per key.
    pub fn resolve(overrides: Option<&AssumptionOverrides>) -> Self {
        match overrides {
            Some(o) => DEFAULT_ASSUMPTIONS.with_overrides(o),
            None => DEFAULT_ASSUMPTIONS,
        }
    }

    pub fn with_overrides(&self, o: &AssumptionOverrides) -> Self {
        AssumptionSet {
            rent_growth: o.rent_growth.unwrap_or(self.rent_growth),
            hold_period: o.hold_period.unwrap_or(self.hold_period),
            ltv: o.ltv.unwrap_or(self.ltv),
            interest_rate: o.interest_rate.unwrap_or(self.interest_rate),
            expense_ratio: o.expense_ratio.unwrap_or(self.expense_ratio),
            exit_cap_compression: o.exit_cap_compression.unwrap_or(self.exit_cap_compression),
        }
    }
}

impl AssumptionOverrides {
    /// Layer `top` over `self`; keys set in `top` win.
    pub fn layered(&self, top: &AssumptionOverrides) -> Self {
        AssumptionOverrides {
            rent_growth: top.rent_growth.or(self.rent_growth),
            hold_period: top.hold_period.or(self.hold_period),
            ltv: top.ltv.or(self.ltv),
            interest_rate: top.interest_rate.or(self.interest_rate),
            expense_ratio: top.expense_ratio.or(self.expense_ratio),
            exit_cap_compression: top.exit_cap_compression.or(self.exit_cap_compression),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == AssumptionOverrides::default()
    }

    pub fn from_json(json: &str) -> AlphaResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: &serde_json::Value) -> AlphaResult<Self> {
        Ok(serde_json::from_value(value.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let a = AssumptionSet::default();
        assert_eq!(a.rent_growth, dec!(0.03));
        assert_eq!(a.hold_period, 5);
        assert_eq!(a.ltv, dec!(0.70));
        assert_eq!(a.interest_rate, dec!(0.065));
        assert_eq!(a.expense_ratio, dec!(0.35));
        assert_eq!(a.exit_cap_compression, dec!(0.02));
    }

    #[test]
    fn test_override_wins_per_key() {
        let o = AssumptionOverrides {
            ltv: Some(dec!(0.60)),
            hold_period: Some(7),
            ..Default::default()
        };
        let a = AssumptionSet::resolve(Some(&o));
        assert_eq!(a.ltv, dec!(0.60));
        assert_eq!(a.hold_period, 7);
        assert_eq!(a.interest_rate, dec!(0.065));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let o = AssumptionOverrides::from_json(
            r#"{"ltv": 0.65, "discount_rate": 0.09, "cap_rate": "0.05"}"#,
        )
        .unwrap();
        assert_eq!(o.ltv, Some(dec!(0.65)));
        assert_eq!(o.rent_growth, None);
    }

    #[test]
    fn test_layering() {
        let base = AssumptionOverrides {
            ltv: Some(dec!(0.5)),
            rent_growth: Some(dec!(0.02)),
            ..Default::default()
        };
        let top = AssumptionOverrides {
            rent_growth: Some(dec!(0.04)),
            ..Default::default()
        };
        let merged = base.layered(&top);
        assert_eq!(merged.ltv, Some(dec!(0.5)));
        assert_eq!(merged.rent_growth, Some(dec!(0.04)));
        assert!(!merged.is_empty());
        assert!(AssumptionOverrides::default().is_empty());
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(AssumptionOverrides::from_json("{not json").is_err());
    }
}
