use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::assumptions::{AssumptionOverrides, AssumptionSet};
use crate::rent_roll::{CanonicalRentRoll, CanonicalUnit};
use crate::time_value;
use crate::types::{round_money, round_multiple, round_rate, Money, Multiple, Rate};

pub const MISSING_PRICE_ERROR: &str =
    "Purchase price missing or invalid — metrics requiring price are unavailable.";
pub const HOLD_PERIOD_ERROR: &str =
    "Hold period exceeds 1000 years — metrics requiring price are unavailable.";
pub const NUMERIC_RANGE_ERROR: &str =
    "Projection exceeds the supported numeric range — metrics requiring price are unavailable.";

/// Longest hold the projection will run. Bounds the cash-flow vector and the
/// IRR solver's work per iteration.
pub const MAX_HOLD_PERIOD: u32 = 1000;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const EXIT_CAP_FLOOR: Rate = dec!(0.01);
const IRR_GUESS: Rate = dec!(0.10);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Underwriting metrics for one rent roll under one assumption set.
///
/// Price-dependent fields are `None` when the rent roll has no usable
/// purchase price; `error` then explains why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// 12 x sum of known monthly rents
    pub gross_annual_rent: Money,
    /// Gross rent less vacancy
    pub effective_gross_income: Money,
    pub operating_expenses: Money,
    pub noi: Money,
    /// NOI / purchase price
    pub cap_rate: Option<Rate>,
    pub equity_invested: Option<Money>,
    pub loan_amount: Option<Money>,
    /// Annual interest-only debt service
    pub debt_service: Option<Money>,
    pub annual_cash_flow_year1: Option<Money>,
    pub cash_on_cash: Option<Rate>,
    pub dscr: Option<Multiple>,
    /// Levered IRR over the hold period (five years by default)
    pub irr_5yr: Option<Rate>,
    pub exit_value: Option<Money>,
    /// Year 0 equity outflow followed by one entry per hold year,
    /// net exit proceeds folded into the last
    pub cash_flows: Vec<Money>,
    pub assumptions_used: AssumptionSet,
}

/// Year-one income lines, unrounded.
#[derive(Debug, Clone, Copy, Default)]
struct IncomeStatement {
    gross_annual_rent: Money,
    effective_gross_income: Money,
    operating_expenses: Money,
    noi: Money,
}

struct HoldProjection {
    annual_cash_flows: Vec<Money>,
    exit_value: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the underwriting model on a canonical rent roll.
///
/// Total over its inputs: a missing price, an oversized hold, or a
/// projection outside decimal range yields income-only metrics with `error`
/// set, and a non-convergent IRR is reported as `None`.
pub fn run_financial_model(
    rent_roll: &CanonicalRentRoll,
    overrides: Option<&AssumptionOverrides>,
) -> FinancialResult {
    let assumptions = AssumptionSet::resolve(overrides);
    let income = match gross_annual_rent(&rent_roll.units).and_then(|gross| {
        IncomeStatement::year_one(gross, rent_roll.vacancy_rate, assumptions.expense_ratio)
    }) {
        Some(income) => income,
        None => {
            warn!(property = %rent_roll.property_name, "income lines overflowed decimal range");
            return income_only(&IncomeStatement::default(), assumptions, NUMERIC_RANGE_ERROR);
        }
    };

    let purchase_price = match rent_roll.purchase_price {
        Some(price) if price > Decimal::ZERO => price,
        _ => {
            warn!(property = %rent_roll.property_name, "purchase price missing or non-positive");
            return income_only(&income, assumptions, MISSING_PRICE_ERROR);
        }
    };

    if assumptions.hold_period > MAX_HOLD_PERIOD {
        warn!(hold_period = assumptions.hold_period, "hold period too long to project");
        return income_only(&income, assumptions, HOLD_PERIOD_ERROR);
    }

    match levered_metrics(&income, purchase_price, &assumptions) {
        Some(result) => {
            debug!(
                property = %rent_roll.property_name,
                noi = %result.noi,
                cap_rate = ?result.cap_rate,
                irr = ?result.irr_5yr,
                "financial model complete"
            );
            result
        }
        None => {
            warn!(property = %rent_roll.property_name, "projection overflowed decimal range");
            income_only(&income, assumptions, NUMERIC_RANGE_ERROR)
        }
    }
}

/// 12 x the sum of known monthly rents. Units with unknown rent are skipped,
/// not counted as zero. `None` when the total leaves the decimal range.
pub fn gross_annual_rent(units: &[CanonicalUnit]) -> Option<Money> {
    units
        .iter()
        .filter_map(|u| u.monthly_rent)
        .try_fold(Decimal::ZERO, |acc, rent| acc.checked_add(rent))?
        .checked_mul(MONTHS_PER_YEAR)
}

// ---------------------------------------------------------------------------
// Income
// ---------------------------------------------------------------------------

impl IncomeStatement {
    fn year_one(gross_annual_rent: Money, vacancy_rate: Rate, expense_ratio: Rate) -> Option<Self> {
        let occupancy = Decimal::ONE.checked_sub(vacancy_rate)?;
        let effective_gross_income = gross_annual_rent.checked_mul(occupancy)?;
        let operating_expenses = effective_gross_income.checked_mul(expense_ratio)?;
        Some(IncomeStatement {
            gross_annual_rent,
            effective_gross_income,
            operating_expenses,
            noi: effective_gross_income.checked_sub(operating_expenses)?,
        })
    }
}

fn income_only(income: &IncomeStatement, assumptions: AssumptionSet, error: &str) -> FinancialResult {
    FinancialResult {
        error: Some(error.to_string()),
        gross_annual_rent: round_money(income.gross_annual_rent),
        effective_gross_income: round_money(income.effective_gross_income),
        operating_expenses: round_money(income.operating_expenses),
        noi: round_money(income.noi),
        cap_rate: None,
        equity_invested: None,
        loan_amount: None,
        debt_service: None,
        annual_cash_flow_year1: None,
        cash_on_cash: None,
        dscr: None,
        irr_5yr: None,
        exit_value: None,
        cash_flows: Vec::new(),
        assumptions_used: assumptions,
    }
}

// ---------------------------------------------------------------------------
// Leverage and projection
// ---------------------------------------------------------------------------

fn levered_metrics(
    income: &IncomeStatement,
    purchase_price: Money,
    a: &AssumptionSet,
) -> Option<FinancialResult> {
    let noi = income.noi;
    let cap_rate = noi.checked_div(purchase_price)?;

    let equity_invested = purchase_price.checked_mul(Decimal::ONE.checked_sub(a.ltv)?)?;
    let loan_amount = purchase_price.checked_mul(a.ltv)?;
    let debt_service = loan_amount.checked_mul(a.interest_rate)?;
    let year1_cash_flow = noi.checked_sub(debt_service)?;

    let projection = project_hold(noi, cap_rate, loan_amount, debt_service, a)?;

    let mut cash_flows = Vec::with_capacity(projection.annual_cash_flows.len() + 1);
    cash_flows.push(-equity_invested.abs());
    cash_flows.extend(projection.annual_cash_flows);

    let irr = solve_irr(&cash_flows);

    let cash_on_cash = if equity_invested > Decimal::ZERO {
        year1_cash_flow.checked_div(equity_invested)?
    } else {
        Decimal::ZERO
    };

    let dscr = if debt_service > Decimal::ZERO {
        noi.checked_div(debt_service)?
    } else {
        Decimal::ZERO
    };

    Some(FinancialResult {
        error: None,
        gross_annual_rent: round_money(income.gross_annual_rent),
        effective_gross_income: round_money(income.effective_gross_income),
        operating_expenses: round_money(income.operating_expenses),
        noi: round_money(noi),
        cap_rate: Some(round_rate(cap_rate)),
        equity_invested: Some(round_money(equity_invested)),
        loan_amount: Some(round_money(loan_amount)),
        debt_service: Some(round_money(debt_service)),
        annual_cash_flow_year1: Some(round_money(year1_cash_flow)),
        cash_on_cash: Some(round_rate(cash_on_cash)),
        dscr: Some(round_multiple(dscr)),
        irr_5yr: irr,
        exit_value: Some(round_money(projection.exit_value)),
        cash_flows: cash_flows.into_iter().map(round_money).collect(),
        assumptions_used: *a,
    })
}

/// Grow the prior year's NOI by `1 + rent_growth` each year; debt service is
/// flat. Net exit proceeds land in the final hold year.
fn project_hold(
    noi: Money,
    cap_rate: Rate,
    loan_amount: Money,
    debt_service: Money,
    a: &AssumptionSet,
) -> Option<HoldProjection> {
    let growth = Decimal::ONE.checked_add(a.rent_growth)?;
    let exit_cap = cap_rate.checked_sub(a.exit_cap_compression)?.max(EXIT_CAP_FLOOR);

    let mut projected_noi = noi;
    let mut annual_cash_flows = Vec::with_capacity(a.hold_period as usize);

    for year in 1..=a.hold_period {
        projected_noi = projected_noi.checked_mul(growth)?;
        let mut cash_flow = projected_noi.checked_sub(debt_service)?;
        if year == a.hold_period {
            let net_exit = projected_noi
                .checked_div(exit_cap)?
                .checked_sub(loan_amount)?;
            cash_flow = cash_flow.checked_add(net_exit)?;
        }
        annual_cash_flows.push(cash_flow);
    }

    // A zero-year hold never projects, so this is the exit on today's NOI.
    let exit_value = projected_noi.checked_div(exit_cap)?;

    Some(HoldProjection {
        annual_cash_flows,
        exit_value,
    })
}

fn solve_irr(cash_flows: &[Money]) -> Option<Rate> {
    match time_value::irr(cash_flows, IRR_GUESS) {
        Ok(rate) => Some(round_rate(rate)),
        Err(e) => {
            warn!(error = %e, "IRR unavailable");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
