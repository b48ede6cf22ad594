use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::rent_roll::CanonicalRentRoll;
use crate::types::{Money, Multiple, Rate};
use crate::underwriting::FinancialResult;

pub const CAP_RATE_FLOOR: Rate = dec!(0.05);
pub const VACANCY_CEILING: Rate = dec!(0.10);
pub const DSCR_FLOOR: Multiple = dec!(1.25);
pub const CASH_ON_CASH_FLOOR: Rate = dec!(0.06);
pub const IRR_HURDLE: Rate = dec!(0.12);
/// Units renting below this fraction of the average count as a low-rent cluster
pub const LOW_RENT_FRACTION: Rate = dec!(0.75);

pub const NO_LEVERAGE_MESSAGE: &str =
    "No significant leverage points identified at current pricing.";

/// Buyer-side negotiation observations from the rent roll and base-case
/// financials. Each threshold is tested independently; the result is never
/// empty.
pub fn negotiation_leverage(
    rent_roll: &CanonicalRentRoll,
    financials: &FinancialResult,
) -> Vec<String> {
    let mut points: Vec<String> = Vec::new();

    if let Some(cap_rate) = financials.cap_rate.filter(|c| *c < CAP_RATE_FLOOR) {
        points.push(format!(
            "Below-market cap rate ({}) — seller pricing aggressively.",
            pct(cap_rate, 1)
        ));
    }

    if rent_roll.vacancy_rate > VACANCY_CEILING {
        points.push(format!(
            "Elevated vacancy ({}) — negotiate price reduction to reflect lease-up risk.",
            pct(rent_roll.vacancy_rate, 0)
        ));
    }

    if let Some(dscr) = financials.dscr.filter(|d| *d < DSCR_FLOOR) {
        points.push(format!(
            "Tight DSCR ({:.2}x) — lenders may require lower LTV, weakening seller's buyer pool.",
            dscr.round_dp(2)
        ));
    }

    if let Some(coc) = financials.cash_on_cash.filter(|c| *c < CASH_ON_CASH_FLOOR) {
        points.push(format!(
            "Low cash-on-cash ({}) at asking — weak current yield supports price reduction.",
            pct(coc, 1)
        ));
    }

    if let Some(irr) = financials.irr_5yr.filter(|r| *r < IRR_HURDLE) {
        points.push(format!(
            "5-year IRR of {} is below institutional hurdle rates — supports bid below asking.",
            pct(irr, 1)
        ));
    }

    let low_rent_units = count_low_rent_units(rent_roll);
    if low_rent_units > 0 {
        points.push(format!(
            "{low_rent_units} units renting 25%+ below average — signals deferred rent increases or problem units."
        ));
    }

    debug!(points = points.len(), "negotiation leverage evaluated");

    if points.is_empty() {
        points.push(NO_LEVERAGE_MESSAGE.to_string());
    }
    points
}

/// Units whose rent sits below [`LOW_RENT_FRACTION`] of the average known,
/// non-zero rent. Zero when the rent total leaves the decimal range.
fn count_low_rent_units(rent_roll: &CanonicalRentRoll) -> usize {
    let rents: Vec<Money> = rent_roll.known_rents().filter(|r| !r.is_zero()).collect();
    if rents.is_empty() {
        return 0;
    }
    let Some(total) = rents
        .iter()
        .try_fold(Decimal::ZERO, |acc, rent| acc.checked_add(*rent))
    else {
        debug!("rent total overflowed; low-rent check skipped");
        return 0;
    };
    let average = total / Decimal::from(rents.len());
    let threshold = average * LOW_RENT_FRACTION;
    rents.iter().filter(|r| **r < threshold).count()
}

/// Rate as a percentage string with `dp` decimal places. Rates too large to
/// scale are printed as the raw fraction.
fn pct(rate: Rate, dp: u32) -> String {
    match rate.checked_mul(dec!(100)) {
        Some(scaled) => {
            let value = scaled.round_dp(dp);
            format!("{value:.prec$}%", prec = dp as usize)
        }
        None => rate.to_string(),
    }
}
