use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::AlphaError;
use crate::types::{Money, Rate};
use crate::AlphaResult;

const CONVERGENCE_THRESHOLD: Decimal = dec!(0.0000001);
const MAX_IRR_ITERATIONS: u32 = 100;
const RATE_FLOOR: Decimal = dec!(-0.99);
const RATE_CEILING: Decimal = dec!(100.0);

fn overflow(context: impl Into<String>) -> AlphaError {
    AlphaError::Overflow {
        context: context.into(),
    }
}

/// Net Present Value of a series of periodic cash flows (index 0 undiscounted)
pub fn npv(rate: Rate, cash_flows: &[Money]) -> AlphaResult<Money> {
    if rate <= dec!(-1) {
        return Err(AlphaError::InvalidInput {
            field: "rate".into(),
            reason: "Discount rate must be greater than -100%".into(),
        });
    }

    let mut result = Decimal::ZERO;
    let one_plus_r = Decimal::ONE + rate;
    let mut discount = Decimal::ONE;

    for (t, cf) in cash_flows.iter().enumerate() {
        if t > 0 {
            discount = discount
                .checked_mul(one_plus_r)
                .ok_or_else(|| overflow(format!("NPV discount factor at period {t}")))?;
        }
        if discount.is_zero() {
            return Err(AlphaError::DivisionByZero {
                context: format!("NPV discount factor at period {t}"),
            });
        }
        let pv = cf
            .checked_div(discount)
            .ok_or_else(|| overflow(format!("NPV present value at period {t}")))?;
        result = result
            .checked_add(pv)
            .ok_or_else(|| overflow("NPV accumulation"))?;
    }

    Ok(result)
}

/// NPV(r) = sum CF_t / (1+r)^t and its derivative d(NPV)/dr.
fn npv_and_derivative(cash_flows: &[Money], rate: Rate) -> AlphaResult<(Decimal, Decimal)> {
    let one_plus_r = Decimal::ONE + rate;
    let mut npv = Decimal::ZERO;
    let mut dnpv = Decimal::ZERO;
    let mut discount = Decimal::ONE;

    for (t, cf) in cash_flows.iter().enumerate() {
        let pv = cf
            .checked_mul(discount)
            .ok_or_else(|| overflow("IRR present value"))?;
        npv = npv.checked_add(pv).ok_or_else(|| overflow("IRR NPV"))?;
        if t > 0 {
            // d/dr of CF_t / (1+r)^t = -t * CF_t / (1+r)^(t+1)
            let term = Decimal::from(-(t as i64))
                .checked_mul(pv)
                .and_then(|v| v.checked_div(one_plus_r))
                .ok_or_else(|| overflow("IRR derivative"))?;
            dnpv = dnpv
                .checked_add(term)
                .ok_or_else(|| overflow("IRR derivative"))?;
        }
        discount = discount
            .checked_div(one_plus_r)
            .ok_or_else(|| overflow("IRR discount factor"))?;
    }

    Ok((npv, dnpv))
}

/// Internal Rate of Return using Newton-Raphson.
///
/// Converges when either |NPV| or the Newton step falls below 1e-7. The rate
/// is kept inside [-99%, 10,000%] between iterations.
pub fn irr(cash_flows: &[Money], guess: Rate) -> AlphaResult<Rate> {
    if cash_flows.len() < 2 {
        return Err(AlphaError::InsufficientData(
            "IRR requires at least 2 cash flows".into(),
        ));
    }

    let mut rate = guess;
    let mut last_npv = Decimal::ZERO;

    for i in 0..MAX_IRR_ITERATIONS {
        let (npv_val, dnpv) = npv_and_derivative(cash_flows, rate)?;
        last_npv = npv_val;

        if npv_val.abs() < CONVERGENCE_THRESHOLD {
            return Ok(rate);
        }

        if dnpv.is_zero() {
            return Err(AlphaError::ConvergenceFailure {
                function: "IRR".into(),
                iterations: i,
                last_delta: npv_val,
            });
        }

        let step = npv_val
            .checked_div(dnpv)
            .ok_or_else(|| overflow("IRR Newton step"))?;
        let next = rate - step;

        if step.abs() < CONVERGENCE_THRESHOLD {
            return Ok(next);
        }

        rate = next.clamp(RATE_FLOOR, RATE_CEILING);
    }

    Err(AlphaError::ConvergenceFailure {
        function: "IRR".into(),
        iterations: MAX_IRR_ITERATIONS,
        last_delta: last_npv,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_npv_basic() {
        let cfs = vec![dec!(-1000), dec!(300), dec!(400), dec!(500)];
        let result = npv(dec!(0.10), &cfs).unwrap();
        // NPV at 10%: -1000 + 300/1.1 + 400/1.21 + 500/1.331 ≈ -21.04
        assert!((result - dec!(-21.04)).abs() < dec!(1.0));
    }

    #[test]
    fn test_npv_zero_rate() {
        let cfs = vec![dec!(-100), dec!(50), dec!(50), dec!(50)];
        let result = npv(dec!(0.0), &cfs).unwrap();
        assert_eq!(result, dec!(50));
    }

    #[test]
    fn test_npv_rejects_rate_below_minus_one() {
        assert!(npv(dec!(-1), &[dec!(-1), dec!(2)]).is_err());
    }

    #[test]
    fn test_irr_basic() {
        let cfs = vec![dec!(-1000), dec!(400), dec!(400), dec!(400)];
        let result = irr(&cfs, dec!(0.10)).unwrap();
        // IRR should be ~9.7%
        assert!((result - dec!(0.097)).abs() < dec!(0.01));
    }

    #[test]
    fn test_irr_par_coupon_profile() {
        // 20 coupons on 100 with principal back in year 5 => exactly 20%
        let cfs = vec![
            dec!(-100),
            dec!(20),
            dec!(20),
            dec!(20),
            dec!(20),
            dec!(120),
        ];
        let result = irr(&cfs, dec!(0.10)).unwrap();
        assert!((result - dec!(0.20)).abs() < dec!(0.0001), "got {result}");
    }

    #[test]
    fn test_irr_single_flow_is_insufficient() {
        let err = irr(&[dec!(-100)], dec!(0.10)).unwrap_err();
        assert!(matches!(err, AlphaError::InsufficientData(_)));
    }

    #[test]
    fn test_irr_no_sign_change_fails() {
        let cfs = vec![dec!(100), dec!(100), dec!(100)];
        assert!(irr(&cfs, dec!(0.10)).is_err());
    }

    #[test]
    fn test_irr_negative_return() {
        // Get back 80 of 100 after one year => -20%
        let cfs = vec![dec!(-100), dec!(80)];
        let result = irr(&cfs, dec!(0.10)).unwrap();
        assert!((result - dec!(-0.20)).abs() < dec!(0.0001));
    }
}
