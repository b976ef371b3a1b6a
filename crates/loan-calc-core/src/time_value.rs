use rust_decimal::prelude::*;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::LoanCalcError;
use crate::types::{Money, Percent, Rate};
use crate::LoanCalcResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);

/// Convert an annual percentage (10.5) into a monthly decimal rate (0.00875).
pub fn monthly_rate(annual_rate_percent: Percent) -> Rate {
    annual_rate_percent / (MONTHS_PER_YEAR * PERCENT)
}

/// Round to the nearest whole currency unit, halves away from zero.
///
/// Every amount the calculator emits is positive, so this is round-half-up.
pub fn round_currency(amount: Money) -> Money {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Compound growth factor (1 + r)^n.
pub fn compound_factor(rate: Rate, nper: u32) -> LoanCalcResult<Decimal> {
    (Decimal::ONE + rate)
        .checked_powi(i64::from(nper))
        .ok_or_else(|| {
            LoanCalcError::invalid_term(
                "annual_rate_percent",
                format!("compounding {rate} over {nper} periods exceeds the decimal range"),
            )
        })
}

/// Unrounded level payment that fully amortizes `principal` over `nper`
/// periods at periodic rate `rate` (payments in arrears, no balloon).
///
/// A zero rate spreads the principal evenly; the annuity formula is never
/// evaluated there because its denominator vanishes.
pub fn level_payment(rate: Rate, nper: u32, principal: Money) -> LoanCalcResult<Money> {
    if nper == 0 {
        return Err(LoanCalcError::invalid_term(
            "tenure_months",
            "must be >= 1, got 0",
        ));
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(nper));
    }

    let factor = compound_factor(rate, nper)?;
    let denominator = factor - Decimal::ONE;

    if denominator.is_zero() {
        // Rate so small that (1 + r)^n is indistinguishable from 1.
        return Ok(principal / Decimal::from(nper));
    }

    let numerator = principal
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(factor))
        .ok_or_else(|| {
            LoanCalcError::invalid_term(
                "principal",
                format!("{principal} is too large to amortize at rate {rate}"),
            )
        })?;

    numerator.checked_div(denominator).ok_or_else(|| {
        LoanCalcError::invalid_term(
            "principal",
            format!("{principal} is too large to amortize at rate {rate}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_monthly_rate_conversion() {
        assert_eq!(monthly_rate(dec!(10.5)), dec!(0.00875));
        assert_eq!(monthly_rate(dec!(12)), dec!(0.01));
        assert_eq!(monthly_rate(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_round_currency_half_up() {
        assert_eq!(round_currency(dec!(10.5)), dec!(11));
        assert_eq!(round_currency(dec!(10.49)), dec!(10));
        assert_eq!(round_currency(dec!(8884.8788)), dec!(8885));
    }

    #[test]
    fn test_level_payment_zero_rate() {
        let result = level_payment(Decimal::ZERO, 12, dec!(120000)).unwrap();
        assert_eq!(result, dec!(10000));
    }

    #[test]
    fn test_level_payment_standard() {
        // 100,000 at 1% per month over 12 months ≈ 8884.88
        let result = level_payment(dec!(0.01), 12, dec!(100000)).unwrap();
        assert!((result - dec!(8884.88)).abs() < dec!(0.01));
    }

    #[test]
    fn test_level_payment_rejects_zero_periods() {
        assert!(level_payment(dec!(0.01), 0, dec!(1000)).is_err());
    }

    #[test]
    fn test_level_payment_division_overflow_is_an_error() {
        // One period: payment = P * (1 + r), past Decimal::MAX.
        let err = level_payment(dec!(0.01), 1, Decimal::MAX).unwrap_err();
        assert_eq!(err.violated_fields(), vec!["principal"]);
    }

    #[test]
    fn test_compound_factor_single_period() {
        assert_eq!(compound_factor(dec!(0.01), 1).unwrap(), dec!(1.01));
    }
}
