//! Pricing

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

/// Errors that can occur while calculating prices.
#[derive(Debug, Error, PartialEq)]
pub enum TotalPriceError {
    /// A minor-unit calculation left the `i64` range.
    #[error("price calculation overflowed")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Calculates `price * quantity`.
///
/// # Errors
///
/// Returns [`TotalPriceError::Overflow`] if the product does not fit in minor units.
pub fn line_total(
    price: Money<'static, Currency>,
    quantity: u32,
) -> Result<Money<'static, Currency>, TotalPriceError> {
    let minor = price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .ok_or(TotalPriceError::Overflow)?;

    Ok(Money::from_minor(minor, price.currency()))
}

/// Sums amounts, starting from zero in `currency`.
///
/// # Errors
///
/// - [`TotalPriceError::Money`]: an amount is in a different currency, or the sum overflowed.
pub fn total_price(
    currency: &'static Currency,
    amounts: impl IntoIterator<Item = Money<'static, Currency>>,
) -> Result<Money<'static, Currency>, TotalPriceError> {
    let total = amounts
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |acc, amount| acc.add(amount))?;

    Ok(total)
}

/// Applies a percentage to an amount in minor units, rounding half away from zero.
///
/// # Errors
///
/// Returns [`TotalPriceError::Overflow`] if the result cannot be represented.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, TotalPriceError> {
    let minor = Decimal::from_i64(minor).ok_or(TotalPriceError::Overflow)?;

    // `Percentage` only exposes its value through multiplication.
    ((*percent) * Decimal::ONE)
        .checked_mul(minor)
        .ok_or(TotalPriceError::Overflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(TotalPriceError::Overflow)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn line_total_multiplies_by_quantity() -> TestResult {
        let total = line_total(Money::from_minor(250, USD), 3)?;

        assert_eq!(total, Money::from_minor(750, USD));

        Ok(())
    }

    #[test]
    fn line_total_overflow_returns_error() {
        let result = line_total(Money::from_minor(i64::MAX, USD), 2);

        assert_eq!(result, Err(TotalPriceError::Overflow));
    }

    #[test]
    fn total_price_of_nothing_is_zero() -> TestResult {
        let total = total_price(GBP, [])?;

        assert_eq!(total, Money::from_minor(0, GBP));

        Ok(())
    }

    #[test]
    fn total_price_sums_amounts() -> TestResult {
        let amounts = [Money::from_minor(100, USD), Money::from_minor(250, USD)];

        assert_eq!(total_price(USD, amounts)?, Money::from_minor(350, USD));

        Ok(())
    }

    #[test]
    fn total_price_rejects_mixed_currencies() {
        let amounts = [Money::from_minor(100, USD), Money::from_minor(100, GBP)];

        assert!(matches!(
            total_price(USD, amounts),
            Err(TotalPriceError::Money(_))
        ));
    }

    #[test]
    fn percent_of_minor_rounds_half_away_from_zero() -> TestResult {
        assert_eq!(percent_of_minor(&Percentage::from(0.08), 125)?, 10);
        assert_eq!(percent_of_minor(&Percentage::from(0.5), 5)?, 3);

        Ok(())
    }

    #[test]
    fn percent_of_minor_overflow_returns_error() {
        let result = percent_of_minor(&Percentage::from(2.0), i64::MAX);

        assert_eq!(result, Err(TotalPriceError::Overflow));
    }
}
