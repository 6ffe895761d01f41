//! Money parsing

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use thiserror::Error;

/// Errors from parsing prices and percentages written in configuration files.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyParseError {
    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Look up a supported ISO currency by its alphabetic code.
///
/// # Errors
///
/// Returns [`MoneyParseError::UnknownCurrency`] for anything other than GBP, USD or EUR.
pub fn currency(code: &str) -> Result<&'static Currency, MoneyParseError> {
    match code {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(MoneyParseError::UnknownCurrency(other.to_string())),
    }
}

/// Parse a price string (e.g. "24.99 USD").
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY", if the amount is
/// not a decimal, is negative or does not fit, or if the currency code is not recognised.
pub fn parse_price(s: &str) -> Result<Money<'static, Currency>, MoneyParseError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, code] = parts.as_slice() else {
        return Err(MoneyParseError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| MoneyParseError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() {
        return Err(MoneyParseError::InvalidPrice(s.to_string()));
    }

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| MoneyParseError::InvalidPrice(s.to_string()))?;

    Ok(Money::from_minor(minor_units, currency(code)?))
}

/// Parse a percentage string, either "8%" or "0.08".
///
/// # Errors
///
/// Returns an error if the string cannot be parsed as a number.
pub fn parse_percentage(s: &str) -> Result<Percentage, MoneyParseError> {
    let trimmed = s.trim();

    if let Some(percent_str) = trimmed.strip_suffix('%') {
        let value = percent_str
            .trim()
            .parse::<Decimal>()
            .map_err(|_err| MoneyParseError::InvalidPercentage(s.to_string()))?;

        Ok(Percentage::from(value / Decimal::ONE_HUNDRED))
    } else {
        let value = trimmed
            .parse::<Decimal>()
            .map_err(|_err| MoneyParseError::InvalidPercentage(s.to_string()))?;

        Ok(Percentage::from(value))
    }
}
