//! Checkout configuration

use std::{fs, path::Path};

use decimal_percentage::Percentage;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use thiserror::Error;

use crate::money::{MoneyParseError, parse_percentage, parse_price};

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the config file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price or percentage
    #[error(transparent)]
    Money(#[from] MoneyParseError),
}

/// Delivery fee and tax applied when summarising a cart for checkout.
#[derive(Debug, Clone, Copy)]
pub struct CheckoutConfig {
    /// Flat delivery fee added to every order
    pub delivery_fee: Money<'static, Currency>,

    /// Sales tax charged on the subtotal
    pub tax_rate: Percentage,
}

/// On-disk form of [`CheckoutConfig`]
#[derive(Debug, Deserialize)]
struct CheckoutConfigFile {
    /// Delivery fee (e.g., "4.99 USD")
    delivery_fee: String,

    /// Tax rate (e.g., "8%" or "0.08")
    tax_rate: String,
}

impl CheckoutConfig {
    /// Default delivery fee in minor units.
    pub const DEFAULT_DELIVERY_FEE_MINOR: i64 = 499;

    /// Default fee and tax (4.99 delivery, 8% tax) in the given currency.
    #[must_use]
    pub fn for_currency(currency: &'static Currency) -> Self {
        Self {
            delivery_fee: Money::from_minor(Self::DEFAULT_DELIVERY_FEE_MINOR, currency),
            tax_rate: Percentage::from(rust_decimal::Decimal::new(8, 2)),
        }
    }

    /// Parse a config from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or a value cannot be parsed.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let file: CheckoutConfigFile = serde_norway::from_str(yaml)?;

        Ok(Self {
            delivery_fee: parse_price(&file.delivery_fee)?,
            tax_rate: parse_percentage(&file.tax_rate)?,
        })
    }

    /// Load a config from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self::for_currency(rusty_money::iso::USD)
    }
}
