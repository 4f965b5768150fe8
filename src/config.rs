//! Cart configuration.
//!
//! # Environment Variables
//!
//! All optional; unset variables keep the defaults.
//! - `CART_TAX_RATE` - Default tax percentage (default: 21)
//! - `CART_DISCOUNT_RATE` - Default discount percentage (default: 0)
//! - `CART_DECIMALS` - Decimals shown by formatted amounts (default: 2)
//! - `CART_DECIMAL_POINT` - Decimal separator (default: `.`)
//! - `CART_THOUSANDS_SEPARATOR` - Thousands separator (default: `,`)
//! - `CART_CURRENCY_SYMBOL` - Currency symbol (default: none)
//! - `CART_CURRENCY_PLACEMENT` - `before` or `after` the amount (default: `before`)

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::item::{validate_discount_rate, validate_tax_rate};

/// Largest scale a `Decimal` can represent.
const MAX_DECIMALS: u32 = 28;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A value could not be parsed or is out of range.
    Invalid { key: String, message: String },
    /// The JSON document could not be parsed.
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid { key, message } => {
                write!(f, "invalid cart setting {}: {}", key, message)
            }
            ConfigError::Parse(message) => write!(f, "could not parse cart config: {}", message),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Cart-wide settings read once when a cart is opened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartConfig {
    /// Tax percentage applied to new items.
    pub tax_rate: Decimal,
    /// Discount percentage applied to new items.
    pub discount_rate: Decimal,
    pub format: NumberFormat,
    pub currency: CurrencyFormat,
}

impl Default for CartConfig {
    fn default() -> Self {
        CartConfig {
            tax_rate: Decimal::from(21),
            discount_rate: Decimal::ZERO,
            format: NumberFormat::default(),
            currency: CurrencyFormat::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberFormat {
    pub decimals: u32,
    pub decimal_point: String,
    pub thousands_separator: String,
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat {
            decimals: 2,
            decimal_point: ".".to_string(),
            thousands_separator: ",".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub placement: Placement,
}

/// Where the currency symbol goes relative to the amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    #[default]
    Before,
    After,
}

impl FromStr for Placement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "before" => Ok(Placement::Before),
            "after" => Ok(Placement::After),
            other => Err(format!("expected before or after, got {}", other)),
        }
    }
}

impl CartConfig {
    /// Parse a JSON document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: CartConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `CART_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key lookup, using the same keys as [`CartConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = CartConfig::default();

        if let Some(value) = lookup("CART_TAX_RATE") {
            config.tax_rate = parse("CART_TAX_RATE", &value)?;
        }
        if let Some(value) = lookup("CART_DISCOUNT_RATE") {
            config.discount_rate = parse("CART_DISCOUNT_RATE", &value)?;
        }
        if let Some(value) = lookup("CART_DECIMALS") {
            config.format.decimals = parse("CART_DECIMALS", &value)?;
        }
        if let Some(value) = lookup("CART_DECIMAL_POINT") {
            config.format.decimal_point = value;
        }
        if let Some(value) = lookup("CART_THOUSANDS_SEPARATOR") {
            config.format.thousands_separator = value;
        }
        if let Some(value) = lookup("CART_CURRENCY_SYMBOL") {
            config.currency.symbol = value;
        }
        if let Some(value) = lookup("CART_CURRENCY_PLACEMENT") {
            config.currency.placement = parse("CART_CURRENCY_PLACEMENT", &value)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_tax_rate(mut self, rate: Decimal) -> Self {
        self.tax_rate = rate;
        self
    }

    pub fn with_discount_rate(mut self, rate: Decimal) -> Self {
        self.discount_rate = rate;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_tax_rate(self.tax_rate).map_err(|e| invalid("tax_rate", e))?;
        validate_discount_rate(self.discount_rate).map_err(|e| invalid("discount_rate", e))?;
        if self.format.decimals > MAX_DECIMALS {
            return Err(invalid(
                "decimals",
                format!("at most {} decimals are supported", MAX_DECIMALS),
            ));
        }
        Ok(())
    }
}

fn parse<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| invalid(key, e))
}

fn invalid(key: &str, message: impl fmt::Display) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = CartConfig::default();
        assert_eq!(config.tax_rate, Decimal::from(21));
        assert_eq!(config.discount_rate, Decimal::ZERO);
        assert_eq!(config.format.decimals, 2);
        assert_eq!(config.format.decimal_point, ".");
        assert_eq!(config.format.thousands_separator, ",");
        assert_eq!(config.currency.placement, Placement::Before);
    }

    #[test]
    fn from_json_fills_missing_fields() {
        let config = CartConfig::from_json(
            r#"{"tax_rate": 19, "currency": {"symbol": "€", "placement": "after"}}"#,
        )
        .unwrap();
        assert_eq!(config.tax_rate, Decimal::from(19));
        assert_eq!(config.discount_rate, Decimal::ZERO);
        assert_eq!(config.format.decimals, 2);
        assert_eq!(config.currency.symbol, "€");
        assert_eq!(config.currency.placement, Placement::After);
    }

    #[test]
    fn from_json_rejects_bad_rates() {
        let err = CartConfig::from_json(r#"{"discount_rate": 150}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "discount_rate"));

        let err = CartConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn from_lookup_reads_cart_keys() {
        let config = CartConfig::from_lookup(lookup(&[
            ("CART_TAX_RATE", "7.5"),
            ("CART_DISCOUNT_RATE", "5"),
            ("CART_DECIMALS", "3"),
            ("CART_DECIMAL_POINT", ","),
            ("CART_THOUSANDS_SEPARATOR", "."),
            ("CART_CURRENCY_SYMBOL", "kr"),
            ("CART_CURRENCY_PLACEMENT", "After"),
        ]))
        .unwrap();

        assert_eq!(config.tax_rate, Decimal::new(75, 1));
        assert_eq!(config.discount_rate, Decimal::from(5));
        assert_eq!(config.format.decimals, 3);
        assert_eq!(config.format.decimal_point, ",");
        assert_eq!(config.format.thousands_separator, ".");
        assert_eq!(config.currency.symbol, "kr");
        assert_eq!(config.currency.placement, Placement::After);
    }

    #[test]
    fn from_lookup_rejects_garbage() {
        let err = CartConfig::from_lookup(lookup(&[("CART_TAX_RATE", "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "CART_TAX_RATE"));

        let err =
            CartConfig::from_lookup(lookup(&[("CART_CURRENCY_PLACEMENT", "middle")])).unwrap_err();
        assert!(
            matches!(err, ConfigError::Invalid { ref key, .. } if key == "CART_CURRENCY_PLACEMENT")
        );

        let err = CartConfig::from_lookup(lookup(&[("CART_DECIMALS", "40")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "decimals"));
    }
}
