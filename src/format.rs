//! Amount formatting for display.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::{CartConfig, CurrencyFormat, NumberFormat, Placement};

impl NumberFormat {
    /// Round half away from zero to `decimals` and render with the
    /// configured separators, e.g. `1234.5` -> `1,234.50`.
    pub fn format(&self, amount: Decimal) -> String {
        let rounded =
            amount.round_dp_with_strategy(self.decimals, RoundingStrategy::MidpointAwayFromZero);
        let negative = rounded < Decimal::ZERO;
        let digits = rounded.abs().to_string();
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), ""));

        let mut out = String::with_capacity(digits.len() + 8);
        if negative {
            out.push('-');
        }
        out.push_str(&group_thousands(whole, &self.thousands_separator));
        if self.decimals > 0 {
            out.push_str(&self.decimal_point);
            out.push_str(fraction);
            for _ in fraction.len()..self.decimals as usize {
                out.push('0');
            }
        }
        out
    }
}

impl CurrencyFormat {
    /// Attach the currency symbol to an already formatted number.
    pub fn apply(&self, number: &str) -> String {
        if self.symbol.is_empty() {
            return number.to_string();
        }
        match self.placement {
            Placement::Before => format!("{}{}", self.symbol, number),
            Placement::After => format!("{} {}", number, self.symbol),
        }
    }
}

impl CartConfig {
    /// Format an amount with the configured number format and currency.
    pub fn format_money(&self, amount: Decimal) -> String {
        self.currency.apply(&self.format.format(amount))
    }
}

fn group_thousands(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_and_pads() {
        let format = NumberFormat::default();
        assert_eq!(format.format(Decimal::new(12345, 1)), "1,234.50");
        assert_eq!(format.format(Decimal::from(5)), "5.00");
        assert_eq!(format.format(Decimal::from(1_000_000)), "1,000,000.00");
        assert_eq!(format.format(Decimal::new(999, 0)), "999.00");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        let format = NumberFormat::default();
        assert_eq!(format.format(Decimal::new(1005, 3)), "1.01");
        assert_eq!(format.format(Decimal::new(-1005, 3)), "-1.01");
        assert_eq!(format.format(Decimal::new(1004, 3)), "1.00");
    }

    #[test]
    fn custom_separators_and_zero_decimals() {
        let format = NumberFormat {
            decimals: 0,
            decimal_point: ",".into(),
            thousands_separator: ".".into(),
        };
        assert_eq!(format.format(Decimal::new(12345678, 2)), "123.457");

        let european = NumberFormat {
            decimals: 2,
            decimal_point: ",".into(),
            thousands_separator: " ".into(),
        };
        assert_eq!(european.format(Decimal::new(123456789, 2)), "1 234 567,89");
    }

    #[test]
    fn currency_placement() {
        let mut config = CartConfig::default();
        assert_eq!(config.format_money(Decimal::from(10)), "10.00");

        config.currency.symbol = "$".into();
        assert_eq!(config.format_money(Decimal::new(250050, 2)), "$2,500.50");

        config.currency.symbol = "€".into();
        config.currency.placement = Placement::After;
        assert_eq!(config.format_money(Decimal::new(250050, 2)), "2,500.50 €");
    }
}
