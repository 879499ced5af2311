//! Price rendering.
//!
//! Filters, records and the query string all carry prices as integer minor
//! units (cents for USD). `Money` only exists at the presentation edge.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency of a listing snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Jpy,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "\u{20ac}",
            Currency::Gbp => "\u{00a3}",
            Currency::Jpy => "\u{00a5}",
        }
    }

    /// Minor units per major unit, as a power of ten.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::Jpy => 0,
            _ => 2,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A price in minor units, tagged with its currency for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    pub minor_units: i64,
    pub currency: Currency,
}

impl Money {
    pub fn new(minor_units: i64, currency: Currency) -> Self {
        Self {
            minor_units,
            currency,
        }
    }

    /// Format with symbol, e.g. `$49.99`.
    ///
    /// ```
    /// use turbo_facets::money::{Currency, Money};
    /// assert_eq!(Money::new(4999, Currency::Usd).display(), "$49.99");
    /// ```
    pub fn display(&self) -> String {
        let places = self.currency.decimal_places();
        let divisor = 10_i64.pow(places);
        let sign = if self.minor_units < 0 { "-" } else { "" };
        let abs = self.minor_units.unsigned_abs();
        let major = abs / divisor as u64;
        if places == 0 {
            return format!("{}{}{}", sign, self.currency.symbol(), major);
        }
        let minor = abs % divisor as u64;
        format!(
            "{}{}{}.{:0width$}",
            sign,
            self.currency.symbol(),
            major,
            minor,
            width = places as usize
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new(4999, Currency::Usd).display(), "$49.99");
        assert_eq!(Money::new(100, Currency::Jpy).display(), "\u{00a5}100");
        assert_eq!(Money::new(150_000, Currency::Eur).to_string(), "\u{20ac}1500.00");
        assert_eq!(Money::new(5, Currency::Gbp).display(), "\u{00a3}0.05");
        assert_eq!(Money::new(-250, Currency::Usd).display(), "-$2.50");
    }

    #[test]
    fn test_currency_serde_uses_codes() {
        let json = serde_json::to_string(&Currency::Eur).unwrap();
        assert_eq!(json, "\"EUR\"");
        let parsed: Currency = serde_json::from_str("\"JPY\"").unwrap();
        assert_eq!(parsed, Currency::Jpy);
    }
}
