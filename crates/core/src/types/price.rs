//! Product prices.
//!
//! Prices arrive from the remote catalog as bare JSON numbers with no
//! currency attached. They are held as [`Decimal`] so that `19.99` stays
//! `19.99` instead of picking up binary floating point noise.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product price in the catalog's (implicit) currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Get the underlying amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

/// Formats as `$` followed by the amount with trailing zeros dropped,
/// e.g. `$20` or `$19.9`.
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0.normalize())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<i64> for Price {
    fn from(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_from_json_integer() {
        let price: Price = serde_json::from_str("20").unwrap();
        assert_eq!(price, Price::from(20));
        assert_eq!(price.to_string(), "$20");
    }

    #[test]
    fn test_price_display_drops_trailing_zeros() {
        assert_eq!(Price::new(Decimal::new(1990, 2)).to_string(), "$19.9");
        assert_eq!(Price::new(Decimal::new(1999, 2)).to_string(), "$19.99");
        assert_eq!(Price::new(Decimal::new(500, 2)).to_string(), "$5");
    }

    #[test]
    fn test_price_from_json_string() {
        let price: Price = serde_json::from_str("\"12.50\"").unwrap();
        assert_eq!(price.amount(), Decimal::new(1250, 2));
    }
}
