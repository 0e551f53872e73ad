//! Type-safe price representation using decimal arithmetic.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price in the store currency (rubles).
///
/// Wraps [`Decimal`] to keep money arithmetic exact. The store API
/// serializes prices as plain JSON numbers, so the wrapper is transparent
/// on the wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an amount in kopecks (1/100 ruble).
    #[must_use]
    pub fn from_kopecks(kopecks: i64) -> Self {
        Self(Decimal::new(kopecks, 2))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} ₽", self.0)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self {
        Self(self.0 * Decimal::from(rhs))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_kopecks() {
        let price = Price::from_kopecks(12_345);
        assert_eq!(price.amount(), Decimal::new(12_345, 2));
    }

    #[test]
    fn test_mul_by_quantity() {
        let price = Price::from_kopecks(10_000); // 100.00
        assert_eq!(price * 3, Price::from_kopecks(30_000));
    }

    #[test]
    fn test_sum() {
        let total: Price = [Price::from_kopecks(100), Price::from_kopecks(250)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_kopecks(350));
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::from_kopecks(999_900).to_string(), "9999.00 ₽");
    }

    #[test]
    fn test_serde_as_number() {
        let price: Price = serde_json::from_str("199.99").unwrap();
        assert_eq!(price, Price::from_kopecks(19_999));
    }
}
