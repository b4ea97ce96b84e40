//! Price type for product amounts.
//!
//! Prices are kept as integer minor units (cents) so that the price window
//! comparisons in the facet filter are exact. On the wire they are plain
//! decimal numbers, which is what the catalog backend emits.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of minor units per major unit.
const MINOR_UNITS: i64 = 100;

/// A non-negative product price.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(try_from = "f64", into = "f64")]
pub struct Price {
    cents: i64,
}

impl Price {
    /// Zero price.
    pub const ZERO: Price = Price { cents: 0 };

    /// Create a price from cents. Negative input is clamped to zero.
    pub fn from_cents(cents: i64) -> Self {
        Self { cents: cents.max(0) }
    }

    /// Create a price from a decimal amount.
    ///
    /// ```
    /// use catalog_engine::Price;
    /// let price = Price::from_decimal(49.99);
    /// assert_eq!(price.cents(), 4999);
    /// ```
    pub fn from_decimal(amount: f64) -> Self {
        Self::from_cents((amount * MINOR_UNITS as f64).round() as i64)
    }

    /// Amount in cents.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        self.cents as f64 / MINOR_UNITS as f64
    }

    /// Clamp into `[lo, hi]`.
    pub fn clamp_to(self, lo: Price, hi: Price) -> Price {
        if lo > hi {
            return lo;
        }
        self.clamp(lo, hi)
    }

    /// Format as a display string (e.g., "$49.99").
    pub fn display(&self) -> String {
        format!("${:.2}", self.to_decimal())
    }
}

/// Error returned when deserializing an invalid price.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid price: {0}")]
pub struct InvalidPrice(f64);

impl TryFrom<f64> for Price {
    type Error = InvalidPrice;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() || value < 0.0 {
            return Err(InvalidPrice(value));
        }
        Ok(Price::from_decimal(value))
    }
}

impl From<Price> for f64 {
    fn from(price: Price) -> f64 {
        price.to_decimal()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
