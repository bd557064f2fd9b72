//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Minor Units?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: fixed-point, 2 fractional digits                         │
//! │    "12500.00" is stored as 1_250_000 minor units                        │
//! │    Sums and products of quantities are exact                            │
//! │    Rounding happens only where a percentage is applied (half-up)        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use orderly_core::money::Money;
//!
//! let price = Money::from_minor(1_250_000); // 12500.00
//! let line = price.checked_mul_quantity(2).unwrap();
//! assert_eq!(line.to_string(), "25000.00");
//! ```
//!
//! Quantities come from clients, so arithmetic is checked: every operation
//! that can leave the i64 range returns `Option` instead of wrapping.
//!
//! On the wire a `Money` is always a string with exactly two fractional
//! digits, never a JSON number.

use rust_decimal::prelude::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in minor units (1/100 of the currency unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: intermediate differences may be negative before clamping
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **String serde**: `"25000.00"`, so clients never see a float
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ```rust
    /// use orderly_core::money::Money;
    ///
    /// let price = Money::from_minor(1099);
    /// assert_eq!(price.minor(), 1099);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from whole currency units.
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * 100)
    }

    /// Converts an exact decimal amount, rounding half-up to 2 digits.
    ///
    /// Returns `None` when the value does not fit in the money range.
    ///
    /// ```rust
    /// use orderly_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let m = Money::from_decimal(Decimal::new(12345, 3)).unwrap(); // 12.345
    /// assert_eq!(m.to_string(), "12.35");
    /// ```
    pub fn from_decimal(value: Decimal) -> Option<Self> {
        let minor = value
            .checked_mul(Decimal::ONE_HUNDRED)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        minor.to_i64().map(Money)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity; `None` on overflow.
    ///
    /// ```rust
    /// use orderly_core::money::Money;
    ///
    /// let unit_price = Money::from_minor(299);
    /// assert_eq!(unit_price.checked_mul_quantity(3).unwrap().minor(), 897);
    /// assert!(unit_price.checked_mul_quantity(i64::MAX).is_none());
    /// ```
    #[inline]
    pub const fn checked_mul_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(minor) => Some(Money(minor)),
            None => None,
        }
    }

    /// Adds two amounts; `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(minor) => Some(Money(minor)),
            None => None,
        }
    }

    /// Subtracts `other`; `None` on overflow.
    #[inline]
    pub const fn checked_sub(&self, other: Money) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(minor) => Some(Money(minor)),
            None => None,
        }
    }

    /// Sums amounts; `None` if any partial sum overflows.
    pub fn checked_sum<I>(amounts: I) -> Option<Self>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |acc, m| acc.checked_add(m))
    }

    /// Returns `percent`% of this amount, rounded half-up to 2 digits.
    ///
    /// `percent` is an exact decimal (`10`, `12.5`, ...), clamped to
    /// `[0, 100]`. The computation is done once on the unrounded product, so
    /// no intermediate rounding leaks into the result.
    ///
    /// ```rust
    /// use orderly_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let subtotal = Money::from_major(50_000);
    /// let ten = Decimal::from(10);
    /// assert_eq!(subtotal.percentage(ten).to_string(), "5000.00");
    /// ```
    pub fn percentage(&self, percent: Decimal) -> Money {
        let percent = percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
        let minor = (Decimal::from(self.0) * percent / Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        // |result| <= |self|, so it always fits
        Money(minor.to_i64().unwrap_or(self.0))
    }

    /// Calculates tax at a flat rate (basis points), rounding half-up.
    /// `None` when the tax does not fit the money range.
    ///
    /// ## Implementation
    /// Integer math: `(amount * rate + 5000) / 10000`
    ///
    /// ```rust
    /// use orderly_core::money::Money;
    /// use orderly_core::types::TaxRate;
    ///
    /// let price = Money::from_minor(1000);
    /// let tax = price.calculate_tax(TaxRate::from_bps(825)).unwrap();
    /// assert_eq!(tax.minor(), 83);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Option<Money> {
        // i128 keeps the intermediate product exact
        let tax = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        i64::try_from(tax).ok().map(Money)
    }

    /// Returns `self` if non-negative, otherwise zero.
    #[inline]
    pub fn floor_zero(self) -> Money {
        if self.0 < 0 {
            Money::zero()
        } else {
            self
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain fixed-point rendering: `"25000.00"`, `"-5.50"`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

/// Error returned when a string is not a valid 2-digit monetary amount.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid money amount: {0}")]
pub struct ParseMoneyError(String);

impl FromStr for Money {
    type Err = ParseMoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim()).map_err(|_| ParseMoneyError(s.to_string()))?;
        Money::from_decimal(value).ok_or_else(|| ParseMoneyError(s.to_string()))
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
