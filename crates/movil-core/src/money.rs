//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  The voucher workflow compares a submitted amount against a sale        │
//! │  total for EXACT equality. One bit of drift and a legitimate payment    │
//! │  is rejected — or a short payment is accepted.                          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    S/ 200.00 is stored as 20000. Equality is integer equality.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use movil_core::money::Money;
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(109_900); // S/ 1099.00
//!
//! // Or parse an exact 2-decimal string from the API boundary
//! let amount: Money = "1099.00".parse().unwrap();
//! assert_eq!(amount, price);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (céntimos of a sol).
///
/// ## Design Decisions
/// - **i64 (signed)**: arithmetic intermediate values may go negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (soles and céntimos).
    ///
    /// ## Example
    /// ```rust
    /// use movil_core::money::Money;
    ///
    /// let price = Money::from_major_minor(10, 99); // S/ 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (soles) portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Multiplies a unit price by a quantity, giving a line subtotal.
    ///
    /// ## Example
    /// ```rust
    /// use movil_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(10_000); // S/ 100.00
    /// assert_eq!(unit_price.multiply_quantity(2).cents(), 20_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Renders the value as a plain 2-decimal string (`"200.00"`).
    ///
    /// This is the wire format for monetary amounts: what `FromStr` parses
    /// is exactly what this produces.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money in a human-readable format (`S/ 10.99`).
///
/// ## Note
/// This is for logs and debugging. The wire format is
/// [`Money::to_decimal_string`].
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}S/ {}.{:02}", sign, self.major().abs(), self.minor())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Error returned when a decimal money string cannot be parsed exactly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid money amount: {0}")]
pub struct ParseMoneyError(pub String);

/// Parses an exact decimal string with at most two fraction digits.
///
/// Accepts `"200"`, `"200.5"`, `"200.50"`. Rejects anything that cannot be
/// represented exactly in cents (`"200.505"`, `"2e2"`, `"NaN"`). Floats
/// never enter the picture.
impl FromStr for Money {
    type Err = ParseMoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let (major_str, minor_str) = match digits.split_once('.') {
            Some((m, f)) => (m, f),
            None => (digits, ""),
        };

        if major_str.is_empty() || !major_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseMoneyError(s.to_string()));
        }
        if minor_str.len() > 2 || !minor_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseMoneyError(s.to_string()));
        }

        let major: i64 = major_str.parse().map_err(|_| ParseMoneyError(s.to_string()))?;
        let minor: i64 = if minor_str.is_empty() {
            0
        } else if minor_str.len() == 1 {
            // "200.5" means 50 cents, not 5
            minor_str.parse::<i64>().map_err(|_| ParseMoneyError(s.to_string()))? * 10
        } else {
            minor_str.parse().map_err(|_| ParseMoneyError(s.to_string()))?
        };

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(|| ParseMoneyError(s.to_string()))?;

        Ok(if negative { Money(-cents) } else { Money(cents) })
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=), used when accumulating a sale total.
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "S/ 10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "S/ 5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-S/ 5.50");
    }

    #[test]
    fn test_decimal_string_round_trip() {
        let amount = Money::from_cents(20_000);
        assert_eq!(amount.to_decimal_string(), "200.00");
        assert_eq!(amount.to_decimal_string().parse::<Money>().unwrap(), amount);
    }

    #[test]
    fn test_parse_exact_forms() {
        assert_eq!("200".parse::<Money>().unwrap().cents(), 20_000);
        assert_eq!("200.5".parse::<Money>().unwrap().cents(), 20_050);
        assert_eq!("200.50".parse::<Money>().unwrap().cents(), 20_050);
        assert_eq!("0.01".parse::<Money>().unwrap().cents(), 1);
        assert_eq!("-5.50".parse::<Money>().unwrap().cents(), -550);
    }

    #[test]
    fn test_parse_rejects_inexact_input() {
        assert!("200.505".parse::<Money>().is_err());
        assert!("2e2".parse::<Money>().is_err());
        assert!("NaN".parse::<Money>().is_err());
        assert!("".parse::<Money>().is_err());
        assert!(".50".parse::<Money>().is_err());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_cents(10_000);
        assert_eq!(unit_price.multiply_quantity(2).cents(), 20_000);
    }
}
