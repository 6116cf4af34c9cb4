//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Refund proration makes this worse:                                     │
//! │    $10.00 sale of 3 units, refund 2 → $6.666…                          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents + explicit rounding                        │
//! │    1000 × 2 / 3 = 666.67 cents → 667 (half-up, once, at the end)       │
//! │    Refunding all 3 units gives back exactly 1000 cents                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ims_core::money::Money;
//!
//! let price = Money::from_cents(1099); // $10.99
//! let doubled = price * 2;             // $21.98
//! let total = price + Money::from_cents(500); // $15.99
//! assert_eq!(total.cents(), 1599);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Refund ledger entries carry negative amounts
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Two decimal places**: matches the catalog's price precision
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product.selling_price_cents ──► SaleRecord.total_revenue_cents         │
/// │  Product.cost_price_cents    ──► SaleRecord.total_cost_cents            │
/// │                                  SaleRecord.total_profit_cents          │
/// │                                          │                              │
/// │                                          ▼ prorate(refunded, sold)      │
/// │                                  Refund SaleRecord (negated)            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use ims_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (dollars and cents).
    ///
    /// ## Example
    /// ```rust
    /// use ims_core::money::Money;
    ///
    /// let price = Money::from_major_minor(20, 0); // $20.00
    /// assert_eq!(price.cents(), 2000);
    ///
    /// let negative = Money::from_major_minor(-5, 50); // -$5.50
    /// assert_eq!(negative.cents(), -550);
    /// ```
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    ///
    /// ## Example
    /// ```rust
    /// use ims_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).dollars(), 10);
    /// assert_eq!(Money::from_cents(-550).dollars(), -5);
    /// ```
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
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

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use ims_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(2000); // $20.00
    /// let revenue = unit_price.multiply_quantity(3);
    /// assert_eq!(revenue.cents(), 6000); // $60.00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Multiplies money by a quantity, returning `None` on overflow.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Returns `self × part / whole`, rounded half-up (away from zero) to the cent.
    ///
    /// ## Refund Proration
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  Original sale: 3 units, total_revenue = $10.00                     │
    /// │                                                                     │
    /// │  Refund 1 unit:  1000 × 1 / 3 = 333.33 → 333 cents                  │
    /// │  Refund 2 units: 1000 × 2 / 3 = 666.67 → 667 cents                  │
    /// │  Refund 3 units: 1000 × 3 / 3 = 1000   → 1000 cents (exact)         │
    /// │                                                                     │
    /// │  Rounding happens once, after the multiplication, so a full         │
    /// │  refund always reverses the original amount exactly.                │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// Intermediate math is done in `i128`. A non-positive `whole` yields zero.
    ///
    /// ## Example
    /// ```rust
    /// use ims_core::money::Money;
    ///
    /// let total = Money::from_cents(1000);
    /// assert_eq!(total.prorate(2, 3).cents(), 667);
    /// assert_eq!(Money::from_cents(-1000).prorate(2, 3).cents(), -667);
    /// ```
    pub fn prorate(&self, part: i64, whole: i64) -> Money {
        if whole <= 0 {
            return Money::zero();
        }

        let numerator = i128::from(self.0) * i128::from(part);
        let whole = i128::from(whole);

        // Half-up on the magnitude: (2n + d) / 2d
        let magnitude = (numerator.abs() * 2 + whole) / (whole * 2);
        let cents = if numerator < 0 { -magnitude } else { magnitude };

        Money(cents as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Negation, used when turning a prorated refund into a ledger entry.
impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
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
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(20, 0).cents(), 2000);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-4000)), "-$40.00");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(6000);
        let b = Money::from_cents(3000);

        assert_eq!((a + b).cents(), 9000);
        assert_eq!((a - b).cents(), 3000);
        assert_eq!((-a).cents(), -6000);
        assert_eq!((b * 3).cents(), 9000);
        assert_eq!(b.checked_multiply_quantity(2), Some(Money::from_cents(6000)));
        assert_eq!(Money::from_cents(i64::MAX).checked_multiply_quantity(2), None);

        let total: Money = [a, b, -b].into_iter().sum();
        assert_eq!(total.cents(), 6000);
    }

    #[test]
    fn test_prorate_exact() {
        // Scenario: $60.00 for 3 units, refund 2 → $40.00
        let total = Money::from_cents(6000);
        assert_eq!(total.prorate(2, 3).cents(), 4000);
        assert_eq!(total.prorate(3, 3), total);
    }

    #[test]
    fn test_prorate_rounds_half_up() {
        let total = Money::from_cents(1000);
        assert_eq!(total.prorate(1, 3).cents(), 333); // 333.33
        assert_eq!(total.prorate(2, 3).cents(), 667); // 666.67

        // Exactly half a cent rounds away from zero
        assert_eq!(Money::from_cents(5).prorate(1, 2).cents(), 3);
        assert_eq!(Money::from_cents(-5).prorate(1, 2).cents(), -3);
    }

    #[test]
    fn test_prorate_negative_profit() {
        // Items sold at a loss keep the sign through proration
        let loss = Money::from_cents(-999);
        assert_eq!(loss.prorate(1, 3).cents(), -333);
        assert_eq!(loss.prorate(3, 3).cents(), -999);
    }

    #[test]
    fn test_prorate_non_positive_whole() {
        assert!(Money::from_cents(1000).prorate(1, 0).is_zero());
        assert!(Money::from_cents(1000).prorate(1, -2).is_zero());
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().cents(), 100);
    }

    #[test]
    fn test_serializes_as_plain_cents() {
        let json = serde_json::to_string(&Money::from_cents(-4000)).unwrap();
        assert_eq!(json, "-4000");
    }
}
