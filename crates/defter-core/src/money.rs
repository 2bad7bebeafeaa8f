//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In JavaScript/floating point:                                      │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                       │
//! │                                                                     │
//! │  A running cash balance folded over thousands of float entries     │
//! │  drifts — the stored balance stops matching the re-computed one.   │
//! │                                                                     │
//! │  OUR SOLUTION: Integer Kuruş                                        │
//! │    ₺1.00 = 100 kuruş, all arithmetic is exact i64 math             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use defter_core::money::Money;
//!
//! // Create from kuruş (the smallest currency unit)
//! let amount = Money::from_kurus(10_99); // ₺10.99
//!
//! let total = amount + Money::from_kurus(5_00); // ₺15.99
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (kuruş for TRY).
///
/// ## Design Decisions
/// - **i64 (signed)**: Balances can legitimately go negative after a
///   retroactive update or delete propagates downstream
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support; serializes as a bare integer
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from kuruş (the smallest currency unit).
    #[inline]
    pub const fn from_kurus(kurus: i64) -> Self {
        Money(kurus)
    }

    /// Returns the value in kuruş.
    #[inline]
    pub const fn kurus(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (lira) portion.
    #[inline]
    pub const fn lira(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn kurus_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies the amount by an integer quantity (invoice line totals).
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Calculates tax on this amount from a rate in basis points.
    ///
    /// 1 basis point = 0.01%, so 2000 bps = 20% (the common KDV rate).
    /// Uses integer math with half-up rounding: `(amount * bps + 5000) / 10000`.
    /// i128 intermediate prevents overflow on large invoices.
    pub fn tax_at_bps(&self, bps: u32) -> Money {
        let tax = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money(tax as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Human-readable format for logs and error messages.
/// The frontend formats amounts itself for localization.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₺{}.{:02}", sign, self.lira().abs(), self.kurus_part())
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

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_kurus() {
        let money = Money::from_kurus(1099);
        assert_eq!(money.kurus(), 1099);
        assert_eq!(money.lira(), 10);
        assert_eq!(money.kurus_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_kurus(1099)), "₺10.99");
        assert_eq!(format!("{}", Money::from_kurus(500)), "₺5.00");
        assert_eq!(format!("{}", Money::from_kurus(-550)), "-₺5.50");
        assert_eq!(format!("{}", Money::from_kurus(0)), "₺0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_kurus(1000);
        let b = Money::from_kurus(500);

        assert_eq!((a + b).kurus(), 1500);
        assert_eq!((a - b).kurus(), 500);
        assert_eq!((-a).kurus(), -1000);
    }

    #[test]
    fn test_negative_balances_are_representable() {
        // Propagation after a retroactive delete can legitimately push a
        // downstream balance below zero; Money must carry that.
        let balance = Money::from_kurus(300) - Money::from_kurus(800);
        assert!(balance.is_negative());
        assert_eq!(balance.kurus(), -500);
    }

    #[test]
    fn test_tax_at_bps() {
        // ₺100.00 at 20% KDV = ₺20.00
        let subtotal = Money::from_kurus(10_000);
        assert_eq!(subtotal.tax_at_bps(2000).kurus(), 2_000);

        // ₺10.00 at 8.25% = ₺0.825 → rounds to ₺0.83
        let amount = Money::from_kurus(1000);
        assert_eq!(amount.tax_at_bps(825).kurus(), 83);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_kurus(299);
        assert_eq!(unit_price.multiply_quantity(3).kurus(), 897);
    }
}
