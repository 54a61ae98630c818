//! Price type for player values and transfer budgets

use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Neg, Sub};

/// Price represents a monetary amount with one decimal place of precision
///
/// Stored as whole tenths so budget comparisons are exact.
/// Example: 7.5 = 75 tenths, -0.5 = -5 tenths
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Price {
    tenths: i64,
}

impl Price {
    pub const ZERO: Price = Price { tenths: 0 };

    /// Create a price from whole tenths
    pub const fn from_tenths(tenths: i64) -> Self {
        Self { tenths }
    }

    /// Create a price from units, rounding to the nearest tenth
    ///
    /// Non-finite input maps to zero; out-of-range input saturates.
    pub fn from_units(units: f64) -> Self {
        if !units.is_finite() {
            return Self::ZERO;
        }
        Self { tenths: (units * 10.0).round() as i64 }
    }

    /// Get the value in tenths
    pub fn tenths(self) -> i64 {
        self.tenths
    }

    /// Get the value in units
    pub fn to_units(self) -> f64 {
        self.tenths as f64 / 10.0
    }

    /// Get the value as an exact decimal
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.tenths, 1)
    }

    /// Create from decimal, rounding to one decimal place
    pub fn from_decimal(decimal: Decimal) -> Self {
        let tenths = decimal.checked_mul(Decimal::TEN).and_then(|d| d.round().to_i64()).unwrap_or(0);
        Self { tenths }
    }

    pub fn is_zero(self) -> bool {
        self.tenths == 0
    }

    pub fn is_negative(self) -> bool {
        self.tenths < 0
    }

    pub fn abs(self) -> Self {
        Self { tenths: self.tenths.saturating_abs() }
    }
}

impl From<f64> for Price {
    fn from(units: f64) -> Self {
        Self::from_units(units)
    }
}

impl From<Price> for f64 {
    fn from(price: Price) -> Self {
        price.to_units()
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self { tenths: self.tenths.saturating_add(other.tenths) }
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self { tenths: self.tenths.saturating_sub(other.tenths) }
    }
}

impl Neg for Price {
    type Output = Self;

    fn neg(self) -> Self {
        Self { tenths: self.tenths.saturating_neg() }
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, p| acc + p)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}
