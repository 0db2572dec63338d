//! Plain-number monetary amounts.
//!
//! The catalog backend represents prices as bare JSON numbers with no
//! currency or precision contract, and cart subtotals are maintained by
//! floating-point arithmetic (including proportional scaling on removal).
//! `Money` wraps `f64` to preserve those observable values exactly; switching
//! to decimal arithmetic would change subtotals after repeated partial
//! removals.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

use serde::{Deserialize, Serialize};

/// A monetary amount in the store's single display currency.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(f64);

impl Money {
    /// Create an amount from a plain number.
    #[must_use]
    pub const fn new(amount: f64) -> Self {
        Self(amount)
    }

    /// Get the underlying amount.
    #[must_use]
    pub const fn amount(self) -> f64 {
        self.0
    }

    /// Total ordering over amounts (NaN-safe), for sorting product lists.
    #[must_use]
    pub fn total_cmp(self, other: Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self {
        Self(self.0 * f64::from(rhs))
    }
}

impl Div<u32> for Money {
    type Output = Self;

    fn div(self, rhs: u32) -> Self {
        Self(self.0 / f64::from(rhs))
    }
}
