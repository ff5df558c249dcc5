//! Whole-percent rates: coupon discounts, tax rates, loyalty tier discounts.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A whole percent between 0 and 100.
///
/// Fractional rates are not representable; a booking's 18% tax or a 10%
/// coupon is always an integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Percentage(u8);

impl Percentage {
    /// Builds a rate from a trusted constant, saturating at 100.
    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    /// Builds a rate from outside input.
    pub fn try_new(value: u8) -> Result<Self, ValidationError> {
        if value > 100 {
            return Err(ValidationError::out_of_range("percentage", 0, 100, i64::from(value)));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Share of `minor` units, floored.
    pub fn apply_to(&self, minor: i64) -> i64 {
        minor.saturating_mul(i64::from(self.0)) / 100
    }
}

impl TryFrom<u8> for Percentage {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Percentage> for u8 {
    fn from(p: Percentage) -> Self {
        p.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
