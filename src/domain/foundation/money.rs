//! Money and currency value objects.
//!
//! Amounts are whole minor units (paise, cents) held in an `i64`. Floats
//! never touch a monetary value. Gateways already report minor units, so a
//! webhook amount maps straight onto [`Money::from_minor`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

use super::{Percentage, ValidationError};

/// An amount of money in minor currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Self = Self(0);

    /// Creates an amount from minor units (e.g. 2970_00 paise).
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Creates an amount from whole major units (e.g. 2970 rupees).
    ///
    /// Saturates at the `i64` bounds.
    pub const fn from_major(major: i64) -> Self {
        Self(major.saturating_mul(100))
    }

    pub const fn minor(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Subtracts, clamping the result at zero.
    pub fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0).max(0))
    }

    /// Adds, failing when the sum leaves the `i64` range.
    pub fn checked_add(self, other: Money, field: &str) -> Result<Money, ValidationError> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or_else(|| ValidationError::out_of_range(field, 0, i64::MAX, self.0.saturating_add(other.0)))
    }

    /// Multiplies by a count, failing when the product leaves the `i64` range.
    pub fn checked_mul(self, count: u32, field: &str) -> Result<Money, ValidationError> {
        self.0
            .checked_mul(i64::from(count))
            .map(Money)
            .ok_or_else(|| {
                ValidationError::out_of_range(field, 0, i64::MAX, self.0.saturating_mul(i64::from(count)))
            })
    }

    /// Floors `percent` of this amount to a whole minor unit.
    pub fn percent_of(self, percent: Percentage) -> Money {
        Money(percent.apply_to(self.0))
    }

    pub fn min(self, other: Money) -> Money {
        Money(self.0.min(other.0))
    }

    pub fn max(self, other: Money) -> Money {
        Money(self.0.max(other.0))
    }

    /// Fails when the amount is negative.
    pub fn ensure_non_negative(self, field: &str) -> Result<Money, ValidationError> {
        if self.is_negative() {
            return Err(ValidationError::out_of_range(field, 0, i64::MAX, self.0));
        }
        Ok(self)
    }

    /// Fails when the amount is zero or negative.
    pub fn ensure_positive(self, field: &str) -> Result<Money, ValidationError> {
        if !self.is_positive() {
            return Err(ValidationError::out_of_range(field, 1, i64::MAX, self.0));
        }
        Ok(self)
    }
}

// Operators saturate at the `i64` bounds. Sums that come from outside input
// go through `checked_add`/`checked_mul` instead.
impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

/// ISO-4217 currency code, stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    pub fn inr() -> Self {
        Self("INR".to_string())
    }

    pub fn new(code: impl AsRef<str>) -> Result<Self, ValidationError> {
        let code = code.as_ref().trim().to_ascii_uppercase();
        if code.is_empty() {
            return Err(ValidationError::empty_field("currency"));
        }
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::invalid_format(
                "currency",
                "must be a three-letter ISO code",
            ));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::inr()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Currency {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Currency::new(value)
    }
}

impl From<Currency> for String {
    fn from(c: Currency) -> Self {
        c.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_major_scales_to_minor_units() {
        assert_eq!(Money::from_major(1000).minor(), 100_000);
    }

    #[test]
    fn display_renders_two_decimals() {
        assert_eq!(Money::from_minor(123_450).to_string(), "1234.50");
        assert_eq!(Money::from_minor(5).to_string(), "0.05");
        assert_eq!(Money::from_minor(-250).to_string(), "-2.50");
    }

    #[test]
    fn saturating_sub_never_goes_negative() {
        let a = Money::from_major(10);
        let b = Money::from_major(25);
        assert_eq!(a.saturating_sub(b), Money::ZERO);
        assert_eq!(b.saturating_sub(a), Money::from_major(15));
    }

    #[test]
    fn percent_of_floors_to_minor_unit() {
        assert_eq!(Money::from_minor(999).percent_of(Percentage::new(10)), Money::from_minor(99));
        assert_eq!(Money::from_major(4000).percent_of(Percentage::new(20)), Money::from_major(800));
    }

    #[test]
    fn multiply_by_participants() {
        assert_eq!(Money::from_major(1000).checked_mul(3, "subtotal").unwrap(), Money::from_major(3000));
    }

    // ═══════════════════════════════════════════════════════════════
    // Overflow
    // ═══════════════════════════════════════════════════════════════

    #[test]
    fn checked_mul_rejects_overflow() {
        match Money::from_minor(i64::MAX / 2).checked_mul(3, "subtotal") {
            Err(ValidationError::OutOfRange { field, actual, .. }) => {
                assert_eq!(field, "subtotal");
                assert_eq!(actual, i64::MAX);
            }
            other => panic!("Expected OutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn checked_add_rejects_overflow() {
        assert!(Money::from_minor(i64::MAX).checked_add(Money::from_minor(1), "total_amount").is_err());
        assert_eq!(
            Money::from_major(5).checked_add(Money::from_major(2), "total_amount").unwrap(),
            Money::from_major(7)
        );
    }

    #[test]
    fn operators_saturate_at_bounds() {
        assert_eq!(Money::from_minor(i64::MAX) + Money::from_minor(1), Money::from_minor(i64::MAX));
        assert_eq!(Money::from_minor(i64::MIN) - Money::from_minor(1), Money::from_minor(i64::MIN));
        assert_eq!(Money::from_major(i64::MAX), Money::from_minor(i64::MAX));
        assert_eq!(Money::from_minor(i64::MIN).saturating_sub(Money::from_minor(i64::MAX)), Money::ZERO);
    }

    #[test]
    fn ensure_helpers_reject_out_of_range() {
        assert!(Money::from_minor(-1).ensure_non_negative("price").is_err());
        assert!(Money::ZERO.ensure_non_negative("price").is_ok());
        assert!(Money::ZERO.ensure_positive("amount").is_err());
    }

    #[test]
    fn currency_normalizes_and_validates() {
        assert_eq!(Currency::new(" inr ").unwrap().as_str(), "INR");
        assert!(Currency::new("").is_err());
        assert!(Currency::new("RUPEE").is_err());
        assert!(Currency::new("U$D").is_err());
    }

    #[test]
    fn currency_deserialization_validates() {
        let ok: Currency = serde_json::from_str("\"usd\"").unwrap();
        assert_eq!(ok.as_str(), "USD");
        assert!(serde_json::from_str::<Currency>("\"dollars\"").is_err());
    }
}
