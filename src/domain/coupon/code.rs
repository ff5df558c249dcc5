//! Coupon code value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

const MAX_LEN: usize = 50;

/// A coupon code, normalized to uppercase.
///
/// Customers type codes in any case; `summer10`, ` Summer10 ` and
/// `SUMMER10` are the same coupon.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CouponCode(String);

impl CouponCode {
    pub fn try_new(code: &str) -> Result<Self, ValidationError> {
        let normalized = code.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(ValidationError::empty_field("coupon_code"));
        }
        if normalized.len() > MAX_LEN {
            return Err(ValidationError::out_of_range(
                "coupon_code_length",
                1,
                MAX_LEN as i64,
                normalized.len() as i64,
            ));
        }
        if let Some(bad) = normalized
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(ValidationError::invalid_format(
                "coupon_code",
                format!("invalid character '{}'", bad),
            ));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CouponCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CouponCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(&value)
    }
}

impl From<CouponCode> for String {
    fn from(c: CouponCode) -> Self {
        c.0
    }
}
