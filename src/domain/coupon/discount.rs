//! Discount rule carried by a coupon.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Money, Percentage, ValidationError};

/// How a coupon reduces an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DiscountRule {
    /// Whole-percent reduction of the order amount.
    Percentage(Percentage),

    /// Flat reduction.
    Fixed(Money),
}

impl DiscountRule {
    pub fn percentage(value: u8) -> Result<Self, ValidationError> {
        Ok(DiscountRule::Percentage(Percentage::try_new(value)?))
    }

    pub fn fixed(amount: Money) -> Result<Self, ValidationError> {
        Ok(DiscountRule::Fixed(amount.ensure_positive("discount_value")?))
    }

    /// Storage kind, `percentage` or `fixed`.
    pub fn kind(&self) -> &'static str {
        match self {
            DiscountRule::Percentage(_) => "percentage",
            DiscountRule::Fixed(_) => "fixed",
        }
    }

    /// Storage value: whole percent, or minor units for fixed discounts.
    pub fn raw_value(&self) -> i64 {
        match self {
            DiscountRule::Percentage(p) => i64::from(p.value()),
            DiscountRule::Fixed(m) => m.minor(),
        }
    }

    /// Rebuilds a rule from its storage kind and value.
    pub fn from_parts(kind: &str, value: i64) -> Result<Self, ValidationError> {
        match kind {
            "percentage" => {
                let pct = u8::try_from(value)
                    .map_err(|_| ValidationError::out_of_range("discount_value", 0, 100, value))?;
                Self::percentage(pct)
            }
            "fixed" => Self::fixed(Money::from_minor(value)),
            other => Err(ValidationError::invalid_format(
                "discount_type",
                format!("unknown discount type '{}'", other),
            )),
        }
    }

    /// Percentage for display on the booking, if this is a percentage rule.
    pub fn as_percentage(&self) -> Option<Percentage> {
        match self {
            DiscountRule::Percentage(p) => Some(*p),
            DiscountRule::Fixed(_) => None,
        }
    }

    /// Undiscounted reduction for `order_amount`, before any caps.
    pub fn raw_discount(&self, order_amount: Money) -> Money {
        match self {
            DiscountRule::Percentage(p) => order_amount.percent_of(*p),
            DiscountRule::Fixed(m) => *m,
        }
    }
}
