//! Coupon domain module.
//!
//! - `code` - Normalized coupon code
//! - `discount` - Percentage or fixed discount rule
//! - `aggregate` - Coupon validity and discount computation
//! - `usage` - Immutable record of one redemption

mod aggregate;
mod code;
mod discount;
mod usage;

pub use aggregate::{Coupon, NewCoupon};
pub use code::CouponCode;
pub use discount::DiscountRule;
pub use usage::CouponUsage;
