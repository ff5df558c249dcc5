//! Coupon handlers.

mod create_coupon;
mod validate_coupon;

pub use create_coupon::{CreateCouponCommand, CreateCouponHandler};
pub use validate_coupon::{CouponValidation, ValidateCouponHandler, ValidateCouponQuery};
