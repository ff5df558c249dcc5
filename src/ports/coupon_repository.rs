//! Coupon and coupon usage repository ports.

use crate::domain::coupon::{Coupon, CouponCode, CouponUsage};
use crate::domain::foundation::{BookingId, CouponId, DomainError, UserId};
use async_trait::async_trait;

#[async_trait]
pub trait CouponRepository: Send + Sync {
    /// # Errors
    ///
    /// - `DuplicateCouponCode` if the code is taken
    /// - `DatabaseError` on persistence failure
    async fn save(&self, coupon: &Coupon) -> Result<(), DomainError>;

    async fn update(&self, coupon: &Coupon) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &CouponId) -> Result<Option<Coupon>, DomainError>;

    async fn find_by_code(&self, code: &CouponCode) -> Result<Option<Coupon>, DomainError>;
}

/// Append-only store of coupon redemptions.
///
/// The one-use-per-user rule is checked through `has_user_used` by the
/// caller before a coupon is applied.
#[async_trait]
pub trait CouponUsageRepository: Send + Sync {
    async fn record(&self, usage: &CouponUsage) -> Result<(), DomainError>;

    async fn has_user_used(&self, coupon_id: &CouponId, user_id: &UserId) -> Result<bool, DomainError>;

    async fn find_by_booking(&self, booking_id: &BookingId) -> Result<Vec<CouponUsage>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coupon_ports_are_object_safe() {
        fn _coupons(_repo: &dyn CouponRepository) {}
        fn _usages(_repo: &dyn CouponUsageRepository) {}
    }
}
