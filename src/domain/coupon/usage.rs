use serde::{Deserialize, Serialize};

use crate::domain::foundation::{BookingId, CouponId, CouponUsageId, Money, Timestamp, UserId};

/// One application of a coupon to a booking. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponUsage {
    id: CouponUsageId,
    coupon_id: CouponId,
    booking_id: BookingId,
    user_id: UserId,
    discount_amount: Money,
    used_at: Timestamp,
}

impl CouponUsage {
    pub fn record(coupon_id: CouponId, booking_id: BookingId, user_id: UserId, discount_amount: Money) -> Self {
        Self {
            id: CouponUsageId::new(),
            coupon_id,
            booking_id,
            user_id,
            discount_amount,
            used_at: Timestamp::now(),
        }
    }

    /// Rebuilds a stored usage row.
    pub fn reconstitute(
        id: CouponUsageId,
        coupon_id: CouponId,
        booking_id: BookingId,
        user_id: UserId,
        discount_amount: Money,
        used_at: Timestamp,
    ) -> Self {
        Self {
            id,
            coupon_id,
            booking_id,
            user_id,
            discount_amount,
            used_at,
        }
    }

    pub fn id(&self) -> CouponUsageId {
        self.id
    }

    pub fn coupon_id(&self) -> CouponId {
        self.coupon_id
    }

    pub fn booking_id(&self) -> BookingId {
        self.booking_id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn discount_amount(&self) -> Money {
        self.discount_amount
    }

    pub fn used_at(&self) -> Timestamp {
        self.used_at
    }
}
